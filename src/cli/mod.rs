//! Command-line driver that replays a JSON answer file through a fleet wizard.

pub mod output;

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigError, ConfigManager, WizardConfig};
use crate::errors::{SubmitError, WizardError};
use crate::fleet::{
    self, Collection, DraftError, Entity, FleetApi, FleetWizardKind, MaintenanceScheduleWizard,
    TruckOnboardingWizard, WorkOrderWizard,
};
use crate::utils::build_info;
use crate::wizard::{FieldKind, FieldMap, FieldSchema, SubmitPolicy, WizardFlow, WizardSchema};

/// Process exit code when the answers fail validation.
pub const EXIT_INVALID: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Schema(FleetWizardKind),
    Run {
        kind: FleetWizardKind,
        answers: PathBuf,
        config: Option<PathBuf>,
    },
    Version,
    Help,
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(command) = args.next() else {
            return Ok(Command::Help);
        };
        match command.as_str() {
            "schema" => {
                let kind = args
                    .next()
                    .ok_or_else(|| CliError::Usage("schema needs a wizard name".into()))?;
                Ok(Command::Schema(kind.parse::<FleetWizardKind>()?))
            }
            "run" => {
                let kind = args
                    .next()
                    .ok_or_else(|| CliError::Usage("run needs a wizard name".into()))?
                    .parse::<FleetWizardKind>()?;
                let answers = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| CliError::Usage("run needs an answers file".into()))?;
                let mut config = None;
                while let Some(flag) = args.next() {
                    match flag.as_str() {
                        "--config" => {
                            config = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                                CliError::Usage("--config needs a path".into())
                            })?);
                        }
                        other => return Err(CliError::Usage(format!("unknown option `{other}`"))),
                    }
                }
                Ok(Command::Run {
                    kind,
                    answers,
                    config,
                })
            }
            "version" | "--version" => Ok(Command::Version),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(CliError::Usage(format!("unknown command `{other}`"))),
        }
    }
}

/// Loads the config named on the command line, or the default location.
pub fn load_config(path: Option<&PathBuf>) -> Result<WizardConfig, CliError> {
    let manager = match path {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::default_location(),
    };
    Ok(manager.load()?)
}

/// Executes a parsed command and returns the process exit code.
pub async fn execute(command: Command, config: &WizardConfig) -> Result<i32, CliError> {
    match command {
        Command::Help => {
            println!("{}", usage());
            Ok(0)
        }
        Command::Version => {
            for line in build_info::current().lines() {
                println!("{line}");
            }
            Ok(0)
        }
        Command::Schema(kind) => {
            print!("{}", describe_schema(&kind.schema()));
            Ok(0)
        }
        Command::Run { kind, answers, .. } => {
            let raw = fs::read_to_string(&answers)?;
            let answers: FieldMap = serde_json::from_str(&raw)?;
            run_wizard(kind, &answers, config.submit_policy).await
        }
    }
}

pub fn usage() -> String {
    let wizards: Vec<&str> = FleetWizardKind::ALL.iter().map(|kind| kind.slug()).collect();
    format!(
        "Usage: fleet_wizard_cli <command>\n\
         Commands:\n  \
         schema <wizard>\n  \
         run <wizard> <answers.json> [--config <path>]\n  \
         version\n\
         Wizards: {}",
        wizards.join(", ")
    )
}

/// Human-readable listing of every step and field.
pub fn describe_schema(schema: &WizardSchema) -> String {
    let mut out = format!("{} ({} steps)\n", schema.name, schema.total_steps());
    for (index, step) in schema.steps.iter().enumerate() {
        out.push_str(&format!("Step {}: {}\n", index + 1, step.title));
        for field in &step.fields {
            out.push_str(&format!("  {}\n", describe_field(field)));
        }
    }
    out
}

fn describe_field(field: &FieldSchema) -> String {
    let kind = match &field.kind {
        FieldKind::Any => "any".to_string(),
        FieldKind::Text => "text".to_string(),
        FieldKind::Number => "number".to_string(),
        FieldKind::Boolean => "boolean".to_string(),
        FieldKind::List => "list".to_string(),
        FieldKind::Date => "date".to_string(),
        FieldKind::Choice(options) => format!("one of: {}", options.join(", ")),
    };
    let required = if field.required { "required" } else { "optional" };
    format!("{} ({}) [{}, {}]", field.key, field.label, kind, required)
}

async fn run_wizard(
    kind: FleetWizardKind,
    answers: &FieldMap,
    policy: SubmitPolicy,
) -> Result<i32, CliError> {
    let api = FleetApi::new();
    match kind {
        FleetWizardKind::Truck => {
            let wizard = TruckOnboardingWizard::new_create(HashSet::new());
            drive(&wizard, answers, policy, &api.trucks).await
        }
        FleetWizardKind::WorkOrder => {
            drive(&WorkOrderWizard::new_create(), answers, policy, &api.work_orders).await
        }
        FleetWizardKind::Maintenance => {
            let wizard = MaintenanceScheduleWizard::new_create();
            drive(&wizard, answers, policy, &api.schedules).await
        }
    }
}

/// Walks the wizard one step at a time, then submits into `collection`.
async fn drive<F>(
    flow: &F,
    answers: &FieldMap,
    policy: SubmitPolicy,
    collection: &Collection<F::Output>,
) -> Result<i32, CliError>
where
    F: WizardFlow<Error = DraftError>,
    F::Output: Entity,
{
    let controller = flow.controller(policy)?;
    for (name, value) in answers {
        if controller.schema().field(name).is_none() {
            output::info(format!(
                "`{}` ({}) is not a {} field; keeping it as-is",
                name,
                value.kind_name(),
                controller.schema().name
            ));
        }
        controller.set_field(name.clone(), value.clone());
    }

    loop {
        let progress = controller.progress();
        output::section(format!(
            "Step {} of {}: {}",
            progress.current, progress.total, progress.title
        ));
        if controller.is_last_step() {
            break;
        }
        let step = controller.advance();
        if !step.moved {
            report_errors(step.errors.iter());
            return Ok(EXIT_INVALID);
        }
    }

    let state = controller.snapshot();
    output::info(format!(
        "{} field(s) collected over {} steps",
        state.fields().len(),
        state.total_steps()
    ));

    match fleet::submit_flow(&controller, flow, collection).await {
        Ok(record) => {
            output::success(format!("{} created", <F::Output as Entity>::KIND));
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(0)
        }
        Err(SubmitError::ValidationFailed(errors)) => {
            report_errors(errors.iter());
            Ok(EXIT_INVALID)
        }
        Err(err) => {
            output::error(err);
            Ok(1)
        }
    }
}

fn report_errors<'a>(errors: impl Iterator<Item = (&'a String, &'a String)>) {
    for (field, message) in errors {
        output::warning(format!("{field}: {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_run_with_config() {
        let command =
            Command::parse(args(&["run", "truck", "a.json", "--config", "c.json"])).unwrap();
        assert_eq!(
            command,
            Command::Run {
                kind: FleetWizardKind::Truck,
                answers: PathBuf::from("a.json"),
                config: Some(PathBuf::from("c.json")),
            }
        );
    }

    #[test]
    fn empty_args_mean_help() {
        assert_eq!(Command::parse(Vec::new()).unwrap(), Command::Help);
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(matches!(
            Command::parse(args(&["explode"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            Command::parse(args(&["schema", "boat"])),
            Err(CliError::Wizard(WizardError::UnknownWizard(_)))
        ));
        assert!(matches!(
            Command::parse(args(&["run", "truck", "a.json", "--verbose"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn schema_listing_names_every_field() {
        let listing = describe_schema(&FleetWizardKind::Truck.schema());
        assert!(listing.starts_with("truck (3 steps)"));
        assert!(listing.contains("Step 2: Specifications"));
        assert!(listing.contains("fuel_type (Fuel type) [one of: Diesel, Petrol, Electric, CNG, required]"));
        assert!(listing.contains("driver (Assigned driver) [text, optional]"));
    }

    #[tokio::test]
    async fn run_wizard_reports_invalid_answers() {
        let mut answers = FieldMap::new();
        answers.insert("truck".into(), "AB123".into());
        let code = run_wizard(FleetWizardKind::WorkOrder, &answers, SubmitPolicy::Strict)
            .await
            .unwrap();
        assert_eq!(code, EXIT_INVALID);
    }
}
