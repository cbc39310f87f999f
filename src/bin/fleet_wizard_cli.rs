use std::{env, process};

use fleet_wizard::cli::{self, output, Command};
use fleet_wizard::utils::init_tracing_with;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            output::error(&err);
            if matches!(err, cli::CliError::Usage(_)) {
                eprintln!("{}", cli::usage());
            }
            1
        }
    };
    process::exit(code);
}

async fn run() -> Result<i32, cli::CliError> {
    let command = Command::parse(env::args().skip(1))?;
    let config_path = match &command {
        Command::Run { config, .. } => config.clone(),
        _ => None,
    };
    let config = cli::load_config(config_path.as_ref())?;
    init_tracing_with(&config.log_filter);
    tracing::debug!(?command, "starting");
    cli::execute(command, &config).await
}
