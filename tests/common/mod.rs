#![allow(dead_code)]

use fleet_wizard::wizard::{
    FieldKind, FieldMap, FieldSchema, StepSchema, Validator, WizardController, WizardSchema,
};

/// Three steps: `name` (required), `fleet_size` (positive number), `email`.
pub fn company_schema() -> WizardSchema {
    WizardSchema::new(
        "company",
        vec![
            StepSchema::required("Company", &["name"]),
            StepSchema::new(
                "Fleet",
                vec![FieldSchema::new("fleet_size", "Fleet size", FieldKind::Number)
                    .with_validator(Validator::PositiveNumber)],
            ),
            StepSchema::required("Contact", &["email"]),
        ],
    )
}

pub fn company_controller() -> WizardController {
    fleet_wizard::init();
    WizardController::new(company_schema(), FieldMap::new()).expect("valid schema")
}

/// Controller whose record satisfies every step.
pub fn filled_company_controller() -> WizardController {
    let controller = company_controller();
    controller.set_field("name", "Acme Haulage");
    controller.set_field("fleet_size", 12.0);
    controller.set_field("email", "ops@acme.test");
    controller
}
