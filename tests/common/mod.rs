#![allow(dead_code)]

use assert_cmd::Command;
use passport_wizard::cli::SCRIPT_ENV;
use passport_wizard::config::HOME_ENV;
use passport_wizard::form::Field;
use passport_wizard::workflow::{Command as WizardCommand, Workflow};
use tempfile::TempDir;

/// Isolated data directory with a short verification delay.
pub fn wizard_home() -> TempDir {
    let home = TempDir::new().expect("create temp dir");
    std::fs::write(
        home.path().join("config.json"),
        r#"{ "verification_delay_ms": 20 }"#,
    )
    .expect("write config");
    home
}

pub fn script_cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("passport_wizard_cli").expect("binary built");
    cmd.env(SCRIPT_ENV, "1").env(HOME_ENV, home.path());
    cmd
}

pub const PERSONAL_SCRIPT: &str = "\
set firstName Ankit
set lastName Sharma
pick dob 1994-05-17
select gender female
set nationality Indian
set nid 123456789012
select passportType ordinary
set address '12 MG Road'
set city Pune
set state Maharashtra
set pincode 400001
set mobile 9876543210
set email ankit@example.in
";

pub const DOCUMENTS_SCRIPT: &str = "\
attach photo photo.jpg
attach idProof aadhaar.pdf
attach addressProof bill.pdf
attach birthCert birth.pdf
";

pub fn apply(workflow: &mut Workflow, commands: Vec<WizardCommand>) {
    for command in commands {
        workflow.dispatch(command).expect("command accepted");
    }
}

pub fn input(field: Field, raw: &str) -> WizardCommand {
    WizardCommand::Input {
        field,
        raw: raw.to_string(),
    }
}

pub fn select(field: Field, value: &str) -> WizardCommand {
    WizardCommand::Select {
        field,
        value: value.to_string(),
    }
}

pub fn pick(field: Field, value: &str) -> WizardCommand {
    WizardCommand::Pick {
        field,
        value: value.to_string(),
    }
}

pub fn attach(field: Field, name: &str) -> WizardCommand {
    WizardCommand::Attach {
        field,
        files: vec![name.to_string()],
    }
}

/// Personal details and documents that pass validation.
pub fn applicant_details() -> Vec<WizardCommand> {
    vec![
        input(Field::FirstName, "Ankit"),
        input(Field::LastName, "Sharma"),
        pick(Field::Dob, "1994-05-17"),
        select(Field::Gender, "Female"),
        input(Field::Nationality, "Indian"),
        input(Field::Nid, "123456789012"),
        select(Field::PassportType, "Ordinary"),
        input(Field::Address, "12 MG Road"),
        input(Field::City, "Pune"),
        input(Field::State, "Maharashtra"),
        input(Field::Pincode, "400001"),
        input(Field::Mobile, "9876543210"),
        input(Field::Email, "ankit@example.in"),
        attach(Field::Photo, "photo.jpg"),
        attach(Field::IdProof, "aadhaar.pdf"),
        attach(Field::AddressProof, "bill.pdf"),
        attach(Field::BirthCert, "birth.pdf"),
    ]
}
