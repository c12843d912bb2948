use std::fmt;

use crossterm::event::KeyCode;

use crate::form::{Field, Step};

/// One UI event, consumed by [`Workflow::dispatch`](super::Workflow::dispatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Keystroke-driven text input; the whole new value of the field.
    Input { field: Field, raw: String },
    /// A raw key press while `field` has focus.
    Key { field: Field, key: KeyCode },
    /// Value chosen through a date/month picker; empty clears the field.
    Pick { field: Field, value: String },
    /// Radio or select choice.
    Select { field: Field, value: String },
    /// Files chosen for an upload slot; an empty list clears it.
    Attach { field: Field, files: Vec<String> },
    SetConfirm(bool),
    Next,
    Prev,
    /// Stepper click.
    GoTo(Step),
    GeneratePayment,
    VerifyPayment,
    ConfirmYes,
    ConfirmNo,
    /// Edit-chooser button.
    Edit(Step),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Input { .. } => "input",
            Command::Key { .. } => "key",
            Command::Pick { .. } => "pick",
            Command::Select { .. } => "select",
            Command::Attach { .. } => "attach",
            Command::SetConfirm(_) => "set-confirm",
            Command::Next => "next",
            Command::Prev => "prev",
            Command::GoTo(_) => "goto",
            Command::GeneratePayment => "generate-payment",
            Command::VerifyPayment => "verify-payment",
            Command::ConfirmYes => "confirm-yes",
            Command::ConfirmNo => "confirm-no",
            Command::Edit(_) => "edit",
        }
    }
}

/// Controls that can be disabled or hidden depending on state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Next,
    Prev,
    GeneratePayment,
    VerifyPayment,
    ConfirmCheckbox,
    ConfirmButtons,
    EditChooser,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Control::Next => "Next",
            Control::Prev => "Previous",
            Control::GeneratePayment => "Generate Payment Request",
            Control::VerifyPayment => "Verify Payment",
            Control::ConfirmCheckbox => "Confirmation checkbox",
            Control::ConfirmButtons => "Yes/No confirmation",
            Control::EditChooser => "Edit chooser",
        })
    }
}

/// What a dispatched command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command took effect.
    Applied,
    /// A validation gate refused it; errors and an alert explain why.
    Rejected,
    /// The command had no effect in the current state.
    Ignored,
    /// The control behind the command is disabled or not visible.
    Disabled(Control),
}
