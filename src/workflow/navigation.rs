use tracing::{debug, info};

use super::{Command, Control, Outcome, Workflow};
use crate::form::Step;
use crate::review::build_review;

pub const FIX_ERRORS_ALERT: &str = "Please fix the errors in this step before continuing.";

impl Workflow {
    /// Shows `step` unconditionally. The edit chooser lives on the
    /// confirmation page, so any page change hides it; entering that page
    /// also rebuilds the review and clears the confirmation note.
    pub(crate) fn go_to_step(&mut self, step: Step) {
        self.edit_chooser_visible = false;
        if step == Step::Confirmation {
            self.review = build_review(&self.form);
            self.confirm_note.clear();
        }
        if self.step != step {
            debug!(from = %self.step, to = %step, "step changed");
        }
        self.step = step;
        self.status_text = step.to_string();
    }

    pub(crate) fn next(&mut self) -> Outcome {
        let Some(target) = self.step.next() else {
            return Outcome::Disabled(Control::Next);
        };
        if self.step == Step::Payment && !self.payment.is_paid() {
            return Outcome::Disabled(Control::Next);
        }
        if !self.validate_step(self.step) {
            self.alert(FIX_ERRORS_ALERT);
            return Outcome::Rejected;
        }
        info!(step = %target, "advanced");
        self.go_to_step(target);
        Outcome::Applied
    }

    pub(crate) fn prev(&mut self) -> Outcome {
        match self.step.prev() {
            Some(target) => {
                self.go_to_step(target);
                Outcome::Applied
            }
            None => Outcome::Disabled(Control::Prev),
        }
    }

    /// Stepper click. Moving forward requires the current step to pass;
    /// moving back or staying put never does.
    pub(crate) fn jump_to(&mut self, target: Step) -> Outcome {
        if target > self.step && !self.validate_step(self.step) {
            self.alert(FIX_ERRORS_ALERT);
            return Outcome::Rejected;
        }
        self.go_to_step(target);
        Outcome::Applied
    }

    /// Convenience for front ends that number steps from 1.
    pub fn jump_to_number(&mut self, number: u8) -> crate::errors::Result<Outcome> {
        let target = Step::from_number(number)?;
        self.dispatch(Command::GoTo(target))
    }
}
