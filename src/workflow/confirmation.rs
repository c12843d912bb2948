//! Final Yes/No decision and the lock that follows a confirmed submission.

use tracing::{info, warn};

use super::{Control, Outcome, Workflow};
use crate::form::Step;

pub const INCOMPLETE_ALERT: &str =
    "Some required details are missing or invalid. Please edit and try again.";
pub const SUBMITTED_ALERT: &str = "Confirmed! Your application has been submitted successfully.";
pub const SUBMITTED_NOTE: &str = "✅ Confirmed and submitted. Editing is disabled.";
pub const EDIT_NOTE: &str = "No problem — please edit your information.";
pub const SUBMITTED_STATUS: &str = "Submitted";

impl Workflow {
    pub(crate) fn confirm_yes(&mut self) -> Outcome {
        if self.step != Step::Confirmation {
            return Outcome::Disabled(Control::ConfirmButtons);
        }
        if !self.validate_all() {
            warn!("submission attempted with invalid data");
            self.alert(INCOMPLETE_ALERT);
            self.go_to_step(Step::Personal);
            return Outcome::Rejected;
        }

        self.locked = true;
        self.verifier.cancel();
        self.edit_chooser_visible = false;
        self.step = Step::Confirmation;
        self.status_text = SUBMITTED_STATUS.to_string();
        self.confirm_note = SUBMITTED_NOTE.to_string();
        self.alert(SUBMITTED_ALERT);
        info!(
            txn_id = self.payment.transaction_id().unwrap_or_default(),
            "application submitted"
        );
        Outcome::Applied
    }

    pub(crate) fn confirm_no(&mut self) -> Outcome {
        if self.step != Step::Confirmation {
            return Outcome::Disabled(Control::ConfirmButtons);
        }
        self.confirm_note = EDIT_NOTE.to_string();
        self.edit_chooser_visible = true;
        Outcome::Applied
    }

    /// Edit-chooser button; offers steps 1 to 3 only.
    pub(crate) fn edit(&mut self, target: Step) -> Outcome {
        let chooser_shown = self.step == Step::Confirmation && self.edit_chooser_visible;
        if !chooser_shown || target == Step::Confirmation {
            return Outcome::Disabled(Control::EditChooser);
        }
        self.go_to_step(target);
        Outcome::Applied
    }
}
