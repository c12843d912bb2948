use crate::form::{Field, Step};
use crate::payment::{PaymentControls, PaymentMethod, PaymentState, ResultTone};
use crate::review::ReviewItem;

/// Stepper button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Upcoming,
    Active,
    Done,
    /// Every step after a confirmed submission.
    Complete,
}

impl StepMarker {
    pub fn for_step(step: Step, current: Step, locked: bool) -> Self {
        if locked {
            StepMarker::Complete
        } else if step == current {
            StepMarker::Active
        } else if step < current {
            StepMarker::Done
        } else {
            StepMarker::Upcoming
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentView {
    pub state: PaymentState,
    pub message: String,
    pub tone: ResultTone,
    /// Transaction id, or a dash before one exists.
    pub txn_display: String,
    pub method: Option<PaymentMethod>,
    pub upi_panel_visible: bool,
    pub card_panel_visible: bool,
    pub fee: String,
    pub fee_paid: bool,
    pub controls: PaymentControls,
}

/// Everything a front end needs to draw the wizard after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub step: Step,
    pub status_text: String,
    pub stepper: Vec<(Step, StepMarker)>,
    pub errors: Vec<(Field, String)>,
    pub payment: PaymentView,
    pub confirm_checked: bool,
    /// Present only while the confirmation page is visible.
    pub review: Option<Vec<ReviewItem>>,
    pub edit_chooser_visible: bool,
    pub confirm_note: String,
    pub locked: bool,
}

impl RenderState {
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| message.as_str())
    }
}
