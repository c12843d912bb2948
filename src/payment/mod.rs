//! Simulated payment state machine: UNPAID → PENDING → PAID.
//!
//! This module only tracks state and what each state permits. The
//! preconditions that involve other pages (steps 1 and 2 must validate before
//! a request can be generated) are orchestrated by the workflow, and the
//! confirmation round-trip is driven by [`verifier::PaymentVerifier`].

pub mod txn;
pub mod verifier;

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::errors::{Result, WizardError};
use crate::form::PAYMENT_METHOD_OPTIONS;

pub const VERIFYING_MESSAGE: &str = "Verifying payment... please wait (Demo).";
pub const VERIFY_FAILED_MESSAGE: &str = "Verification could not be started. Please try again.";
pub const COMPLETE_PAYMENT_MESSAGE: &str = "Please complete payment verification to continue.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentState {
    #[default]
    Unpaid,
    Pending,
    Paid,
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentState::Unpaid => "UNPAID",
            PaymentState::Pending => "PENDING",
            PaymentState::Paid => "PAID",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Upi,
    Card,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
        }
    }

    fn pending_message(self, txn_id: &str) -> String {
        match self {
            PaymentMethod::Upi => format!(
                "Payment request generated. Please approve the request in your UPI app. Txn ID: {txn_id}"
            ),
            PaymentMethod::Card => format!(
                "Redirecting to bank gateway (Demo). Please verify to complete payment. Txn ID: {txn_id}"
            ),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upi" => Ok(PaymentMethod::Upi),
            "card" => Ok(PaymentMethod::Card),
            other => Err(WizardError::InvalidChoice {
                field: "payMethod",
                value: other.to_string(),
                options: PAYMENT_METHOD_OPTIONS.join(", "),
            }),
        }
    }
}

/// Styling hint for the payment result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultTone {
    #[default]
    Plain,
    Pending,
    Processing,
    Paid,
}

impl ResultTone {
    pub fn css_class(self) -> &'static str {
        match self {
            ResultTone::Plain => "",
            ResultTone::Pending => "pending",
            ResultTone::Processing => "processing",
            ResultTone::Paid => "paid",
        }
    }
}

/// Which payment-related controls are enabled in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentControls {
    pub generate: bool,
    pub verify: bool,
    pub confirm_checkbox: bool,
    pub next_to_review: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentStateMachine {
    state: PaymentState,
    pending_txn: Option<String>,
    message: String,
    tone: ResultTone,
    verifying: bool,
}

impl PaymentStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    pub fn is_paid(&self) -> bool {
        self.state == PaymentState::Paid
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.pending_txn.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tone(&self) -> ResultTone {
        self.tone
    }

    pub fn is_verifying(&self) -> bool {
        self.verifying
    }

    pub fn controls(&self) -> PaymentControls {
        let paid = self.is_paid();
        PaymentControls {
            generate: self.state == PaymentState::Unpaid,
            verify: self.state == PaymentState::Pending && !self.verifying,
            confirm_checkbox: paid,
            next_to_review: paid,
        }
    }

    pub fn can_generate(&self) -> bool {
        self.state == PaymentState::Unpaid
    }

    /// UNPAID → PENDING. Returns false (and changes nothing) from any other state.
    pub fn mark_pending(&mut self, method: PaymentMethod, txn_id: String) -> bool {
        if self.state != PaymentState::Unpaid {
            debug!(state = %self.state, "payment request ignored");
            return false;
        }
        self.message = method.pending_message(&txn_id);
        self.tone = ResultTone::Pending;
        info!(txn_id = %txn_id, method = method.label(), "payment request generated");
        self.pending_txn = Some(txn_id);
        self.state = PaymentState::Pending;
        true
    }

    /// Starts verification of the pending request, returning the transaction
    /// id to confirm. `None` unless PENDING with no verification in flight.
    pub fn begin_verification(&mut self) -> Option<String> {
        if self.state != PaymentState::Pending || self.verifying {
            debug!(state = %self.state, verifying = self.verifying, "verification ignored");
            return None;
        }
        let txn_id = self.pending_txn.clone()?;
        self.verifying = true;
        self.message = VERIFYING_MESSAGE.to_string();
        self.tone = ResultTone::Processing;
        Some(txn_id)
    }

    /// Rolls back a verification that could not be scheduled.
    pub fn abort_verification(&mut self) {
        self.verifying = false;
        self.message = VERIFY_FAILED_MESSAGE.to_string();
        self.tone = ResultTone::Pending;
    }

    /// PENDING → PAID once the confirmation for `txn_id` arrives.
    pub fn complete_verification(&mut self, txn_id: &str) -> bool {
        let matches = self.pending_txn.as_deref() == Some(txn_id);
        if self.state != PaymentState::Pending || !self.verifying || !matches {
            debug!(txn_id, state = %self.state, "stale verification result discarded");
            return false;
        }
        self.verifying = false;
        self.state = PaymentState::Paid;
        self.message = format!("Payment successful (Demo). Transaction ID: {txn_id}");
        self.tone = ResultTone::Paid;
        info!(txn_id, "payment verified");
        true
    }

    /// Shows an informational line in the result area without changing state.
    pub fn show_notice(&mut self, message: impl Into<String>, tone: ResultTone) {
        self.message = message.into();
        self.tone = tone;
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
        self.tone = ResultTone::Plain;
    }
}
