//! The single workflow-state object behind the wizard.
//!
//! Front ends translate UI events into [`Command`]s and hand them to
//! [`Workflow::dispatch`]; after each command they read a fresh
//! [`RenderState`] and drain any blocking alerts. Once the application has
//! been submitted, `dispatch` refuses every command before a handler runs, so
//! the lock holds no matter which event arrives.

pub mod command;
pub mod confirmation;
pub mod navigation;
pub mod snapshot;

pub use command::{Command, Control, Outcome};
pub use snapshot::{PaymentView, RenderState, StepMarker};

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tracing::{debug, warn};

use crate::config::WizardConfig;
use crate::errors::{Result, WizardError};
use crate::form::sanitizer::{self, InputEffect};
use crate::form::{DateFormat, ErrorMap, Field, FieldKind, FormData, Step};
use crate::payment::txn::TransactionIdGenerator;
use crate::payment::verifier::{PaymentVerifier, VerificationEvent};
use crate::payment::{PaymentMethod, PaymentState, PaymentStateMachine};
use crate::review::{ReviewItem, PLACEHOLDER};
use crate::validation::{selected_method, StepValidator};

pub const PRIOR_STEPS_ALERT: &str =
    "Please complete Step 1 and Step 2 correctly before making payment.";
pub const PAYMENT_DETAILS_ALERT: &str = "Please correct payment details and try again.";

pub struct Workflow {
    config: WizardConfig,
    form: FormData,
    errors: ErrorMap,
    step: Step,
    status_text: String,
    payment: PaymentStateMachine,
    txn_ids: TransactionIdGenerator,
    verifier: PaymentVerifier,
    review: Vec<ReviewItem>,
    edit_chooser_visible: bool,
    confirm_note: String,
    locked: bool,
    alerts: Vec<String>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(WizardConfig::default())
    }
}

impl Workflow {
    pub fn new(config: WizardConfig) -> Self {
        let mut form = FormData::new();
        form.set_value(Field::Fee, config.application_fee.clone());

        let mut workflow = Self {
            txn_ids: TransactionIdGenerator::new(config.transaction_prefix.clone()),
            verifier: PaymentVerifier::new(config.verification_delay()),
            config,
            form,
            errors: ErrorMap::new(),
            step: Step::Personal,
            status_text: String::new(),
            payment: PaymentStateMachine::new(),
            review: Vec::new(),
            edit_chooser_visible: false,
            confirm_note: String::new(),
            locked: false,
            alerts: Vec::new(),
        };
        workflow.go_to_step(Step::Personal);
        workflow
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn payment(&self) -> &PaymentStateMachine {
        &self.payment
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Blocking alerts raised since the last call, oldest first.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Applies one UI event.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        if self.locked {
            debug!(command = command.name(), "form is locked; command ignored");
            return Ok(Outcome::Ignored);
        }

        let outcome = match command {
            Command::Input { field, raw } => self.input(field, &raw)?,
            Command::Key { field, key } => self.key(field, key),
            Command::Pick { field, value } => self.pick(field, &value)?,
            Command::Select { field, value } => self.select(field, &value)?,
            Command::Attach { field, files } => self.attach(field, files)?,
            Command::SetConfirm(checked) => self.set_confirm(checked),
            Command::Next => self.next(),
            Command::Prev => self.prev(),
            Command::GoTo(target) => self.jump_to(target),
            Command::GeneratePayment => self.generate_payment(),
            Command::VerifyPayment => self.verify_payment()?,
            Command::ConfirmYes => self.confirm_yes(),
            Command::ConfirmNo => self.confirm_no(),
            Command::Edit(target) => self.edit(target),
        };

        if outcome != Outcome::Applied {
            debug!(?outcome, "command did not apply");
        }
        Ok(outcome)
    }

    /// Applies every verification result that has already arrived and
    /// returns how many were applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.verifier.try_next() {
            if self.apply_verification(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the in-flight verification, if any, and applies it.
    pub async fn wait_for_verification(&mut self) -> bool {
        while !self.locked && self.payment.is_verifying() && self.verifier.is_in_flight() {
            let Some(event) = self.verifier.next().await else {
                break;
            };
            if self.apply_verification(event) {
                return true;
            }
        }
        self.poll_events() > 0
    }

    fn apply_verification(&mut self, event: VerificationEvent) -> bool {
        if self.locked {
            return false;
        }
        match event {
            VerificationEvent::Completed { txn_id } => self.payment.complete_verification(&txn_id),
        }
    }

    fn input(&mut self, field: Field, raw: &str) -> Result<Outcome> {
        let effect = sanitizer::apply_input(&mut self.form, &mut self.errors, field, raw)?;
        Ok(match effect {
            InputEffect::Accepted | InputEffect::Stripped(_) => Outcome::Applied,
            InputEffect::Blocked => Outcome::Ignored,
        })
    }

    fn key(&mut self, field: Field, key: KeyCode) -> Outcome {
        if sanitizer::key_allowed(field, &key) {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }

    fn pick(&mut self, field: Field, value: &str) -> Result<Outcome> {
        let FieldKind::Date(format) = field.kind() else {
            return Err(WizardError::UnsupportedInput(field.key()));
        };
        let value = value.trim();
        if value.is_empty() {
            self.form.set_value(field, "");
            return Ok(Outcome::Applied);
        }
        let parsed = match format {
            DateFormat::Day => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| date.format("%Y-%m-%d").to_string()),
            DateFormat::Month => NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
                .map(|date| date.format("%Y-%m").to_string()),
        };
        let normalized = parsed.map_err(|_| WizardError::InvalidPick {
            field: field.key(),
            value: value.to_string(),
            format: format.pattern(),
        })?;
        self.form.set_value(field, normalized);
        Ok(Outcome::Applied)
    }

    fn select(&mut self, field: Field, value: &str) -> Result<Outcome> {
        let FieldKind::Choice(options) = field.kind() else {
            return Err(WizardError::UnsupportedInput(field.key()));
        };
        let needle = value.trim();
        let choice = options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(needle))
            .ok_or_else(|| WizardError::InvalidChoice {
                field: field.key(),
                value: needle.to_string(),
                options: options.join(", "),
            })?;
        self.form.set_value(field, *choice);

        if field == Field::PayMethod {
            // Switching method drops stale errors from the other panel.
            self.errors.clear_all();
            self.payment.clear_message();
        }
        Ok(Outcome::Applied)
    }

    fn attach(&mut self, field: Field, files: Vec<String>) -> Result<Outcome> {
        if *field.kind() != FieldKind::File {
            return Err(WizardError::UnsupportedInput(field.key()));
        }
        let files = files
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self.form.set_files(field, files);
        Ok(Outcome::Applied)
    }

    fn set_confirm(&mut self, checked: bool) -> Outcome {
        if !self.payment.controls().confirm_checkbox {
            return Outcome::Disabled(Control::ConfirmCheckbox);
        }
        self.form.set_confirmed(checked);
        Outcome::Applied
    }

    pub(crate) fn validate_step(&mut self, step: Step) -> bool {
        StepValidator::validate_step(&self.form, &mut self.payment, &mut self.errors, step)
    }

    pub(crate) fn validate_all(&mut self) -> bool {
        StepValidator::validate_all(&self.form, &mut self.payment, &mut self.errors)
    }

    fn generate_payment(&mut self) -> Outcome {
        if !self.payment.can_generate() {
            return Outcome::Disabled(Control::GeneratePayment);
        }

        let prior_ok = self.validate_step(Step::Personal) && self.validate_step(Step::Documents);
        if !prior_ok {
            warn!("payment requested before steps 1 and 2 were valid");
            self.alert(PRIOR_STEPS_ALERT);
            self.go_to_step(Step::Personal);
            return Outcome::Rejected;
        }

        let inputs_ok = StepValidator::new(&self.form, &self.payment).payment_inputs(&mut self.errors);
        let method = selected_method(&self.form);
        let (true, Some(method)) = (inputs_ok, method) else {
            warn!("payment requested with invalid payment details");
            self.alert(PAYMENT_DETAILS_ALERT);
            return Outcome::Rejected;
        };

        let txn_id = self.txn_ids.generate();
        self.payment.mark_pending(method, txn_id);
        Outcome::Applied
    }

    fn verify_payment(&mut self) -> Result<Outcome> {
        let Some(txn_id) = self.payment.begin_verification() else {
            return Ok(Outcome::Disabled(Control::VerifyPayment));
        };
        if let Err(err) = self.verifier.start(txn_id) {
            self.payment.abort_verification();
            return Err(err);
        }
        Ok(Outcome::Applied)
    }

    pub(crate) fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn snapshot(&self) -> RenderState {
        let method = selected_method(&self.form);
        let mut controls = self.payment.controls();
        if self.locked {
            controls.generate = false;
            controls.verify = false;
            controls.confirm_checkbox = false;
            controls.next_to_review = false;
        }

        RenderState {
            step: self.step,
            status_text: self.status_text.clone(),
            stepper: Step::ALL
                .iter()
                .map(|step| (*step, StepMarker::for_step(*step, self.step, self.locked)))
                .collect(),
            errors: self
                .errors
                .iter()
                .map(|(field, message)| (field, message.to_string()))
                .collect(),
            payment: PaymentView {
                state: self.payment.state(),
                message: self.payment.message().to_string(),
                tone: self.payment.tone(),
                txn_display: self
                    .payment
                    .transaction_id()
                    .unwrap_or(PLACEHOLDER)
                    .to_string(),
                method,
                upi_panel_visible: method == Some(PaymentMethod::Upi),
                card_panel_visible: method == Some(PaymentMethod::Card),
                fee: self.form.value(Field::Fee).to_string(),
                fee_paid: self.payment.state() == PaymentState::Paid,
                controls,
            },
            confirm_checked: self.form.is_confirmed(),
            review: (self.step == Step::Confirmation).then(|| self.review.clone()),
            edit_chooser_visible: self.edit_chooser_visible,
            confirm_note: self.confirm_note.clone(),
            locked: self.locked,
        }
    }
}
