//! Per-step validation rules gating forward navigation.
//!
//! Each pass starts from an empty [`ErrorMap`]; when several rules hit the
//! same field, the last one recorded wins.

use crate::form::sanitizer::is_letter_or_space;
use crate::form::{ErrorMap, Field, FormData, Step};
use crate::payment::{PaymentMethod, PaymentStateMachine, ResultTone, COMPLETE_PAYMENT_MESSAGE};

pub const REQUIRED_MESSAGE: &str = "This field is required.";

const PERSONAL_REQUIRED: [Field; 12] = [
    Field::FirstName,
    Field::LastName,
    Field::Dob,
    Field::Nationality,
    Field::Nid,
    Field::PassportType,
    Field::Address,
    Field::City,
    Field::State,
    Field::Pincode,
    Field::Mobile,
    Field::Email,
];

const LETTERS_ONLY: [Field; 5] = [
    Field::FirstName,
    Field::LastName,
    Field::Nationality,
    Field::City,
    Field::State,
];

pub const DOCUMENT_SLOTS: [Field; 4] = [
    Field::Photo,
    Field::IdProof,
    Field::AddressProof,
    Field::BirthCert,
];

const CARD_REQUIRED: [Field; 4] = [Field::CardName, Field::CardNumber, Field::Expiry, Field::Cvv];

pub fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn has_non_letters(value: &str) -> bool {
    value.chars().any(|ch| !is_letter_or_space(ch))
}

/// `local@domain.tld` with no whitespace or extra `@` in any part.
pub fn is_email_valid(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |part: &str| {
        !part.is_empty() && !part.contains(|ch: char| ch.is_whitespace() || ch == '@')
    };
    if !clean(local) || !clean(domain) {
        return false;
    }
    // Some dot in the domain needs a character on each side.
    domain
        .char_indices()
        .filter(|(_, ch)| *ch == '.')
        .any(|(idx, _)| idx > 0 && idx + 1 < domain.len())
}

/// `name@bank`: at least two of `[A-Za-z0-9._-]`, then at least two letters.
pub fn is_upi_valid(upi: &str) -> bool {
    let Some((handle, bank)) = upi.trim().split_once('@') else {
        return false;
    };
    handle.chars().count() >= 2
        && handle
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'))
        && bank.chars().count() >= 2
        && bank.chars().all(|ch| ch.is_ascii_alphabetic())
}

/// Digit count accepted for a national ID.
///
/// The rule reads "exactly 12 (Aadhaar) or 8 to 16"; twelve already sits in
/// that range, so the observable rule is the range alone.
pub fn is_nid_length_valid(len: usize) -> bool {
    len == 12 || (8..=16).contains(&len)
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub errors: ErrorMap,
    pub passed: bool,
}

/// Stateless rule set evaluated against the current form and payment state.
pub struct StepValidator<'a> {
    form: &'a FormData,
    payment: &'a PaymentStateMachine,
}

impl<'a> StepValidator<'a> {
    pub fn new(form: &'a FormData, payment: &'a PaymentStateMachine) -> Self {
        Self { form, payment }
    }

    /// Clears `errors`, re-populates it with the violations of `step` and
    /// returns whether the step passed. Step 3 may also post a notice in the
    /// payment result area, which is why the payment machine is writable.
    pub fn validate_step(
        form: &FormData,
        payment: &mut PaymentStateMachine,
        errors: &mut ErrorMap,
        step: Step,
    ) -> bool {
        errors.clear_all();
        let validator = StepValidator::new(form, payment);
        let (ok, needs_payment_notice) = match step {
            Step::Personal => (validator.personal(errors), false),
            Step::Documents => (validator.documents(errors), false),
            Step::Payment => validator.payment_step(errors),
            Step::Confirmation => (true, false),
        };
        if needs_payment_notice {
            payment.show_notice(COMPLETE_PAYMENT_MESSAGE, ResultTone::Pending);
        }
        ok
    }

    /// Steps 1 through 3 in order, stopping at the first failure.
    pub fn validate_all(
        form: &FormData,
        payment: &mut PaymentStateMachine,
        errors: &mut ErrorMap,
    ) -> bool {
        [Step::Personal, Step::Documents, Step::Payment]
            .into_iter()
            .all(|step| Self::validate_step(form, payment, errors, step))
    }

    /// Read-only variant used for previews: never touches shared state.
    pub fn report(&self, step: Step) -> StepReport {
        let mut errors = ErrorMap::new();
        let passed = match step {
            Step::Personal => self.personal(&mut errors),
            Step::Documents => self.documents(&mut errors),
            Step::Payment => self.payment_step(&mut errors).0,
            Step::Confirmation => true,
        };
        StepReport { errors, passed }
    }

    fn require(&self, errors: &mut ErrorMap, fields: &[Field]) -> bool {
        let mut ok = true;
        for field in fields {
            if self.form.value(*field).trim().is_empty() {
                errors.set(*field, REQUIRED_MESSAGE);
                ok = false;
            }
        }
        ok
    }

    fn personal(&self, errors: &mut ErrorMap) -> bool {
        let form = self.form;
        let mut ok = self.require(errors, &PERSONAL_REQUIRED);

        if form.value(Field::Gender).is_empty() {
            errors.set(Field::Gender, "Please select a gender.");
            ok = false;
        }

        for field in LETTERS_ONLY {
            let value = form.value(field).trim();
            if !value.is_empty() && has_non_letters(value) {
                errors.set(field, "Only letters and spaces are allowed.");
                ok = false;
            }
        }

        let email = form.value(Field::Email);
        if !email.is_empty() && !is_email_valid(email) {
            errors.set(Field::Email, "Enter a valid email address.");
            ok = false;
        }

        if only_digits(form.value(Field::Pincode)).len() != 6 {
            errors.set(Field::Pincode, "Pincode must be exactly 6 digits.");
            ok = false;
        }

        if only_digits(form.value(Field::Mobile)).len() != 10 {
            errors.set(Field::Mobile, "Mobile number must be exactly 10 digits.");
            ok = false;
        }

        if !is_nid_length_valid(only_digits(form.value(Field::Nid)).len()) {
            errors.set(
                Field::Nid,
                "National ID must be 8–16 digits (Aadhaar: exactly 12).",
            );
            ok = false;
        }

        ok
    }

    fn documents(&self, errors: &mut ErrorMap) -> bool {
        let mut ok = true;
        for slot in DOCUMENT_SLOTS {
            if self.form.files(slot).is_empty() {
                errors.set(slot, "Please upload this document.");
                ok = false;
            }
        }
        ok
    }

    /// Returns `(passed, payment_notice_needed)`.
    fn payment_step(&self, errors: &mut ErrorMap) -> (bool, bool) {
        let Some(method) = selected_method(self.form) else {
            errors.set(Field::PayMethod, "Please select payment method.");
            return (false, false);
        };

        let mut ok = self.method_inputs(method, errors);

        let unpaid = !self.payment.is_paid();
        if unpaid {
            ok = false;
        }

        if !self.form.is_confirmed() {
            errors.set(Field::Confirm, "Please confirm the information.");
            ok = false;
        }

        (ok, unpaid)
    }

    /// Payment-method inputs only: the UPI id, or the four card fields.
    pub fn payment_inputs(&self, errors: &mut ErrorMap) -> bool {
        match selected_method(self.form) {
            Some(method) => self.method_inputs(method, errors),
            None => {
                errors.set(Field::PayMethod, "Please select payment method.");
                false
            }
        }
    }

    fn method_inputs(&self, method: PaymentMethod, errors: &mut ErrorMap) -> bool {
        let form = self.form;
        match method {
            PaymentMethod::Upi => {
                let upi = form.value(Field::UpiId).trim();
                if upi.is_empty() {
                    errors.set(Field::UpiId, "UPI ID is required.");
                    false
                } else if !is_upi_valid(upi) {
                    errors.set(
                        Field::UpiId,
                        "Enter a valid UPI ID (example: ankit@okicici).",
                    );
                    false
                } else {
                    true
                }
            }
            PaymentMethod::Card => {
                let mut ok = self.require(errors, &CARD_REQUIRED);

                let name = form.value(Field::CardName);
                if !name.is_empty() && has_non_letters(name.trim()) {
                    errors.set(Field::CardName, "Only letters and spaces are allowed.");
                    ok = false;
                }

                if only_digits(form.value(Field::CardNumber)).len() != 16 {
                    errors.set(Field::CardNumber, "Card number must be exactly 16 digits.");
                    ok = false;
                }

                if only_digits(form.value(Field::Cvv)).len() != 3 {
                    errors.set(Field::Cvv, "CVV must be exactly 3 digits.");
                    ok = false;
                }
                ok
            }
        }
    }
}

pub fn selected_method(form: &FormData) -> Option<PaymentMethod> {
    form.value(Field::PayMethod).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal_form() -> FormData {
        let mut form = FormData::new();
        form.set_value(Field::FirstName, "Ankit");
        form.set_value(Field::LastName, "Sharma");
        form.set_value(Field::Dob, "1994-05-17");
        form.set_value(Field::Gender, "Male");
        form.set_value(Field::Nationality, "Indian");
        form.set_value(Field::Nid, "123456789012");
        form.set_value(Field::PassportType, "Ordinary");
        form.set_value(Field::Address, "12 MG Road");
        form.set_value(Field::City, "Pune");
        form.set_value(Field::State, "Maharashtra");
        form.set_value(Field::Pincode, "400001");
        form.set_value(Field::Mobile, "9876543210");
        form.set_value(Field::Email, "ankit@example.in");
        form
    }

    fn run(form: &FormData, step: Step) -> (bool, ErrorMap) {
        let mut payment = PaymentStateMachine::new();
        let mut errors = ErrorMap::new();
        let ok = StepValidator::validate_step(form, &mut payment, &mut errors, step);
        (ok, errors)
    }

    #[test]
    fn complete_personal_details_pass() {
        let (ok, errors) = run(&personal_form(), Step::Personal);
        assert!(ok, "{errors:?}");
        assert!(errors.is_empty());
    }

    #[test]
    fn empty_personal_page_flags_every_required_field() {
        let (ok, errors) = run(&FormData::new(), Step::Personal);
        assert!(!ok);
        for field in PERSONAL_REQUIRED {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert_eq!(errors.get(Field::Gender), Some("Please select a gender."));
        assert_eq!(
            errors.get(Field::Pincode),
            Some("Pincode must be exactly 6 digits.")
        );
        assert_eq!(errors.get(Field::FirstName), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn pincode_rules() {
        let mut form = personal_form();
        form.set_value(Field::Pincode, "40001");
        assert!(!run(&form, Step::Personal).0);
        form.set_value(Field::Pincode, "400001");
        assert!(run(&form, Step::Personal).0);
    }

    #[test]
    fn national_id_accepts_eight_to_sixteen_digits() {
        let mut form = personal_form();
        for (nid, valid) in [
            ("123456789012", true),
            ("1234567", false),
            ("12345678", true),
            ("1234567890123456", true),
        ] {
            form.set_value(Field::Nid, nid);
            assert_eq!(run(&form, Step::Personal).0, valid, "nid {nid}");
        }
        assert!(!is_nid_length_valid(17));

        form.set_value(Field::Nid, "1234567");
        assert_eq!(
            run(&form, Step::Personal).1.get(Field::Nid),
            Some("National ID must be 8–16 digits (Aadhaar: exactly 12).")
        );
    }

    #[test]
    fn letters_rule_applies_to_pasted_values() {
        let mut form = personal_form();
        form.set_value(Field::City, "Pune 2");
        let (ok, errors) = run(&form, Step::Personal);
        assert!(!ok);
        assert_eq!(
            errors.get(Field::City),
            Some("Only letters and spaces are allowed.")
        );
    }

    #[test]
    fn email_pattern() {
        assert!(is_email_valid("ankit@example.in"));
        assert!(is_email_valid("  a.b@mail.co.in "));
        assert!(!is_email_valid("ankit@example"));
        assert!(!is_email_valid("ankit example@x.in"));
        assert!(!is_email_valid("ankit@@x.in"));
        assert!(!is_email_valid("@x.in"));
        assert!(!is_email_valid("a@.in"));
        assert!(!is_email_valid("a@x."));
    }

    #[test]
    fn upi_pattern() {
        assert!(is_upi_valid("ankit@okicici"));
        assert!(is_upi_valid("ankit@ok"));
        assert!(is_upi_valid("a.k-_9@sbi"));
        assert!(!is_upi_valid("ankit"));
        assert!(!is_upi_valid("a@okicici"));
        assert!(!is_upi_valid("ankit@o"));
        assert!(!is_upi_valid("ankit@ok1"));
        assert!(!is_upi_valid("an kit@ok"));
    }

    #[test]
    fn documents_need_a_file_in_every_slot() {
        let mut form = FormData::new();
        form.set_files(Field::Photo, vec!["photo.jpg".into()]);
        let (ok, errors) = run(&form, Step::Documents);
        assert!(!ok);
        assert_eq!(errors.len(), 3);
        assert!(!errors.contains(Field::Photo));
        assert_eq!(
            errors.get(Field::BirthCert),
            Some("Please upload this document.")
        );
    }

    #[test]
    fn missing_method_short_circuits() {
        let form = FormData::new();
        let mut payment = PaymentStateMachine::new();
        let mut errors = ErrorMap::new();
        let ok = StepValidator::validate_step(&form, &mut payment, &mut errors, Step::Payment);
        assert!(!ok);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::PayMethod));
        assert!(payment.message().is_empty());
    }

    #[test]
    fn unpaid_payment_step_fails_with_notice() {
        let mut form = FormData::new();
        form.set_value(Field::PayMethod, "UPI");
        form.set_value(Field::UpiId, "ankit@okicici");
        form.set_confirmed(true);
        let mut payment = PaymentStateMachine::new();
        let mut errors = ErrorMap::new();
        let ok = StepValidator::validate_step(&form, &mut payment, &mut errors, Step::Payment);
        assert!(!ok);
        assert!(errors.is_empty());
        assert_eq!(payment.message(), COMPLETE_PAYMENT_MESSAGE);
    }

    #[test]
    fn card_fields_are_checked_only_for_card() {
        let mut form = FormData::new();
        form.set_value(Field::PayMethod, "Card");
        form.set_value(Field::CardName, "Ankit");
        form.set_value(Field::CardNumber, "4111 1111 1111");
        let (_, errors) = run(&form, Step::Payment);
        assert_eq!(
            errors.get(Field::CardNumber),
            Some("Card number must be exactly 16 digits.")
        );
        assert_eq!(errors.get(Field::Cvv), Some("CVV must be exactly 3 digits."));
        assert_eq!(errors.get(Field::Expiry), Some(REQUIRED_MESSAGE));
        assert!(!errors.contains(Field::UpiId));
        assert_eq!(
            errors.get(Field::Confirm),
            Some("Please confirm the information.")
        );
    }

    #[test]
    fn report_leaves_payment_untouched() {
        let form = FormData::new();
        let payment = PaymentStateMachine::new();
        let report = StepValidator::new(&form, &payment).report(Step::Documents);
        assert!(!report.passed);
        assert_eq!(report.errors.len(), 4);
        assert!(StepValidator::new(&form, &payment)
            .report(Step::Confirmation)
            .passed);
    }
}
