//! Read-only summary shown on the confirmation page.

use crate::form::{Field, FormData};
use crate::validation::only_digits;

pub const PLACEHOLDER: &str = "—";

const REVIEW_ORDER: [Field; 22] = [
    Field::FirstName,
    Field::LastName,
    Field::Dob,
    Field::Gender,
    Field::Nationality,
    Field::Nid,
    Field::PassportType,
    Field::City,
    Field::State,
    Field::Pincode,
    Field::Mobile,
    Field::Email,
    Field::Address,
    Field::Photo,
    Field::IdProof,
    Field::AddressProof,
    Field::BirthCert,
    Field::Fee,
    Field::PayMethod,
    Field::CardName,
    Field::CardNumber,
    Field::Expiry,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub label: &'static str,
    pub value: String,
}

pub fn safe_value(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `•••• •••• •••• 1234`, built from the digits of the raw value.
pub fn mask_card_number(raw: &str) -> String {
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }
    let digits = only_digits(raw);
    let tail = &digits[digits.len().saturating_sub(4)..];
    format!("•••• •••• •••• {tail}")
}

pub fn build_review(form: &FormData) -> Vec<ReviewItem> {
    REVIEW_ORDER
        .iter()
        .map(|field| {
            let value = match field {
                Field::Photo | Field::IdProof | Field::AddressProof | Field::BirthCert => form
                    .first_file(*field)
                    .unwrap_or(PLACEHOLDER)
                    .to_string(),
                Field::CardNumber => mask_card_number(form.value(*field)),
                other => safe_value(form.value(*other)),
            };
            ReviewItem {
                label: field.label(),
                value,
            }
        })
        .collect()
}
