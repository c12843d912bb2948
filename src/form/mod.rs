//! Field catalogue and the flat form model shared by every wizard component.
//!
//! The descriptor table plays the same role as a wizard's field list: it
//! records which page owns a field, how it is labelled, and which input
//! restriction applies while the user types.

pub mod sanitizer;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::errors::{Result, WizardError};

/// One page of the four-page wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Personal = 1,
    Documents = 2,
    Payment = 3,
    Confirmation = 4,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::Personal,
        Step::Documents,
        Step::Payment,
        Step::Confirmation,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(Step::Personal),
            2 => Ok(Step::Documents),
            3 => Ok(Step::Payment),
            4 => Ok(Step::Confirmation),
            other => Err(WizardError::InvalidStep(other.to_string())),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Personal => "Personal Details",
            Step::Documents => "Documents",
            Step::Payment => "Payment",
            Step::Confirmation => "Confirmation",
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1).ok()
    }

    pub fn prev(self) -> Option<Step> {
        self.number()
            .checked_sub(1)
            .and_then(|n| Step::from_number(n).ok())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}", self.number())
    }
}

impl FromStr for Step {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        trimmed
            .parse::<u8>()
            .map_err(|_| WizardError::InvalidStep(trimmed.to_string()))
            .and_then(Step::from_number)
    }
}

/// Every named control on the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Dob,
    Gender,
    Nationality,
    Nid,
    PassportType,
    Address,
    City,
    State,
    Pincode,
    Mobile,
    Email,
    Photo,
    IdProof,
    AddressProof,
    BirthCert,
    Fee,
    PayMethod,
    UpiId,
    CardName,
    CardNumber,
    Expiry,
    Cvv,
    Confirm,
}

impl Field {
    /// Wire name of the field, as used in error keys and commands.
    pub fn key(self) -> &'static str {
        self.descriptor().key
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    pub fn kind(self) -> &'static FieldKind {
        &self.descriptor().kind
    }

    pub fn step(self) -> Step {
        self.descriptor().step
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        PASSPORT_FORM
            .fields
            .iter()
            .find(|descriptor| descriptor.field == self)
            .unwrap_or_else(|| unreachable!("every field has a descriptor"))
    }

    pub fn all() -> impl Iterator<Item = Field> {
        PASSPORT_FORM.fields.iter().map(|descriptor| descriptor.field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        PASSPORT_FORM
            .fields
            .iter()
            .find(|descriptor| descriptor.key.eq_ignore_ascii_case(needle))
            .map(|descriptor| descriptor.field)
            .ok_or_else(|| WizardError::UnknownField(needle.to_string()))
    }
}

/// Calendar granularity accepted by a picker-only field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    Day,
    /// `YYYY-MM`
    Month,
}

impl DateFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Day => "YYYY-MM-DD",
            DateFormat::Month => "YYYY-MM",
        }
    }
}

/// Input restriction and storage shape of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text with no live restriction.
    Text,
    /// Letters and whitespace only.
    Letters,
    /// Digits only, truncated to `max` characters.
    Digits { max: usize },
    /// Set through a picker; keyboard typing is blocked.
    Date(DateFormat),
    /// Radio group or select with a fixed option list.
    Choice(&'static [&'static str]),
    /// File-upload slot; only the selected names are kept.
    File,
    Checkbox,
    /// Displayed but never edited by the user.
    ReadOnly,
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub field: Field,
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub step: Step,
}

impl FieldDescriptor {
    pub fn new(
        field: Field,
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
        step: Step,
    ) -> Self {
        Self {
            field,
            key,
            label,
            kind,
            step,
        }
    }
}

/// Ordered field list for a whole wizard.
pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    pub fn fields_for(&self, step: Step) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(move |descriptor| descriptor.step == step)
    }
}

pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Other"];
pub const PASSPORT_TYPE_OPTIONS: &[&str] = &["Ordinary", "Official", "Diplomatic"];
pub const PAYMENT_METHOD_OPTIONS: &[&str] = &["UPI", "Card"];

pub static PASSPORT_FORM: Lazy<FormDescriptor> = Lazy::new(|| {
    use FieldKind::*;
    use Step::*;

    FormDescriptor::new(
        "passport_application",
        vec![
            FieldDescriptor::new(Field::FirstName, "firstName", "First Name", Letters, Personal),
            FieldDescriptor::new(Field::LastName, "lastName", "Last Name", Letters, Personal),
            FieldDescriptor::new(
                Field::Dob,
                "dob",
                "Date of Birth",
                Date(DateFormat::Day),
                Personal,
            ),
            FieldDescriptor::new(
                Field::Gender,
                "gender",
                "Gender",
                Choice(GENDER_OPTIONS),
                Personal,
            ),
            FieldDescriptor::new(
                Field::Nationality,
                "nationality",
                "Nationality",
                Letters,
                Personal,
            ),
            FieldDescriptor::new(
                Field::Nid,
                "nid",
                "National ID",
                Digits { max: 16 },
                Personal,
            ),
            FieldDescriptor::new(
                Field::PassportType,
                "passportType",
                "Passport Type",
                Choice(PASSPORT_TYPE_OPTIONS),
                Personal,
            ),
            FieldDescriptor::new(Field::Address, "address", "Address", Text, Personal),
            FieldDescriptor::new(Field::City, "city", "City", Letters, Personal),
            FieldDescriptor::new(Field::State, "state", "State", Letters, Personal),
            FieldDescriptor::new(
                Field::Pincode,
                "pincode",
                "Pincode",
                Digits { max: 6 },
                Personal,
            ),
            FieldDescriptor::new(
                Field::Mobile,
                "mobile",
                "Mobile",
                Digits { max: 10 },
                Personal,
            ),
            FieldDescriptor::new(Field::Email, "email", "Email", Text, Personal),
            FieldDescriptor::new(Field::Photo, "photo", "Photograph File", File, Documents),
            FieldDescriptor::new(
                Field::IdProof,
                "idProof",
                "Identity Proof File",
                File,
                Documents,
            ),
            FieldDescriptor::new(
                Field::AddressProof,
                "addressProof",
                "Address Proof File",
                File,
                Documents,
            ),
            FieldDescriptor::new(
                Field::BirthCert,
                "birthCert",
                "Birth Certificate File",
                File,
                Documents,
            ),
            FieldDescriptor::new(Field::Fee, "fee", "Application Fee", ReadOnly, Payment),
            FieldDescriptor::new(
                Field::PayMethod,
                "payMethod",
                "Payment Method",
                Choice(PAYMENT_METHOD_OPTIONS),
                Payment,
            ),
            FieldDescriptor::new(Field::UpiId, "upiId", "UPI ID", Text, Payment),
            FieldDescriptor::new(
                Field::CardName,
                "cardName",
                "Card Holder Name",
                Letters,
                Payment,
            ),
            FieldDescriptor::new(
                Field::CardNumber,
                "cardNumber",
                "Card Number",
                Digits { max: 16 },
                Payment,
            ),
            FieldDescriptor::new(
                Field::Expiry,
                "expiry",
                "Expiry",
                Date(DateFormat::Month),
                Payment,
            ),
            FieldDescriptor::new(Field::Cvv, "cvv", "CVV", Digits { max: 3 }, Payment),
            FieldDescriptor::new(Field::Confirm, "confirm", "Confirmation", Checkbox, Payment),
        ],
    )
});

/// Current value of every control on the form.
///
/// Text inputs, radio groups and selects all live in one string map; upload
/// slots keep the selected file names; the confirm checkbox is a flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<Field, String>,
    files: BTreeMap<Field, Vec<String>>,
    confirmed: bool,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a text/radio/select field, or `""` when never set.
    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }

    pub fn files(&self, field: Field) -> &[String] {
        self.files.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_file(&self, field: Field) -> Option<&str> {
        self.files(field).first().map(String::as_str)
    }

    pub fn set_files(&mut self, field: Field, files: Vec<String>) {
        if files.is_empty() {
            self.files.remove(&field);
        } else {
            self.files.insert(field, files);
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn set_confirmed(&mut self, confirmed: bool) {
        self.confirmed = confirmed;
    }
}

/// Field name to inline message. Rebuilt from scratch on every validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: BTreeMap<Field, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`, replacing any earlier message. An empty
    /// message clears the entry.
    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            self.entries.remove(&field);
        } else {
            self.entries.insert(field, message);
        }
    }

    pub fn clear(&mut self, field: Field) {
        self.entries.remove(&field);
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}
