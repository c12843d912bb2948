//! Live input restrictions applied on every keystroke.

use crossterm::event::{KeyCode, ModifierKeyCode};

use super::{ErrorMap, Field, FieldKind, FormData};
use crate::errors::{Result, WizardError};

pub const LETTERS_ONLY_MESSAGE: &str = "Only letters and spaces are allowed.";
pub const DIGITS_ONLY_MESSAGE: &str = "Only digits are allowed.";

/// Result of cleaning one raw input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub value: String,
    /// True when at least one character was removed or the value was truncated.
    pub stripped: bool,
}

/// What an input event did to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEffect {
    /// Value stored unchanged.
    Accepted,
    /// Value stored after disallowed characters were removed.
    Stripped(String),
    /// Keyboard entry is not allowed for this field; nothing changed.
    Blocked,
}

pub fn is_letter_or_space(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch.is_whitespace()
}

pub fn keep_letters_spaces(raw: &str) -> Sanitized {
    let value: String = raw.chars().filter(|ch| is_letter_or_space(*ch)).collect();
    Sanitized {
        stripped: value != raw,
        value,
    }
}

pub fn keep_digits(raw: &str, max: usize) -> Sanitized {
    let value: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(max)
        .collect();
    Sanitized {
        stripped: value != raw,
        value,
    }
}

/// Keys a picker-only field still reacts to: focus movement and dismissal.
pub fn is_navigation_key(code: &KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Esc
            | KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift)
    )
}

/// Whether a raw key press reaches `field`. Only date fields filter keys.
pub fn key_allowed(field: Field, code: &KeyCode) -> bool {
    match field.kind() {
        FieldKind::Date(_) => is_navigation_key(code),
        _ => true,
    }
}

/// Applies a keystroke-driven input event to `field`, updating the stored
/// value and the field's inline error in place.
pub fn apply_input(
    form: &mut FormData,
    errors: &mut ErrorMap,
    field: Field,
    raw: &str,
) -> Result<InputEffect> {
    let (sanitized, message) = match field.kind() {
        FieldKind::Letters => (keep_letters_spaces(raw), LETTERS_ONLY_MESSAGE),
        FieldKind::Digits { max } => (keep_digits(raw, *max), DIGITS_ONLY_MESSAGE),
        FieldKind::Text => {
            form.set_value(field, raw);
            return Ok(InputEffect::Accepted);
        }
        FieldKind::Date(_) => return Ok(InputEffect::Blocked),
        FieldKind::Choice(_) | FieldKind::File | FieldKind::Checkbox | FieldKind::ReadOnly => {
            return Err(WizardError::UnsupportedInput(field.key()));
        }
    };

    form.set_value(field, sanitized.value.clone());
    if sanitized.stripped {
        errors.set(field, message);
        Ok(InputEffect::Stripped(sanitized.value))
    } else {
        errors.clear(field);
        Ok(InputEffect::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_fields_drop_digits_and_symbols() {
        let cleaned = keep_letters_spaces("Ank1t Sh@rma");
        assert_eq!(cleaned.value, "Ankt Shrma");
        assert!(cleaned.stripped);
        assert!(!keep_letters_spaces("Mary Ann").stripped);
    }

    #[test]
    fn digit_fields_strip_then_truncate() {
        assert_eq!(keep_digits("4000a1", 6).value, "40001");
        let long = keep_digits("98765432101", 10);
        assert_eq!(long.value, "9876543210");
        assert!(long.stripped);
        assert!(!keep_digits("123", 3).stripped);
    }

    #[test]
    fn stripped_input_sets_and_clean_input_clears_error() {
        let mut form = FormData::new();
        let mut errors = ErrorMap::new();

        let effect = apply_input(&mut form, &mut errors, Field::Pincode, "4000a1").unwrap();
        assert_eq!(effect, InputEffect::Stripped("40001".into()));
        assert_eq!(form.value(Field::Pincode), "40001");
        assert_eq!(errors.get(Field::Pincode), Some(DIGITS_ONLY_MESSAGE));

        let effect = apply_input(&mut form, &mut errors, Field::Pincode, "400001").unwrap();
        assert_eq!(effect, InputEffect::Accepted);
        assert!(errors.get(Field::Pincode).is_none());
    }

    #[test]
    fn card_name_is_letters_only() {
        let mut form = FormData::new();
        let mut errors = ErrorMap::new();
        apply_input(&mut form, &mut errors, Field::CardName, "J0hn").unwrap();
        assert_eq!(form.value(Field::CardName), "Jhn");
        assert_eq!(errors.get(Field::CardName), Some(LETTERS_ONLY_MESSAGE));
    }

    #[test]
    fn national_id_keeps_at_most_sixteen_digits() {
        let mut form = FormData::new();
        let mut errors = ErrorMap::new();
        apply_input(&mut form, &mut errors, Field::Nid, "12345678901234567890").unwrap();
        assert_eq!(form.value(Field::Nid), "1234567890123456");
    }

    #[test]
    fn date_fields_block_typing() {
        let mut form = FormData::new();
        let mut errors = ErrorMap::new();
        let effect = apply_input(&mut form, &mut errors, Field::Dob, "1990-01-01").unwrap();
        assert_eq!(effect, InputEffect::Blocked);
        assert_eq!(form.value(Field::Dob), "");

        assert!(key_allowed(Field::Dob, &KeyCode::Tab));
        assert!(key_allowed(Field::Expiry, &KeyCode::Esc));
        assert!(key_allowed(
            Field::Expiry,
            &KeyCode::Modifier(ModifierKeyCode::LeftShift)
        ));
        assert!(!key_allowed(Field::Dob, &KeyCode::Char('1')));
        assert!(!key_allowed(Field::Dob, &KeyCode::Backspace));
        assert!(key_allowed(Field::Mobile, &KeyCode::Char('1')));
    }

    #[test]
    fn free_text_is_stored_verbatim() {
        let mut form = FormData::new();
        let mut errors = ErrorMap::new();
        apply_input(&mut form, &mut errors, Field::Email, "a@b.co").unwrap();
        assert_eq!(form.value(Field::Email), "a@b.co");
    }

    #[test]
    fn radio_fields_reject_typed_input() {
        let mut form = FormData::new();
        let mut errors = ErrorMap::new();
        assert!(matches!(
            apply_input(&mut form, &mut errors, Field::Gender, "Male"),
            Err(WizardError::UnsupportedInput("gender"))
        ));
    }
}
