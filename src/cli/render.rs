//! Plain-text views of a [`RenderState`].
//!
//! Everything here returns strings so the shell decides how to print them.

use crate::form::{Field, FieldKind, Step, PASSPORT_FORM};
use crate::payment::PaymentMethod;
use crate::review::{safe_value, ReviewItem, PLACEHOLDER};
use crate::workflow::{PaymentView, RenderState, StepMarker, Workflow};

const LABEL_WIDTH: usize = 24;
const FIELD_WIDTH: usize = 40;

fn marker_symbol(marker: StepMarker) -> &'static str {
    match marker {
        StepMarker::Upcoming => "[ ]",
        StepMarker::Active => "[>]",
        StepMarker::Done | StepMarker::Complete => "[✓]",
    }
}

pub fn stepper_line(state: &RenderState) -> String {
    state
        .stepper
        .iter()
        .map(|(step, marker)| {
            format!("{} {} {}", marker_symbol(*marker), step.number(), step.title())
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn field_visible(field: Field, method: Option<PaymentMethod>) -> bool {
    match field {
        Field::UpiId => method == Some(PaymentMethod::Upi),
        Field::CardName | Field::CardNumber | Field::Expiry | Field::Cvv => {
            method == Some(PaymentMethod::Card)
        }
        _ => true,
    }
}

/// One line per visible control on `step`, with its inline error if any.
pub fn field_lines(workflow: &Workflow, state: &RenderState, step: Step) -> Vec<String> {
    let form = workflow.form();
    PASSPORT_FORM
        .fields_for(step)
        .filter(|descriptor| field_visible(descriptor.field, state.payment.method))
        .map(|descriptor| {
            let field = descriptor.field;
            let value = match descriptor.kind {
                FieldKind::File => match form.files(field) {
                    [] => PLACEHOLDER.to_string(),
                    files => files.join(", "),
                },
                FieldKind::Checkbox => {
                    let mark = if state.confirm_checked { "[x]" } else { "[ ]" };
                    mark.to_string()
                }
                _ => safe_value(form.value(field)),
            };
            let label = format!("{} ({})", descriptor.label, descriptor.key);
            let mut line = format!("  {label:<FIELD_WIDTH$} {value}");
            if let Some(message) = state.error_for(field) {
                line.push_str(&format!("  <- {message}"));
            }
            line
        })
        .collect()
}

pub fn payment_lines(view: &PaymentView) -> Vec<String> {
    let mut lines = vec![
        format!("  {:<LABEL_WIDTH$} {}", "Payment status", view.state),
        format!("  {:<LABEL_WIDTH$} {}", "Transaction ID", view.txn_display),
    ];
    let fee = if view.fee_paid {
        format!("{} (paid)", view.fee)
    } else {
        view.fee.clone()
    };
    lines.push(format!("  {:<LABEL_WIDTH$} {fee}", "Application fee"));
    if !view.message.is_empty() {
        lines.push(format!("  {}", view.message));
    }

    let controls = view.controls;
    let available: Vec<&str> = [
        (controls.generate, "pay"),
        (controls.verify, "verify"),
        (controls.confirm_checkbox, "confirm"),
        (controls.next_to_review, "next"),
    ]
    .into_iter()
    .filter_map(|(enabled, name)| enabled.then_some(name))
    .collect();
    if !available.is_empty() {
        lines.push(format!("  Available: {}", available.join(", ")));
    }
    lines
}

/// Two aligned columns: field label then the value shown for it.
pub fn review_table(items: &[ReviewItem]) -> String {
    let width = items
        .iter()
        .map(|item| item.label.chars().count())
        .max()
        .unwrap_or(0);
    items
        .iter()
        .map(|item| format!("{:<width$}  {}", item.label, item.value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full page for the current step.
pub fn page(workflow: &Workflow) -> Vec<String> {
    let state = workflow.snapshot();
    let mut lines = vec![
        stepper_line(&state),
        format!("{}: {}", state.status_text, state.step.title()),
    ];

    match &state.review {
        Some(items) => {
            lines.extend(review_table(items).lines().map(|line| format!("  {line}")));
            if !state.confirm_note.is_empty() {
                lines.push(state.confirm_note.clone());
            }
            if state.locked {
                return lines;
            }
            if state.edit_chooser_visible {
                lines.push("Edit which step? Use `edit 1`, `edit 2` or `edit 3`.".to_string());
            } else {
                lines.push("Is all the information correct? Answer with `yes` or `no`.".to_string());
            }
        }
        None => {
            lines.extend(field_lines(workflow, &state, state.step));
            if state.step == Step::Payment {
                lines.extend(payment_lines(&state.payment));
            }
        }
    }
    lines
}
