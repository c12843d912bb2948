mod common;

use common::{applicant_details, apply, input, pick, select};
use passport_wizard::cli::render::review_table;
use passport_wizard::config::WizardConfig;
use passport_wizard::form::{Field, Step};
use passport_wizard::payment::PaymentState;
use passport_wizard::workflow::{Command, Control, Outcome, StepMarker, Workflow};
use regex::Regex;

fn card_workflow() -> Workflow {
    let mut workflow = Workflow::new(WizardConfig::default());
    apply(&mut workflow, applicant_details());
    apply(
        &mut workflow,
        vec![
            select(Field::PayMethod, "Card"),
            input(Field::CardName, "Ankit Sharma"),
            input(Field::CardNumber, "4111111111111234"),
            pick(Field::Expiry, "2029-07"),
            input(Field::Cvv, "123"),
        ],
    );
    workflow
}

#[tokio::test(start_paused = true)]
async fn card_payment_flow_ends_locked() {
    let mut workflow = card_workflow();
    for _ in 0..2 {
        assert_eq!(workflow.dispatch(Command::Next).unwrap(), Outcome::Applied);
    }
    assert_eq!(workflow.step(), Step::Payment);

    assert_eq!(workflow.dispatch(Command::GeneratePayment).unwrap(), Outcome::Applied);
    let pending = workflow.snapshot().payment;
    assert_eq!(pending.state, PaymentState::Pending);
    assert!(pending.message.starts_with("Redirecting to bank gateway (Demo)."));
    let txn = Regex::new(r"^GOVTXN-\d{8}-[A-HJ-NP-Z2-9]{6}$").unwrap();
    assert!(txn.is_match(&pending.txn_display), "{}", pending.txn_display);

    assert_eq!(workflow.dispatch(Command::VerifyPayment).unwrap(), Outcome::Applied);
    assert!(workflow.wait_for_verification().await);
    let paid = workflow.snapshot().payment;
    assert_eq!(paid.state, PaymentState::Paid);
    assert!(paid.fee_paid);
    assert_eq!(
        paid.message,
        format!("Payment successful (Demo). Transaction ID: {}", pending.txn_display)
    );

    workflow.dispatch(Command::SetConfirm(true)).unwrap();
    assert_eq!(workflow.dispatch(Command::Next).unwrap(), Outcome::Applied);
    assert_eq!(workflow.dispatch(Command::ConfirmYes).unwrap(), Outcome::Applied);

    let state = workflow.snapshot();
    assert!(state.locked);
    assert_eq!(state.status_text, "Submitted");
    assert!(state.stepper.iter().all(|(_, marker)| *marker == StepMarker::Complete));
    assert_eq!(
        workflow.take_alerts(),
        vec!["Confirmed! Your application has been submitted successfully.".to_string()]
    );
    assert_eq!(workflow.dispatch(Command::Prev).unwrap(), Outcome::Ignored);
}

#[tokio::test(start_paused = true)]
async fn verification_survives_navigation_but_not_the_lock() {
    let mut workflow = card_workflow();
    workflow.dispatch(Command::Next).unwrap();
    workflow.dispatch(Command::Next).unwrap();
    workflow.dispatch(Command::GeneratePayment).unwrap();
    workflow.dispatch(Command::VerifyPayment).unwrap();

    assert_eq!(workflow.dispatch(Command::Prev).unwrap(), Outcome::Applied);
    assert_eq!(
        workflow.dispatch(Command::VerifyPayment).unwrap(),
        Outcome::Disabled(Control::VerifyPayment)
    );
    assert!(workflow.wait_for_verification().await);
    assert_eq!(workflow.step(), Step::Documents);
    assert_eq!(workflow.payment().state(), PaymentState::Paid);
}

#[test]
fn review_masks_card_and_fills_placeholders() {
    let mut workflow = card_workflow();
    assert_eq!(workflow.dispatch(Command::GoTo(Step::Confirmation)).unwrap(), Outcome::Applied);
    let review = workflow.snapshot().review.expect("review visible on step 4");

    insta::assert_snapshot!(review_table(&review), @r"
    First Name              Ankit
    Last Name               Sharma
    Date of Birth           1994-05-17
    Gender                  Female
    Nationality             Indian
    National ID             123456789012
    Passport Type           Ordinary
    City                    Pune
    State                   Maharashtra
    Pincode                 400001
    Mobile                  9876543210
    Email                   ankit@example.in
    Address                 12 MG Road
    Photograph File         photo.jpg
    Identity Proof File     aadhaar.pdf
    Address Proof File      bill.pdf
    Birth Certificate File  birth.pdf
    Application Fee         INR 1,500
    Payment Method          Card
    Card Holder Name        Ankit Sharma
    Card Number             •••• •••• •••• 1234
    Expiry                  2029-07
    ");

    let mut unpaid = Workflow::default();
    apply(&mut unpaid, applicant_details());
    unpaid.dispatch(Command::GoTo(Step::Confirmation)).unwrap();
    let review = unpaid.snapshot().review.expect("review visible on step 4");
    for label in ["Payment Method", "Card Holder Name", "Card Number", "Expiry"] {
        let item = review.iter().find(|item| item.label == label).unwrap();
        assert_eq!(item.value, "—", "{label}");
    }
}

#[test]
fn review_is_hidden_before_step_four() {
    let mut workflow = Workflow::default();
    assert_eq!(
        workflow.dispatch(Command::GoTo(Step::Confirmation)).unwrap(),
        Outcome::Rejected
    );
    assert!(workflow.snapshot().review.is_none());
}

#[test]
fn yes_with_missing_payment_sends_applicant_back() {
    let mut workflow = card_workflow();
    workflow.dispatch(Command::Next).unwrap();
    workflow.dispatch(Command::GoTo(Step::Confirmation)).unwrap();
    assert_eq!(workflow.step(), Step::Confirmation);

    assert_eq!(workflow.dispatch(Command::ConfirmYes).unwrap(), Outcome::Rejected);
    assert_eq!(
        workflow.take_alerts(),
        vec!["Some required details are missing or invalid. Please edit and try again.".to_string()]
    );
    assert_eq!(workflow.step(), Step::Personal);
    assert!(!workflow.is_locked());
}
