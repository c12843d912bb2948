#![doc(test(attr(deny(warnings))))]

//! Passport Wizard drives a four-step passport application form: personal
//! details, document uploads, a simulated fee payment and a final review that
//! locks the application once confirmed.
//!
//! All state lives in one [`workflow::Workflow`]; front ends send it
//! [`workflow::Command`]s and redraw from its [`workflow::RenderState`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod payment;
pub mod review;
pub mod utils;
pub mod validation;
pub mod workflow;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Passport wizard tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
