//! Deferred confirmation of a pending payment.
//!
//! A verification is a one-shot tokio task that waits out the simulated
//! gateway round-trip and reports back over a channel. Every task observes a
//! child of the verifier's cancellation token, so locking the workflow or
//! dropping it stops any round-trip still in flight.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{Result, WizardError};

pub const DEFAULT_VERIFICATION_DELAY: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationEvent {
    Completed { txn_id: String },
}

pub struct PaymentVerifier {
    delay: Duration,
    cancel: CancellationToken,
    event_tx: UnboundedSender<VerificationEvent>,
    event_rx: UnboundedReceiver<VerificationEvent>,
    in_flight: Option<JoinHandle<()>>,
}

impl Default for PaymentVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_VERIFICATION_DELAY)
    }
}

impl PaymentVerifier {
    pub fn new(delay: Duration) -> Self {
        let (event_tx, event_rx) = unbounded_channel();
        Self {
            delay,
            cancel: CancellationToken::new(),
            event_tx,
            event_rx,
            in_flight: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules confirmation of `txn_id` on the current tokio runtime.
    pub fn start(&mut self, txn_id: String) -> Result<()> {
        let runtime = Handle::try_current().map_err(|_| WizardError::RuntimeUnavailable)?;
        let cancel = self.cancel.child_token();
        let event_tx = self.event_tx.clone();
        let delay = self.delay;

        debug!(txn_id = %txn_id, ?delay, "verification scheduled");
        self.in_flight = Some(runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(txn_id = %txn_id, "verification cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let _ = event_tx.send(VerificationEvent::Completed { txn_id });
                }
            }
        }));
        Ok(())
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Next finished verification, if one is already waiting.
    pub fn try_next(&mut self) -> Option<VerificationEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits for the next finished verification.
    pub async fn next(&mut self) -> Option<VerificationEvent> {
        self.event_rx.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PaymentVerifier {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn completes_after_the_configured_delay() {
        let mut verifier = PaymentVerifier::default();
        let started = tokio::time::Instant::now();
        verifier.start("GOVTXN-20260101-ABCDEF".into()).unwrap();
        assert!(verifier.try_next().is_none());

        let event = verifier.next().await.unwrap();
        assert_eq!(
            event,
            VerificationEvent::Completed {
                txn_id: "GOVTXN-20260101-ABCDEF".into()
            }
        );
        assert!(started.elapsed() >= DEFAULT_VERIFICATION_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_verification_never_reports() {
        let mut verifier = PaymentVerifier::new(Duration::from_millis(50));
        verifier.start("GOVTXN-20260101-ABCDEF".into()).unwrap();
        verifier.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(verifier.try_next().is_none());
        assert!(verifier.is_cancelled());
    }

    #[test]
    fn start_without_runtime_fails() {
        let mut verifier = PaymentVerifier::default();
        assert!(matches!(
            verifier.start("GOVTXN-20260101-ABCDEF".into()),
            Err(WizardError::RuntimeUnavailable)
        ));
    }
}
