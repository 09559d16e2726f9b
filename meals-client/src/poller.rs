//! Payment confirmation poller
//!
//! The server never pushes payment results to the client; the gateway
//! callback lands server-side only. The client therefore re-fetches its
//! order list on a bounded schedule until the order reads paid, the
//! attempt ceiling is hit, or a fetch fails.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use shared::models::Order;

use crate::ClientError;
use crate::http::OrderSource;

/// Poll timing: `initial` delay before each attempt, scaled by
/// `multiplier` after every attempt. The default is the flat
/// 2s x 30 schedule (60s ceiling); a multiplier above 1.0 turns it
/// into exponential backoff.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    pub initial: Duration,
    pub multiplier: f64,
    pub max_attempts: u32,
}

impl PollSchedule {
    /// Delay before the given 1-based attempt.
    fn delay_for(&self, attempt: u32) -> Duration {
        self.initial.mul_f64(self.multiplier.powi(attempt as i32 - 1))
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(2),
            multiplier: 1.0,
            max_attempts: 30,
        }
    }
}

/// Terminal outcome of one polling run.
#[derive(Debug)]
pub enum PollOutcome {
    /// The order was observed paid.
    Confirmed(Order),
    /// The attempt ceiling elapsed without confirmation; server state
    /// is untouched and a late callback can still mark the order paid.
    TimedOut { attempts: u32 },
    /// A fetch failed mid-poll; polling stops immediately.
    Errored(ClientError),
    /// The cancellation handle fired.
    Cancelled,
}

/// Bounded poller over an [`OrderSource`].
pub struct PaymentPoller<S: OrderSource + ?Sized> {
    source: Arc<S>,
    schedule: PollSchedule,
    cancel: CancellationToken,
}

impl<S: OrderSource + ?Sized> PaymentPoller<S> {
    pub fn new(source: Arc<S>, schedule: PollSchedule) -> Self {
        Self {
            source,
            schedule,
            cancel: CancellationToken::new(),
        }
    }

    /// Handle for aborting the poll (e.g. the user navigates away).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll until the named order reads paid or a terminal state is hit.
    /// An order missing from the listing counts as unpaid, not an error.
    pub async fn wait_for_payment(&self, order_id: &str) -> PollOutcome {
        for attempt in 1..=self.schedule.max_attempts {
            let delay = self.schedule.delay_for(attempt);
            tokio::select! {
                _ = self.cancel.cancelled() => return PollOutcome::Cancelled,
                _ = tokio::time::sleep(delay) => {}
            }

            let orders = tokio::select! {
                _ = self.cancel.cancelled() => return PollOutcome::Cancelled,
                result = self.source.fetch_orders() => match result {
                    Ok(orders) => orders,
                    Err(e) => return PollOutcome::Errored(e),
                },
            };

            if let Some(order) = orders.into_iter().find(|o| o.id == order_id) {
                if order.payment {
                    tracing::info!(order_id, attempt, "Payment confirmed");
                    return PollOutcome::Confirmed(order);
                }
            }
            tracing::debug!(order_id, attempt, "Payment still pending");
        }

        PollOutcome::TimedOut {
            attempts: self.schedule.max_attempts,
        }
    }
}
