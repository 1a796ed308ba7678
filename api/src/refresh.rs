//! Single-flight token refresh.
//!
//! When a protected request is rejected with 401, it joins the current
//! refresh wave through [`RefreshCoordinator::join`]. The first caller of a
//! wave becomes the leader and is responsible for running the refresh call;
//! everyone else is queued behind it. When the refresh settles, every queued
//! caller is woken in FIFO order with the same outcome.
//!
//! All state transitions happen under one synchronous mutex that is never
//! held across an `.await`, so check-and-create is atomic with respect to
//! every other task.

use newsdesk_auth::SessionHandle;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Why a refresh wave failed. Every variant ends the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// No refresh token was held when the wave started.
    MissingRefreshToken,
    /// The backend answered the refresh call with a non-2xx status.
    Rejected {
        /// HTTP status of the refresh response
        status: u16,
    },
    /// The refresh call never got an answer.
    Network {
        /// `true` if the request timeout elapsed
        timeout: bool,
    },
    /// The refresh response could not be decoded.
    MalformedResponse,
    /// The refresh task ended without reporting an outcome.
    Aborted,
    /// The session was signed out while the refresh was in flight.
    SessionChanged,
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRefreshToken => f.write_str("no refresh token held"),
            Self::Rejected { status } => write!(f, "refresh rejected with HTTP {status}"),
            Self::Network { timeout: true } => f.write_str("refresh timed out"),
            Self::Network { timeout: false } => f.write_str("refresh failed to reach the backend"),
            Self::MalformedResponse => f.write_str("refresh response was malformed"),
            Self::Aborted => f.write_str("refresh task ended without an outcome"),
            Self::SessionChanged => f.write_str("session changed while refreshing"),
        }
    }
}

/// Outcome delivered to every caller of a wave: the new access token, or
/// the reason the session was lost.
pub type RefreshOutcome = Result<String, RefreshFailure>;

/// Result of joining a refresh wave.
#[derive(Debug)]
pub enum Join {
    /// A wave already replaced the rejected token; retry with this one.
    Ready(String),
    /// No refresh was running. The caller leads the new wave and must start
    /// the refresh call, then wait on the ticket like everyone else.
    Started(Ticket),
    /// A refresh is already running; wait for it.
    Queued(Ticket),
}

/// Handle a caller awaits until its wave settles.
///
/// Dropping the ticket abandons the wait; the coordinator prunes the entry
/// and never delivers to it.
#[derive(Debug)]
pub struct Ticket(oneshot::Receiver<RefreshOutcome>);

impl Ticket {
    /// Wait for the wave to settle.
    ///
    /// A wave whose sender vanished without settling counts as
    /// [`RefreshFailure::Aborted`].
    pub async fn wait(self) -> RefreshOutcome {
        self.0.await.unwrap_or(Err(RefreshFailure::Aborted))
    }
}

/// A request that failed authorization and waits for the in-flight refresh.
struct PendingRequest {
    label: String,
    reply: oneshot::Sender<RefreshOutcome>,
}

/// The single outstanding refresh.
struct RefreshOperation {
    started_at: Instant,
    waiters: VecDeque<PendingRequest>,
}

enum RefreshState {
    Idle,
    Refreshing(RefreshOperation),
}

/// Summary of a settled wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleReport {
    /// Callers that received the outcome.
    pub delivered: usize,
    /// Callers that had abandoned their wait.
    pub abandoned: usize,
    /// Time since the wave started.
    pub elapsed: Duration,
}

/// Single-flight refresh coordinator.
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("in_flight", &self.in_flight())
            .field("waiters", &self.waiters())
            .finish()
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefreshState::Idle),
        }
    }

    /// Join the refresh wave for a request rejected while carrying
    /// `rejected` (or no token at all).
    ///
    /// The session's current token is read inside the critical section: if
    /// it already differs from the rejected one, a previous wave has
    /// settled and no new refresh is needed.
    pub fn join(&self, session: &SessionHandle, rejected: Option<&str>, label: &str) -> Join {
        let mut state = self.lock();

        match &mut *state {
            RefreshState::Refreshing(operation) => {
                operation.waiters.retain(|w| !w.reply.is_closed());
                let (reply, rx) = oneshot::channel();
                operation.waiters.push_back(PendingRequest {
                    label: label.to_string(),
                    reply,
                });
                tracing::debug!(
                    request = label,
                    waiters = operation.waiters.len(),
                    "Queued behind in-flight refresh"
                );
                Join::Queued(Ticket(rx))
            }
            RefreshState::Idle => {
                if let Some(current) = session.access_token() {
                    if rejected != Some(current.as_str()) {
                        tracing::debug!(request = label, "Token already refreshed, retrying");
                        return Join::Ready(current);
                    }
                }

                let (reply, rx) = oneshot::channel();
                let mut waiters = VecDeque::new();
                waiters.push_back(PendingRequest {
                    label: label.to_string(),
                    reply,
                });
                *state = RefreshState::Refreshing(RefreshOperation {
                    started_at: Instant::now(),
                    waiters,
                });
                tracing::debug!(request = label, "Starting refresh wave");
                Join::Started(Ticket(rx))
            }
        }
    }

    /// Settle the current wave and wake its waiters in FIFO order.
    ///
    /// The state returns to idle before anyone is woken. Settling an idle
    /// coordinator is a no-op.
    pub fn settle(&self, outcome: &RefreshOutcome) -> SettleReport {
        let operation = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, RefreshState::Idle) {
                RefreshState::Refreshing(operation) => operation,
                RefreshState::Idle => {
                    return SettleReport {
                        delivered: 0,
                        abandoned: 0,
                        elapsed: Duration::ZERO,
                    };
                }
            }
        };

        let mut delivered = 0;
        let mut abandoned = 0;
        for waiter in operation.waiters {
            if waiter.reply.send(outcome.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(request = %waiter.label, "Waiter abandoned before refresh settled");
                abandoned += 1;
            }
        }

        SettleReport {
            delivered,
            abandoned,
            elapsed: operation.started_at.elapsed(),
        }
    }

    /// `true` while a refresh wave is running.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        matches!(*self.lock(), RefreshState::Refreshing(_))
    }

    /// Callers still waiting on the current wave.
    #[must_use]
    pub fn waiters(&self) -> usize {
        match &*self.lock() {
            RefreshState::Refreshing(operation) => operation
                .waiters
                .iter()
                .filter(|w| !w.reply.is_closed())
                .count(),
            RefreshState::Idle => 0,
        }
    }

    #[cfg(test)]
    fn queued_labels(&self) -> Vec<String> {
        match &*self.lock() {
            RefreshState::Refreshing(operation) => {
                operation.waiters.iter().map(|w| w.label.clone()).collect()
            }
            RefreshState::Idle => Vec::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settles the wave as [`RefreshFailure::Aborted`] if dropped unsettled.
///
/// Owned by the refresh task, so a panic or runtime shutdown inside the
/// refresh call cannot strand the queue.
pub struct SettleGuard {
    coordinator: Arc<RefreshCoordinator>,
    settled: bool,
}

impl SettleGuard {
    /// Arm a guard for the current wave.
    #[must_use]
    pub const fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self {
            coordinator,
            settled: false,
        }
    }

    /// Settle the wave with `outcome`.
    pub fn settle(mut self, outcome: &RefreshOutcome) -> SettleReport {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Refresh task ended without settling, failing waiters");
            self.coordinator.settle(&Err(RefreshFailure::Aborted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_auth::mocks::MockCredentialStore;
    use newsdesk_auth::{Role, TokenPair, UserSummary};

    fn session_with(access: &str) -> SessionHandle {
        let session = SessionHandle::load(Arc::new(MockCredentialStore::new())).unwrap();
        session
            .set_auth(
                UserSummary::new("admin", Role::Admin),
                TokenPair::new(access, "R1"),
            )
            .unwrap();
        session
    }

    #[test]
    fn test_first_join_starts_wave() {
        let coordinator = RefreshCoordinator::new();
        let session = session_with("T1");

        assert!(matches!(
            coordinator.join(&session, Some("T1"), "GET /a"),
            Join::Started(_)
        ));
        assert!(coordinator.in_flight());
    }

    #[test]
    fn test_later_joins_queue() {
        let coordinator = RefreshCoordinator::new();
        let session = session_with("T1");

        let _leader = coordinator.join(&session, Some("T1"), "GET /a");
        let second = coordinator.join(&session, Some("T1"), "GET /b");
        let third = coordinator.join(&session, Some("T1"), "GET /c");

        assert!(matches!(second, Join::Queued(_)));
        assert!(matches!(third, Join::Queued(_)));
        assert_eq!(coordinator.waiters(), 3);
    }

    #[test]
    fn test_stale_rejection_is_ready() {
        let coordinator = RefreshCoordinator::new();
        let session = session_with("T2");

        match coordinator.join(&session, Some("T1"), "GET /a") {
            Join::Ready(token) => assert_eq!(token, "T2"),
            other => panic!("expected Ready, got {other:?}"),
        }
        assert!(!coordinator.in_flight());
    }

    #[test]
    fn test_waiters_are_queued_in_arrival_order() {
        let coordinator = RefreshCoordinator::new();
        let session = session_with("T1");

        let _joins: Vec<Join> = ["GET /a", "GET /b", "GET /c"]
            .into_iter()
            .map(|label| coordinator.join(&session, Some("T1"), label))
            .collect();

        assert_eq!(coordinator.queued_labels(), ["GET /a", "GET /b", "GET /c"]);
    }

    // Current-thread runtime: woken tasks run in the order they were woken.
    #[tokio::test(flavor = "current_thread")]
    async fn test_settle_wakes_in_fifo_order() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let session = session_with("T1");

        let tickets: Vec<(&str, Ticket)> = ["GET /a", "GET /b", "GET /c"]
            .into_iter()
            .map(|label| match coordinator.join(&session, Some("T1"), label) {
                Join::Started(t) | Join::Queued(t) => (label, t),
                Join::Ready(_) => panic!("unexpected Ready"),
            })
            .collect();

        // Park the waiters in reverse so spawn order cannot mask wake order
        let woken = Arc::new(Mutex::new(Vec::new()));
        let handles: Vec<_> = tickets
            .into_iter()
            .rev()
            .map(|(label, ticket)| {
                let woken = Arc::clone(&woken);
                tokio::spawn(async move {
                    let outcome = ticket.wait().await;
                    woken.lock().unwrap().push(label);
                    outcome
                })
            })
            .collect();
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert!(woken.lock().unwrap().is_empty());

        let report = coordinator.settle(&Ok("T2".to_string()));
        assert_eq!(report.delivered, 3);
        assert!(!coordinator.in_flight());

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok("T2".to_string()));
        }
        assert_eq!(*woken.lock().unwrap(), ["GET /a", "GET /b", "GET /c"]);
    }

    #[tokio::test]
    async fn test_abandoned_waiter_is_pruned() {
        let coordinator = RefreshCoordinator::new();
        let session = session_with("T1");

        let leader = coordinator.join(&session, Some("T1"), "GET /a");
        let abandoned = coordinator.join(&session, Some("T1"), "GET /b");
        drop(abandoned);
        let _kept = coordinator.join(&session, Some("T1"), "GET /c");

        assert_eq!(coordinator.waiters(), 2);

        let report = coordinator.settle(&Err(RefreshFailure::Rejected { status: 401 }));
        assert_eq!(report.delivered, 2);
        assert_eq!(report.abandoned, 0);

        let Join::Started(ticket) = leader else {
            panic!("leader should have started the wave");
        };
        assert_eq!(
            ticket.wait().await,
            Err(RefreshFailure::Rejected { status: 401 })
        );
    }

    #[tokio::test]
    async fn test_dropped_guard_fails_waiters() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let session = session_with("T1");

        let Join::Started(ticket) = coordinator.join(&session, Some("T1"), "GET /a") else {
            panic!("expected a new wave");
        };
        drop(SettleGuard::new(Arc::clone(&coordinator)));

        assert_eq!(ticket.wait().await, Err(RefreshFailure::Aborted));
        assert!(!coordinator.in_flight());
    }

    #[test]
    fn test_settle_when_idle_is_noop() {
        let coordinator = RefreshCoordinator::new();
        let report = coordinator.settle(&Ok("T2".to_string()));
        assert_eq!(report.delivered, 0);
    }
}
