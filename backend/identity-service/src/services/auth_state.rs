//! Auth-state observation
//!
//! Observers get the current state first, then every later sign-in and
//! sign-out in order. [`AuthStateChanges`] is the pull form; an
//! [`AuthSubscription`] drives a callback from a spawned task and stops it
//! when unsubscribed or dropped.

use crate::models::AuthState;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Stream of auth states, starting with the state at subscription time
pub struct AuthStateChanges {
    initial: Option<AuthState>,
    rx: broadcast::Receiver<AuthState>,
}

impl AuthStateChanges {
    pub(crate) fn new(initial: AuthState, rx: broadcast::Receiver<AuthState>) -> Self {
        Self {
            initial: Some(initial),
            rx,
        }
    }

    /// Next state; `None` once the gateway is gone
    pub async fn next(&mut self) -> Option<AuthState> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.rx.recv().await {
                Ok(state) => return Some(state),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth state observer lagged behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`next`](Self::next) for already-delivered states
    pub fn try_next(&mut self) -> Option<AuthState> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.rx.try_recv() {
                Ok(state) => return Some(state),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth state observer lagged behind");
                }
                Err(_) => return None,
            }
        }
    }
}

/// Handle for a callback registered with `on_auth_state_change`.
///
/// Delivery stops on [`unsubscribe`](Self::unsubscribe) or when the handle
/// is dropped: once either returns, the callback is not running and will
/// not run again. The handle must not be dropped from inside its own
/// callback.
#[must_use = "dropping the subscription cancels it immediately"]
pub struct AuthSubscription {
    task: Option<JoinHandle<()>>,
    /// Set once cancelled; held while the callback runs
    cancelled: Arc<Mutex<bool>>,
}

impl AuthSubscription {
    pub(crate) fn spawn<F>(mut changes: AuthStateChanges, callback: F) -> Self
    where
        F: Fn(AuthState) + Send + 'static,
    {
        // The current state is delivered before this returns
        if let Some(initial) = changes.try_next() {
            callback(initial);
        }

        let cancelled = Arc::new(Mutex::new(false));
        let gate = cancelled.clone();
        let task = tokio::spawn(async move {
            while let Some(state) = changes.next().await {
                let stopped = gate.lock().unwrap_or_else(PoisonError::into_inner);
                if *stopped {
                    break;
                }
                callback(state);
            }
            debug!("Auth state delivery finished");
        });

        Self {
            task: Some(task),
            cancelled,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn is_cancelled(&self) -> bool {
        *self.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            // Waits for an in-flight callback to return
            *self.cancelled.lock().unwrap_or_else(PoisonError::into_inner) = true;
            task.abort();
            debug!("Auth state subscription cancelled");
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
