//! Hook dispatch for the in-memory platform.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::platform::{HandlerRef, HookRegistry, UserId};

/// Callback invoked with the id of the user an event concerns.
pub type HookCallback = Arc<dyn Fn(UserId) + Send + Sync>;

struct Registration {
    handler: HandlerRef,
    callback: HookCallback,
}

/// Per-event list of named callbacks with counted suspension.
///
/// Suspension is tracked per `(event, handler)` pair, so suspending one
/// handler leaves every other handler of the same event running, and nested
/// suspend/resume brackets compose.
#[derive(Default)]
pub struct HookBus {
    handlers: RwLock<HashMap<String, Vec<Registration>>>,
    suspended: Mutex<HashMap<(String, HandlerRef), usize>>,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event` under `handler`.
    pub fn register(
        &self,
        event: impl Into<String>,
        handler: impl Into<HandlerRef>,
        callback: impl Fn(UserId) + Send + Sync + 'static,
    ) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers
            .entry(event.into())
            .or_default()
            .push(Registration {
                handler: handler.into(),
                callback: Arc::new(callback),
            });
    }

    /// Dispatch `event` to every handler that is not currently suspended.
    ///
    /// Returns the number of callbacks invoked.
    pub fn fire(&self, event: &str, user: UserId) -> usize {
        let callbacks: Vec<(HandlerRef, HookCallback)> = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            handlers
                .get(event)
                .map(|registrations| {
                    registrations
                        .iter()
                        .filter(|r| !self.is_suspended(event, &r.handler))
                        .map(|r| (r.handler.clone(), r.callback.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };

        for (handler, callback) in &callbacks {
            debug!(event, handler = %handler, user, "dispatching hook");
            callback(user);
        }
        callbacks.len()
    }

    /// Current suspension depth of `handler` for `event`.
    pub fn suspension_depth(&self, event: &str, handler: &HandlerRef) -> usize {
        let suspended = self.suspended.lock().unwrap_or_else(PoisonError::into_inner);
        suspended
            .get(&(event.to_string(), handler.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_suspended(&self, event: &str, handler: &HandlerRef) -> bool {
        self.suspension_depth(event, handler) > 0
    }
}

impl HookRegistry for HookBus {
    fn suspend(&self, event: &str, handler: &HandlerRef) {
        let mut suspended = self.suspended.lock().unwrap_or_else(PoisonError::into_inner);
        *suspended
            .entry((event.to_string(), handler.clone()))
            .or_insert(0) += 1;
    }

    fn resume(&self, event: &str, handler: &HandlerRef) {
        let mut suspended = self.suspended.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (event.to_string(), handler.clone());
        match suspended.get_mut(&key) {
            Some(depth) if *depth > 1 => *depth -= 1,
            Some(_) => {
                suspended.remove(&key);
            }
            None => warn!(event, handler = %handler, "resume without matching suspend"),
        }
    }
}
