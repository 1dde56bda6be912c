//! Scoped suspension of hook callbacks.
//!
//! The adapter writes accounts through the account store, which in turn fires
//! post-write events. While the adapter performs such a write its own callback
//! must not run, so the write is bracketed by a [`HookSuspension`].

use tracing::trace;

use crate::platform::{HandlerRef, HookRegistry};

/// RAII guard that keeps one handler suspended for one event.
///
/// `suspend` is called on construction and `resume` exactly once on drop,
/// including when the guarded call unwinds.
pub struct HookSuspension<'a> {
    registry: &'a dyn HookRegistry,
    event: &'a str,
    handler: &'a HandlerRef,
}

impl<'a> HookSuspension<'a> {
    pub fn new(registry: &'a dyn HookRegistry, event: &'a str, handler: &'a HandlerRef) -> Self {
        trace!(event, handler = %handler, "suspending hook");
        registry.suspend(event, handler);
        Self {
            registry,
            event,
            handler,
        }
    }
}

impl Drop for HookSuspension<'_> {
    fn drop(&mut self) {
        trace!(event = self.event, handler = %self.handler, "resuming hook");
        self.registry.resume(self.event, self.handler);
    }
}

/// Run `f` with `handler` suspended for `event`.
pub fn with_suspended<T>(
    registry: &dyn HookRegistry,
    event: &str,
    handler: &HandlerRef,
    f: impl FnOnce() -> T,
) -> T {
    let _suspension = HookSuspension::new(registry, event, handler);
    f()
}
