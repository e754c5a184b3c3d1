//! Diagnostic observers for resolution traceability.
//!
//! Observers hook into the container's resolution events for structured
//! tracing, performance monitoring, and debugging of wiring problems.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for container resolution events.
///
/// Observer calls are made synchronously during resolution; keep
/// implementations lightweight. When no observer is registered the
/// container skips the hooks entirely, so the unobserved path pays
/// nothing.
///
/// # Examples
///
/// ```
/// use lattice_di::{BindingSet, ContainerObserver, DiError, Key, Resolver};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct CountingObserver {
///     resolutions: std::sync::atomic::AtomicUsize,
/// }
///
/// impl ContainerObserver for CountingObserver {
///     fn resolving(&self, _key: &Key) {
///         self.resolutions.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
///     }
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {}
///
///     fn resolve_failed(&self, _key: &Key, _error: &DiError) {}
/// }
///
/// let observer = Arc::new(CountingObserver {
///     resolutions: std::sync::atomic::AtomicUsize::new(0),
/// });
///
/// let mut bindings = BindingSet::new();
/// bindings.add_observer(observer.clone());
/// bindings.add_singleton(1u8).unwrap();
///
/// let container = bindings.build().unwrap();
/// let _ = container.get_required::<u8>();
/// assert_eq!(observer.resolutions.load(std::sync::atomic::Ordering::SeqCst), 1);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called when starting to resolve a key.
    fn resolving(&self, key: &Key);

    /// Called when a key resolved successfully.
    ///
    /// `duration` is the elapsed time from `resolving`, including any
    /// transitive dependency construction.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when a resolution failed (not found, cycle, closed container,
    /// failed construction).
    fn resolve_failed(&self, key: &Key, error: &DiError);
}

/// Observer that emits resolution events through `tracing`.
///
/// Successful resolutions are logged at `trace`/`debug`; failures at
/// `warn` with the error attached.
pub struct LoggingObserver;

impl ContainerObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(key = %key, "resolving binding");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(key = %key, ?duration, "resolved binding");
    }

    fn resolve_failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(key = %key, %error, "binding resolution failed");
    }
}

/// Fan-out over the registered observers of one container chain.
#[derive(Clone)]
pub(crate) struct Observers {
    list: Arc<[Arc<dyn ContainerObserver>]>,
}

impl Observers {
    pub(crate) fn from_vec(observers: Vec<Arc<dyn ContainerObserver>>) -> Self {
        Self {
            list: observers.into(),
        }
    }

    /// Parent observers plus a child set's additions, in registration order.
    pub(crate) fn merged(&self, extra: Vec<Arc<dyn ContainerObserver>>) -> Self {
        if extra.is_empty() {
            return self.clone();
        }
        let mut list: Vec<Arc<dyn ContainerObserver>> = self.list.to_vec();
        list.extend(extra);
        Self::from_vec(list)
    }

    #[inline(always)]
    pub(crate) fn has_observers(&self) -> bool {
        !self.list.is_empty()
    }

    pub(crate) fn resolving(&self, key: &Key) {
        for obs in self.list.iter() {
            obs.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for obs in self.list.iter() {
            obs.resolved(key, duration);
        }
    }

    pub(crate) fn resolve_failed(&self, key: &Key, error: &DiError) {
        for obs in self.list.iter() {
            obs.resolve_failed(key, error);
        }
    }
}
