//! Identity-keyed observer registries with isolated delivery.
//!
//! [`ObserverSet`] holds shared observer handles (`Arc<T>`, usually
//! `Arc<dyn SomeObserverTrait>`) in registration order. Membership is keyed by
//! the address of the shared allocation, so registering the same `Arc` twice
//! is a no-op and unregistering needs only a clone of the handle.
//!
//! Delivery always works on a snapshot: the registry lock is released before
//! the first observer runs, so observers may register or unregister entries
//! (on this set or any other) while a notification is in flight. Each
//! observer is invoked exactly once per delivery; an error or panic from one
//! observer is recorded in the [`DeliveryReport`] and logged, and delivery
//! continues with the next observer.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use shutter_core::{ObserverError, ObserverSet};
//!
//! trait Listener: Send + Sync {
//!     fn heard(&self, word: &str) -> Result<(), ObserverError>;
//! }
//!
//! struct Echo;
//! impl Listener for Echo {
//!     fn heard(&self, _word: &str) -> Result<(), ObserverError> {
//!         Ok(())
//!     }
//! }
//!
//! let listeners: ObserverSet<dyn Listener> = ObserverSet::new();
//! let echo: Arc<dyn Listener> = Arc::new(Echo);
//! assert!(listeners.register(echo.clone()));
//! assert!(!listeners.register(echo.clone()));
//!
//! let report = listeners.deliver(|l| l.heard("hello"));
//! assert_eq!(report.recipients, 1);
//! assert!(report.is_clean());
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{DeliveryReport, ObserverError, ObserverFailure};
use crate::logging::targets;

/// Identity of a registered observer: the address of its shared allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverKey(usize);

impl ObserverKey {
    /// Compute the identity key of a shared observer handle.
    pub fn of<T: ?Sized>(observer: &Arc<T>) -> Self {
        Self(Arc::as_ptr(observer) as *const () as usize)
    }
}

/// An insertion-ordered set of shared observers.
pub struct ObserverSet<T: ?Sized> {
    entries: RwLock<Vec<Arc<T>>>,
}

impl<T: ?Sized> Default for ObserverSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ObserverSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.len())
            .finish()
    }
}

impl<T: ?Sized> ObserverSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Add an observer. Returns `false` if it was already registered.
    pub fn register(&self, observer: Arc<T>) -> bool {
        let key = ObserverKey::of(&observer);
        let mut entries = self.entries.write();
        if entries.iter().any(|e| ObserverKey::of(e) == key) {
            return false;
        }
        entries.push(observer);
        true
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unregister(&self, observer: &Arc<T>) -> bool {
        let key = ObserverKey::of(observer);
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| ObserverKey::of(e) != key);
        entries.len() != before
    }

    /// Check whether an observer is registered.
    pub fn contains(&self, observer: &Arc<T>) -> bool {
        let key = ObserverKey::of(observer);
        self.entries.read().iter().any(|e| ObserverKey::of(e) == key)
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove every observer.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Copy the current membership, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.entries.read().clone()
    }

    /// Deliver a notification to a snapshot of the current membership.
    pub fn deliver<F>(&self, notify: F) -> DeliveryReport
    where
        F: FnMut(&T) -> Result<(), ObserverError>,
    {
        deliver_each(&self.snapshot(), notify)
    }
}

/// Build an order-preserving union of several sets, keeping the first
/// occurrence of each observer.
pub fn union_of<T: ?Sized>(sets: &[&ObserverSet<T>]) -> Vec<Arc<T>> {
    let mut seen = Vec::new();
    let mut merged = Vec::new();
    for set in sets {
        for observer in set.snapshot() {
            let key = ObserverKey::of(&observer);
            if !seen.contains(&key) {
                seen.push(key);
                merged.push(observer);
            }
        }
    }
    merged
}

/// Invoke `notify` once for every observer in `observers`.
///
/// Errors and panics are captured per observer and never stop delivery.
pub fn deliver_each<T: ?Sized, F>(observers: &[Arc<T>], mut notify: F) -> DeliveryReport
where
    F: FnMut(&T) -> Result<(), ObserverError>,
{
    let mut report = DeliveryReport {
        recipients: observers.len(),
        failures: Vec::new(),
    };

    for (position, observer) in observers.iter().enumerate() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| notify(observer.as_ref())));
        let error = match outcome {
            Ok(Ok(())) => continue,
            Ok(Err(error)) => error,
            Err(payload) => ObserverError::from_panic(payload.as_ref()),
        };
        tracing::warn!(target: targets::OBSERVER, position, %error, "observer failed during delivery");
        report.failures.push(ObserverFailure { position, error });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Probe: Send + Sync {
        fn poke(&self, value: u32) -> Result<(), ObserverError>;
    }

    #[derive(Default)]
    struct Counter {
        hits: AtomicUsize,
    }

    impl Probe for Counter {
        fn poke(&self, _value: u32) -> Result<(), ObserverError> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    impl Probe for Failing {
        fn poke(&self, value: u32) -> Result<(), ObserverError> {
            Err(ObserverError::failed(format!("rejected {value}")))
        }
    }

    struct Panicking;

    impl Probe for Panicking {
        fn poke(&self, _value: u32) -> Result<(), ObserverError> {
            panic!("probe exploded");
        }
    }

    #[test]
    fn test_register_is_idempotent() {
        let set: ObserverSet<dyn Probe> = ObserverSet::new();
        let counter: Arc<dyn Probe> = Arc::new(Counter::default());

        assert!(set.register(counter.clone()));
        assert!(!set.register(counter.clone()));
        assert_eq!(set.len(), 1);

        assert!(set.unregister(&counter));
        assert!(!set.unregister(&counter));
        assert!(set.is_empty());
    }

    #[test]
    fn test_distinct_allocations_are_distinct_members() {
        let set: ObserverSet<dyn Probe> = ObserverSet::new();
        let a: Arc<dyn Probe> = Arc::new(Counter::default());
        let b: Arc<dyn Probe> = Arc::new(Counter::default());

        set.register(a.clone());
        set.register(b.clone());
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
        assert!(set.contains(&b));
    }

    #[test]
    fn test_failures_do_not_stop_delivery() {
        let set: ObserverSet<dyn Probe> = ObserverSet::new();
        let counter = Arc::new(Counter::default());

        set.register(Arc::new(Failing));
        set.register(Arc::new(Panicking));
        set.register(counter.clone());

        let report = set.deliver(|p| p.poke(3));
        assert_eq!(report.recipients, 3);
        assert_eq!(report.delivered(), 1);
        assert_eq!(report.failures[0].position, 0);
        assert_eq!(
            report.failures[0].error,
            ObserverError::Failed("rejected 3".to_string())
        );
        assert_eq!(report.failures[1].position, 1);
        assert!(report.failures[1].error.is_panic());
        assert_eq!(counter.hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mutation_during_delivery_uses_snapshot() {
        struct Registrar {
            set: Arc<ObserverSet<dyn Probe>>,
            late: Arc<dyn Probe>,
        }

        impl Probe for Registrar {
            fn poke(&self, _value: u32) -> Result<(), ObserverError> {
                self.set.register(self.late.clone());
                Ok(())
            }
        }

        let set: Arc<ObserverSet<dyn Probe>> = Arc::new(ObserverSet::new());
        let late = Arc::new(Counter::default());
        set.register(Arc::new(Registrar {
            set: set.clone(),
            late: late.clone(),
        }));

        let report = set.deliver(|p| p.poke(1));
        assert_eq!(report.recipients, 1);
        assert_eq!(late.hits.load(Ordering::SeqCst), 0);
        assert_eq!(set.len(), 2);

        set.deliver(|p| p.poke(2));
        assert_eq!(late.hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_union_deduplicates_in_order() {
        let first: ObserverSet<dyn Probe> = ObserverSet::new();
        let second: ObserverSet<dyn Probe> = ObserverSet::new();
        let shared: Arc<dyn Probe> = Arc::new(Counter::default());
        let only_second: Arc<dyn Probe> = Arc::new(Counter::default());

        first.register(shared.clone());
        second.register(only_second.clone());
        second.register(shared.clone());

        let merged = union_of(&[&first, &second]);
        assert_eq!(merged.len(), 2);
        assert_eq!(ObserverKey::of(&merged[0]), ObserverKey::of(&shared));
        assert_eq!(ObserverKey::of(&merged[1]), ObserverKey::of(&only_second));
    }

    #[test]
    fn test_delivery_order_matches_registration() {
        struct Tagged {
            tag: u32,
            log: Arc<Mutex<Vec<u32>>>,
        }

        impl Probe for Tagged {
            fn poke(&self, _value: u32) -> Result<(), ObserverError> {
                self.log.lock().push(self.tag);
                Ok(())
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let set: ObserverSet<dyn Probe> = ObserverSet::new();
        for tag in [3, 1, 2] {
            set.register(Arc::new(Tagged {
                tag,
                log: log.clone(),
            }));
        }

        set.deliver(|p| p.poke(0));
        assert_eq!(*log.lock(), vec![3, 1, 2]);
    }
}
