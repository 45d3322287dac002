//! Per-node change broadcasting.
//!
//! Every album, photo and gallery owns a [`ChangeBus`]. Mutations publish an
//! [`ItemChangeEvent`] on the bus of the node that owns the mutated sequence
//! (or of the renamed node itself). Delivery is synchronous: by the time the
//! mutating call returns, every registered observer has seen the event.

use std::fmt;
use std::sync::Arc;

use shutter_core::{DeliveryReport, ObserverError, ObserverSet};

use super::item::{Item, ItemId};

/// What happened to the changed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The changed item was appended to the subject's sequence.
    Addition,
    /// The changed item was removed from the subject's sequence.
    Removal,
    /// The changed item was renamed.
    Rename,
    /// Some other state of the changed item changed (image, icon, description).
    StateChange,
}

/// The node an event is scoped to.
#[derive(Clone, PartialEq, Eq)]
pub enum EventSubject {
    /// The gallery root, identified by its id.
    Gallery(ItemId),
    /// An album or photo.
    Item(Item),
}

impl EventSubject {
    /// Identity of the subject.
    pub fn id(&self) -> ItemId {
        match self {
            Self::Gallery(id) => *id,
            Self::Item(item) => item.id(),
        }
    }

    /// Returns `true` if the subject is the gallery root.
    pub fn is_gallery(&self) -> bool {
        matches!(self, Self::Gallery(_))
    }

    /// The subject item, unless the subject is the gallery root.
    pub fn item(&self) -> Option<&Item> {
        match self {
            Self::Gallery(_) => None,
            Self::Item(item) => Some(item),
        }
    }
}

impl fmt::Debug for EventSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gallery(id) => write!(f, "Gallery({id})"),
            Self::Item(item) => write!(f, "{item:?}"),
        }
    }
}

/// A single change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChangeEvent {
    /// Node owning the mutated sequence, or the renamed node itself.
    pub subject: EventSubject,
    /// The item that was added, removed, renamed or otherwise changed.
    pub changed: Item,
    /// What happened.
    pub kind: ChangeKind,
}

impl ItemChangeEvent {
    /// Build an event.
    pub fn new(subject: EventSubject, changed: Item, kind: ChangeKind) -> Self {
        Self {
            subject,
            changed,
            kind,
        }
    }

    /// An event whose subject and changed item are the same item.
    pub fn about(item: Item, kind: ChangeKind) -> Self {
        Self::new(EventSubject::Item(item.clone()), item, kind)
    }
}

/// Receives change events from one or more [`ChangeBus`]es.
pub trait ChangeObserver: Send + Sync {
    /// Handle an event. Errors are logged by the bus and reported to the
    /// publisher; they never stop delivery to other observers.
    fn on_change(&self, event: &ItemChangeEvent) -> Result<(), ObserverError>;
}

impl<F> ChangeObserver for F
where
    F: Fn(&ItemChangeEvent) -> Result<(), ObserverError> + Send + Sync,
{
    fn on_change(&self, event: &ItemChangeEvent) -> Result<(), ObserverError> {
        self(event)
    }
}

/// Synchronous, in-process change broadcaster.
#[derive(Debug, Default)]
pub struct ChangeBus {
    observers: ObserverSet<dyn ChangeObserver>,
}

impl ChangeBus {
    /// Create a bus with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Returns `false` if it was already registered.
    pub fn register(&self, observer: Arc<dyn ChangeObserver>) -> bool {
        self.observers.register(observer)
    }

    /// Unregister an observer. Returns `false` if it was not registered.
    pub fn unregister(&self, observer: &Arc<dyn ChangeObserver>) -> bool {
        self.observers.unregister(observer)
    }

    /// Check whether an observer is registered.
    pub fn is_registered(&self, observer: &Arc<dyn ChangeObserver>) -> bool {
        self.observers.contains(observer)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `event` to every observer registered at the time of the call,
    /// exactly once each, in registration order.
    pub fn publish(&self, event: &ItemChangeEvent) -> DeliveryReport {
        tracing::trace!(
            target: shutter_core::logging::targets::MODEL,
            kind = ?event.kind,
            subject = %event.subject.id(),
            changed = %event.changed.id(),
            observers = self.observers.len(),
            "publishing change"
        );
        self.observers.deliver(|observer| observer.on_change(event))
    }
}
