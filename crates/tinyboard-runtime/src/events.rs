#![forbid(unsafe_code)]

//! Change notifications.
//!
//! Each board owns its emitters. Listeners are plain closures called in
//! subscription order, synchronously, from inside the mutating call.

use std::fmt;

use tinyboard_core::{LayoutId, LayoutRect, Rect};

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Ordered listener list for events of type `E`.
pub struct Emitter<E> {
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    next: u64,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next: 0,
        }
    }
}

impl<E> Emitter<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Board model notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// The set of selected ids changed. Carries the new set.
    SelectionChanged(Vec<LayoutId>),
    /// An item's rect was rewritten.
    ItemChanged(LayoutRect),
}

/// Session notifications for indicator rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceEvent {
    /// The resolved target of an interacting block moved. The id is
    /// unassigned for a block dragged in from outside.
    ShadowUpdated { id: LayoutId, rect: Rect },
    /// The session ended; no shadow is shown.
    ShadowHidden,
    /// Resize handles should be drawn around the selection.
    ResizerShown(Rect),
}
