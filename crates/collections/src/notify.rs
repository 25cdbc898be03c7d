//! Change-notification subscriptions for collections.
//!
//! Consumers observe a collection with a callback receiving the batched
//! `Splice` for each flush cycle that changed membership.

use crate::splice::Splice;
use alloc::boxed::Box;
use alloc::vec::Vec;

/// Unique identifier for a registered listener.
pub type ListenerId = u64;

/// Callback type for membership change notifications.
pub type ChangeListener = Box<dyn Fn(&Splice)>;

/// The set of listeners attached to one collection.
///
/// Listeners are notified in subscription order.
pub struct ListenerSet {
    listeners: Vec<(ListenerId, ChangeListener)>,
    next_id: ListenerId,
}

impl Default for ListenerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerSet {
    /// Creates an empty listener set.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers a listener and returns its id.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Splice) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener by id. Returns true if it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() < before
    }

    /// Notifies every listener of a splice.
    pub fn notify_all(&self, splice: &Splice) {
        for (_, listener) in &self.listeners {
            listener(splice);
        }
    }

    /// Returns the number of registered listeners.
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listeners are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Removes all listeners.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
