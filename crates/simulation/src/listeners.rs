//! Typed listener lists for synchronous change notification.
//!
//! Components that broadcast changes (grid, placement controller, currency
//! portfolio, turn cycle) own one [`Listeners`] per event type. Subscribers
//! get a [`ListenerId`] back and are expected to remove themselves on
//! teardown. Emission is synchronous: every listener has run before `emit`
//! returns.

use std::fmt;

/// Handle returned by [`Listeners::add`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<E> = Box<dyn FnMut(&E) + Send + Sync>;

pub struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Callback<E>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<E> Listeners<E> {
    /// Subscribe a callback. Callbacks run in subscription order.
    pub fn add(&mut self, callback: impl FnMut(&E) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Unsubscribe. Returns false if the id was already removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
