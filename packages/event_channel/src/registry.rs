//! The subscriber registry shared by both channel variants.
//!
//! The registry is an ordered map from handler to the contexts that handler was subscribed
//! with. Handlers are kept in order of first subscription and contexts within a handler in
//! order of subscription, which together define the dispatch order.

use smallvec::SmallVec;

use crate::constants::INLINE_SNAPSHOT_CAPACITY;

/// Identity comparison for handlers and contexts.
///
/// Registrations are never compared by value, only by whether two values refer to the same
/// underlying allocation (or are both the absent context).
pub(crate) trait Identity {
    fn same_as(&self, other: &Self) -> bool;
}

/// The (handler, context) pairs registered at the moment a dispatch pass began.
pub(crate) type Snapshot<H, C> = SmallVec<[(H, C); INLINE_SNAPSHOT_CAPACITY]>;

#[derive(Debug)]
struct Entry<H, C> {
    handler: H,

    // Never empty. An entry whose last context is removed is removed itself.
    contexts: Vec<C>,
}

#[derive(Debug)]
pub(crate) struct Registry<H, C> {
    entries: Vec<Entry<H, C>>,
}

impl<H, C> Registry<H, C>
where
    H: Identity + Clone,
    C: Identity + Clone,
{
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers the pair, returning `false` if it was already registered.
    pub(crate) fn insert(&mut self, handler: &H, context: C) -> bool {
        let Some(entry) = self.entry_mut(handler) else {
            self.entries.push(Entry {
                handler: handler.clone(),
                contexts: vec![context],
            });

            return true;
        };

        if entry.contexts.iter().any(|c| c.same_as(&context)) {
            return false;
        }

        entry.contexts.push(context);
        true
    }

    /// Removes the pair, returning `false` if it was not registered.
    pub(crate) fn remove(&mut self, handler: &H, context: &C) -> bool {
        let Some((entry_index, entry)) = self
            .entries
            .iter_mut()
            .enumerate()
            .find(|(_, entry)| entry.handler.same_as(handler))
        else {
            return false;
        };

        let Some(context_index) = entry.contexts.iter().position(|c| c.same_as(context)) else {
            return false;
        };

        entry.contexts.remove(context_index);

        if entry.contexts.is_empty() {
            self.entries.remove(entry_index);
        }

        true
    }

    pub(crate) fn contains(&self, handler: &H, context: &C) -> bool {
        self.entries
            .iter()
            .find(|entry| entry.handler.same_as(handler))
            .is_some_and(|entry| entry.contexts.iter().any(|c| c.same_as(context)))
    }

    /// Copies out every registered pair in dispatch order.
    pub(crate) fn snapshot(&self) -> Snapshot<H, C> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry
                    .contexts
                    .iter()
                    .map(|context| (entry.handler.clone(), context.clone()))
            })
            .collect()
    }

    /// Removes every registration, returning how many there were.
    pub(crate) fn clear(&mut self) -> usize {
        let discarded = self.len();
        self.entries.clear();
        discarded
    }

    /// Number of registered (handler, context) pairs.
    pub(crate) fn len(&self) -> usize {
        self.entries.iter().map(|entry| entry.contexts.len()).sum()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct handlers, regardless of how many contexts each has.
    pub(crate) fn handler_count(&self) -> usize {
        self.entries.len()
    }

    fn entry_mut(&mut self, handler: &H) -> Option<&mut Entry<H, C>> {
        self.entries
            .iter_mut()
            .find(|entry| entry.handler.same_as(handler))
    }
}
