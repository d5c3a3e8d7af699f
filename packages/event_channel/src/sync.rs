//! Thread-safe event channels.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, trace};

use crate::builder::ChannelOptions;
use crate::constants::ERR_POISONED_LOCK;
use crate::error::Result;
use crate::registry::Registry;
use crate::{Context, DispatchError, EventArgs, EventChannelBuilder, EventSource, Handler};

/// A thread-safe event channel that notifies subscribed handlers synchronously.
///
/// Subscription, ordering, failure and mutation-during-dispatch semantics are the same as for
/// [`LocalEventChannel`][crate::LocalEventChannel]. In addition, the channel can be shared
/// between threads.
///
/// # Thread safety
///
/// All operations on one channel are serialized by a lock owned by the channel. The lock is
/// held only while the registry is read or modified, never while a handler runs, so handlers
/// may freely operate on the channel that invoked them.
///
/// A dispatch pass runs every handler on the thread that called
/// [`dispatch()`][Self::dispatch]. Passes started concurrently on different threads run
/// concurrently, each over its own snapshot. Handlers that need to hand work to another thread
/// must do so themselves.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::thread;
///
/// use event_channel::{Context, EventChannel, Handler};
///
/// let on_bytes_written = Arc::new(EventChannel::<str, u64>::new());
/// let total = Arc::new(AtomicU64::new(0));
///
/// let accumulate = Handler::new({
///     let total = Arc::clone(&total);
///     move |_: &Context, _: &str, bytes: &u64| {
///         total.fetch_add(*bytes, Ordering::Relaxed);
///     }
/// });
///
/// on_bytes_written.subscribe(&accumulate);
///
/// thread::scope(|s| {
///     for _ in 0..4 {
///         s.spawn(|| on_bytes_written.dispatch("writer", &256).unwrap());
///     }
/// });
///
/// assert_eq!(total.load(Ordering::Relaxed), 1024);
/// ```
pub struct EventChannel<S: ?Sized, A = EventArgs> {
    options: ChannelOptions,

    registry: Mutex<Registry<Handler<S, A>, Context>>,
}

impl<S: ?Sized, A> EventChannel<S, A> {
    /// Creates a new unnamed channel with no subscribers.
    ///
    /// Use [`builder()`][Self::builder] to configure the channel.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ChannelOptions::default())
    }

    /// Creates a builder for configuring a channel.
    ///
    /// Finish the builder with [`build()`][EventChannelBuilder::build] to obtain a
    /// thread-safe channel.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Gets replaced with itself by different name, bad mutation.
    pub fn builder() -> EventChannelBuilder<S, A> {
        EventChannelBuilder::new()
    }

    pub(crate) fn with_options(options: ChannelOptions) -> Self {
        Self {
            options,
            registry: Mutex::new(Registry::new()),
        }
    }

    /// The diagnostic name of the channel.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.options.name
    }

    /// Subscribes a handler without a context.
    ///
    /// Has no effect if the handler is already subscribed without a context.
    pub fn subscribe(&self, handler: &Handler<S, A>) {
        self.subscribe_with(handler, Context::none());
    }

    /// Subscribes a handler to be invoked with the given context.
    ///
    /// Has no effect if the handler is already subscribed with this context.
    pub fn subscribe_with(&self, handler: &Handler<S, A>, context: Context) {
        let len = {
            let mut registry = self.registry();

            if !registry.insert(handler, context) {
                trace!(channel = %self.options.name, "ignoring duplicate subscription");
                return;
            }

            registry.len()
        };

        trace!(channel = %self.options.name, subscribers = len, "subscribed");
        self.options.check_subscriber_count(len);
    }

    /// Unsubscribes the handler's subscription without a context.
    ///
    /// Subscriptions of the same handler with a bound context are not affected.
    /// Has no effect if there is no such subscription.
    pub fn unsubscribe(&self, handler: &Handler<S, A>) {
        self.unsubscribe_with(handler, &Context::none());
    }

    /// Unsubscribes the handler's subscription with the given context.
    ///
    /// Has no effect if there is no such subscription.
    pub fn unsubscribe_with(&self, handler: &Handler<S, A>, context: &Context) {
        let removed = self.registry().remove(handler, context);

        if removed {
            trace!(channel = %self.options.name, "unsubscribed");
        } else {
            trace!(channel = %self.options.name, "ignoring unsubscribe of unknown subscription");
        }
    }

    /// Invokes every subscription that exists when the call begins, in dispatch order.
    ///
    /// Returns after all handlers have run on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::HandlerFailed`] if a handler fails. Delivery stops at the
    /// failed handler.
    pub fn dispatch(&self, sender: &S, args: &A) -> Result<()> {
        // The guard is dropped at the end of this statement, before any handler runs.
        let snapshot = self.registry().snapshot();

        trace!(channel = %self.options.name, handlers = snapshot.len(), "dispatching");

        for (position, (handler, context)) in snapshot.iter().enumerate() {
            if let Err(source) = handler.invoke(context, sender, args) {
                let skipped = snapshot.len().saturating_sub(position).saturating_sub(1);

                debug!(
                    channel = %self.options.name,
                    position,
                    skipped,
                    "handler failed, aborting dispatch"
                );

                return Err(DispatchError::HandlerFailed {
                    channel: self.options.name.clone(),
                    position,
                    skipped,
                    source,
                });
            }
        }

        Ok(())
    }

    /// Removes every subscription.
    ///
    /// The channel remains usable: later subscriptions are accepted and dispatched to as usual.
    /// Dispatch passes in progress when this is called still complete their snapshots.
    pub fn dispose(&self) {
        let discarded = self.registry().clear();

        debug!(channel = %self.options.name, discarded, "disposed");
    }

    /// Number of subscriptions, counting each (handler, context) pair separately.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry().len()
    }

    /// Whether there are no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// Number of distinct subscribed handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.registry().handler_count()
    }

    /// Whether the handler is subscribed with the given context.
    #[must_use]
    pub fn contains(&self, handler: &Handler<S, A>, context: &Context) -> bool {
        self.registry().contains(handler, context)
    }

    fn registry(&self) -> MutexGuard<'_, Registry<Handler<S, A>, Context>> {
        self.registry.lock().expect(ERR_POISONED_LOCK)
    }
}

impl<S: ?Sized, A> Default for EventChannel<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized, A> EventSource for EventChannel<S, A> {
    type Handler = Handler<S, A>;
    type Context = Context;

    fn subscribe_with(&self, handler: &Self::Handler, context: Self::Context) {
        Self::subscribe_with(self, handler, context);
    }

    fn unsubscribe_with(&self, handler: &Self::Handler, context: &Self::Context) {
        Self::unsubscribe_with(self, handler, context);
    }
}

impl<S: ?Sized, A> fmt::Debug for EventChannel<S, A> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("name", &self.options.name)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
