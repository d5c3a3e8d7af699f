//! Single-threaded event channels.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::builder::ChannelOptions;
use crate::error::Result;
use crate::registry::Registry;
use crate::{DispatchError, EventArgs, EventChannelBuilder, EventSource, LocalContext, LocalHandler};

/// A single-threaded event channel that notifies subscribed handlers synchronously.
///
/// The owner of a signal holds one channel per signal, dispatches through it whenever the
/// signal fires and hands out the channel (typically as `&impl EventSource`) to anyone who
/// wants to subscribe.
///
/// # Subscriptions
///
/// A subscription is a (handler, context) pair. Subscribing the same pair twice has no effect.
/// The same handler may be subscribed under any number of distinct contexts, each being an
/// independent subscription. Subscribing without a context uses the absent context, which is
/// distinct from every bound context: [`unsubscribe()`][Self::unsubscribe] only ever removes
/// the absent-context subscription of a handler.
///
/// # Dispatch order
///
/// Handlers are invoked in the order in which they were first subscribed. A handler subscribed
/// under several contexts is invoked once per context, in the order the contexts were
/// subscribed, before the next handler is invoked.
///
/// # Mutation during dispatch
///
/// Each dispatch pass invokes the subscriptions that existed when the pass began. Handlers may
/// subscribe, unsubscribe, dispose or dispatch again on the same channel:
///
/// * a subscription removed during a pass is still invoked in that pass if it had not been
///   reached yet, and is not invoked by later passes;
/// * a subscription added during a pass is not invoked in that pass;
/// * a nested dispatch runs to completion before the outer pass continues.
///
/// # Failures
///
/// If a handler returns an error, the pass stops and the error is returned from
/// [`dispatch()`][Self::dispatch]. Handlers after the failed one are not invoked in that pass.
/// A panicking handler aborts the pass the same way. The channel remains usable in both cases.
///
/// # Thread safety
///
/// This type is single-threaded. For a channel that can be shared between threads, see
/// [`EventChannel`][crate::EventChannel].
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use event_channel::{LocalContext, LocalEventChannel, LocalHandler};
///
/// let on_data = LocalEventChannel::<str, Vec<u8>>::new();
/// let received = Rc::new(RefCell::new(Vec::new()));
///
/// let record = LocalHandler::new({
///     let received = Rc::clone(&received);
///     move |_: &LocalContext, sender: &str, data: &Vec<u8>| {
///         received.borrow_mut().push(format!("{sender}: {} bytes", data.len()));
///     }
/// });
///
/// on_data.subscribe(&record);
/// on_data.dispatch("socket-7", &vec![1, 2, 3]).unwrap();
///
/// assert_eq!(*received.borrow(), ["socket-7: 3 bytes"]);
/// ```
pub struct LocalEventChannel<S: ?Sized, A = EventArgs> {
    options: ChannelOptions,

    registry: RefCell<Registry<LocalHandler<S, A>, LocalContext>>,

    // Everything to do with this channel is single-threaded,
    // even if S and A are thread-mobile or thread-safe.
    _single_threaded: PhantomData<*const ()>,
}

impl<S: ?Sized, A> LocalEventChannel<S, A> {
    /// Creates a new unnamed channel with no subscribers.
    ///
    /// Use [`builder()`][Self::builder] to configure the channel.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ChannelOptions::default())
    }

    /// Creates a builder for configuring a channel.
    ///
    /// Finish the builder with
    /// [`build_local()`][EventChannelBuilder::build_local] to obtain a single-threaded channel.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Gets replaced with itself by different name, bad mutation.
    pub fn builder() -> EventChannelBuilder<S, A> {
        EventChannelBuilder::new()
    }

    pub(crate) fn with_options(options: ChannelOptions) -> Self {
        Self {
            options,
            registry: RefCell::new(Registry::new()),
            _single_threaded: PhantomData,
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
    pub fn subscribe(&self, handler: &LocalHandler<S, A>) {
        self.subscribe_with(handler, LocalContext::none());
    }

    /// Subscribes a handler to be invoked with the given context.
    ///
    /// Has no effect if the handler is already subscribed with this context.
    pub fn subscribe_with(&self, handler: &LocalHandler<S, A>, context: LocalContext) {
        let len = {
            let mut registry = self.registry.borrow_mut();

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
    pub fn unsubscribe(&self, handler: &LocalHandler<S, A>) {
        self.unsubscribe_with(handler, &LocalContext::none());
    }

    /// Unsubscribes the handler's subscription with the given context.
    ///
    /// Has no effect if there is no such subscription.
    pub fn unsubscribe_with(&self, handler: &LocalHandler<S, A>, context: &LocalContext) {
        let removed = self.registry.borrow_mut().remove(handler, context);

        if removed {
            trace!(channel = %self.options.name, "unsubscribed");
        } else {
            trace!(channel = %self.options.name, "ignoring unsubscribe of unknown subscription");
        }
    }

    /// Invokes every subscription that exists when the call begins, in dispatch order.
    ///
    /// Returns after all handlers have run.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::HandlerFailed`] if a handler fails. Delivery stops at the
    /// failed handler.
    pub fn dispatch(&self, sender: &S, args: &A) -> Result<()> {
        // The borrow ends with this statement, leaving handlers free to mutate the registry.
        let snapshot = self.registry.borrow().snapshot();

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
    /// A dispatch pass that is in progress when this is called still completes its snapshot.
    pub fn dispose(&self) {
        let discarded = self.registry.borrow_mut().clear();

        debug!(channel = %self.options.name, discarded, "disposed");
    }

    /// Number of subscriptions, counting each (handler, context) pair separately.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Whether there are no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    /// Number of distinct subscribed handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.registry.borrow().handler_count()
    }

    /// Whether the handler is subscribed with the given context.
    #[must_use]
    pub fn contains(&self, handler: &LocalHandler<S, A>, context: &LocalContext) -> bool {
        self.registry.borrow().contains(handler, context)
    }
}

impl<S: ?Sized, A> Default for LocalEventChannel<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized, A> EventSource for LocalEventChannel<S, A> {
    type Handler = LocalHandler<S, A>;
    type Context = LocalContext;

    fn subscribe_with(&self, handler: &Self::Handler, context: Self::Context) {
        Self::subscribe_with(self, handler, context);
    }

    fn unsubscribe_with(&self, handler: &Self::Handler, context: &Self::Context) {
        Self::unsubscribe_with(self, handler, context);
    }
}

impl<S: ?Sized, A> fmt::Debug for LocalEventChannel<S, A> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEventChannel")
            .field("name", &self.options.name)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
