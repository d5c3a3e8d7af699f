/// The subscriber-facing surface of an event channel.
///
/// Owners of a signal typically keep the channel private and expose it through this trait,
/// so that external code can subscribe and unsubscribe but cannot dispatch or dispose.
///
/// Implemented by [`LocalEventChannel`][crate::LocalEventChannel] and
/// [`EventChannel`][crate::EventChannel].
///
/// # Example
///
/// ```rust
/// use event_channel::{EventSource, LocalEventChannel, LocalHandler};
///
/// #[derive(Debug)]
/// struct Connected {
///     peer: String,
/// }
///
/// struct Connection {
///     on_connect: LocalEventChannel<Connection, Connected>,
/// }
///
/// impl Connection {
///     fn on_connect(&self) -> &impl EventSource<Handler = LocalHandler<Connection, Connected>> {
///         &self.on_connect
///     }
///
///     fn connect(&self, peer: &str) {
///         let args = Connected {
///             peer: peer.to_string(),
///         };
///
///         // The owner decides how to react to a failing subscriber.
///         if let Err(e) = self.on_connect.dispatch(self, &args) {
///             eprintln!("on_connect subscriber failed: {e}");
///         }
///     }
/// }
///
/// let connection = Connection {
///     on_connect: LocalEventChannel::new(),
/// };
///
/// let greet = LocalHandler::new(|_, _: &Connection, args: &Connected| {
///     println!("connected to {}", args.peer);
/// });
///
/// connection.on_connect().subscribe(&greet);
/// connection.connect("example.com:443");
/// ```
pub trait EventSource {
    /// The handler type accepted by the channel.
    type Handler;

    /// The context type handlers are bound to. Its default value is the absent context.
    type Context: Default;

    /// Subscribes a handler to be invoked with the given context.
    ///
    /// Has no effect if the handler is already subscribed with this context.
    fn subscribe_with(&self, handler: &Self::Handler, context: Self::Context);

    /// Unsubscribes the handler's subscription with the given context.
    ///
    /// Has no effect if there is no such subscription.
    fn unsubscribe_with(&self, handler: &Self::Handler, context: &Self::Context);

    /// Subscribes a handler without a context.
    ///
    /// Has no effect if the handler is already subscribed without a context.
    fn subscribe(&self, handler: &Self::Handler) {
        self.subscribe_with(handler, Self::Context::default());
    }

    /// Unsubscribes the handler's subscription without a context.
    ///
    /// Subscriptions of the same handler with a bound context are not affected.
    fn unsubscribe(&self, handler: &Self::Handler) {
        self.unsubscribe_with(handler, &Self::Context::default());
    }
}
