/// The payload of an event that carries no data.
///
/// This is the default payload type of [`LocalEventChannel`][crate::LocalEventChannel] and
/// [`EventChannel`][crate::EventChannel]. Signals that need to carry data use their own payload
/// type instead.
///
/// The type is zero-sized, so [`EventArgs::EMPTY`] can be passed to every dispatch without
/// allocating anything.
///
/// # Example
///
/// ```rust
/// use event_channel::{EventArgs, LocalEventChannel, LocalHandler};
///
/// let on_ready = LocalEventChannel::<str>::new();
/// let handler = LocalHandler::new(|_, sender: &str, _: &EventArgs| {
///     assert_eq!(sender, "worker-1");
/// });
///
/// on_ready.subscribe(&handler);
/// on_ready.dispatch("worker-1", &EventArgs::EMPTY).unwrap();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct EventArgs;

impl EventArgs {
    /// The shared instance of the empty payload.
    pub const EMPTY: Self = Self;
}
