use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroUsize;

use tracing::warn;

use crate::constants::UNNAMED_CHANNEL;
use crate::{EventChannel, LocalEventChannel};

/// Creates instances of [`EventChannel`] and [`LocalEventChannel`].
///
/// All parameters are optional. Use `EventChannel::builder()` or
/// `LocalEventChannel::builder()` to create a new instance of this builder, then finish with
/// `build()` for a thread-safe channel or `build_local()` for a single-threaded one.
///
/// # Example
///
/// ```rust
/// use std::num::NonZeroUsize;
///
/// use event_channel::LocalEventChannel;
///
/// let on_connect: LocalEventChannel<str> = LocalEventChannel::builder()
///     .name("on_connect")
///     .subscriber_warning_threshold(NonZeroUsize::new(64).unwrap())
///     .build_local();
///
/// assert_eq!(on_connect.name(), "on_connect");
/// ```
pub struct EventChannelBuilder<S: ?Sized, A> {
    options: ChannelOptions,

    _channel: PhantomData<fn(&S, &A)>,
}

impl<S: ?Sized, A> EventChannelBuilder<S, A> {
    pub(crate) fn new() -> Self {
        Self {
            options: ChannelOptions::default(),
            _channel: PhantomData,
        }
    }

    /// Sets the name of the channel, used to identify it in log events and errors.
    ///
    /// Recommended format: the name of the signal as exposed by the owning type,
    /// for example `on_connect` or `on_data_received`.
    #[must_use]
    pub fn name(self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            options: ChannelOptions {
                name: name.into(),
                ..self.options
            },
            ..self
        }
    }

    /// Sets the number of registrations above which the channel logs a warning.
    ///
    /// A registry that keeps growing usually means that subscribers are not unsubscribing.
    /// Crossing the threshold only logs a warning, it never removes registrations.
    ///
    /// The default is to never warn.
    #[must_use]
    pub fn subscriber_warning_threshold(self, threshold: NonZeroUsize) -> Self {
        Self {
            options: ChannelOptions {
                subscriber_warning_threshold: Some(threshold),
                ..self.options
            },
            ..self
        }
    }

    /// Builds a thread-safe channel with the configured options.
    #[must_use]
    pub fn build(self) -> EventChannel<S, A> {
        EventChannel::with_options(self.options)
    }

    /// Builds a single-threaded channel with the configured options.
    #[must_use]
    pub fn build_local(self) -> LocalEventChannel<S, A> {
        LocalEventChannel::with_options(self.options)
    }
}

impl<S: ?Sized, A> fmt::Debug for EventChannelBuilder<S, A> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannelBuilder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Configuration shared by both channel variants.
#[derive(Debug)]
pub(crate) struct ChannelOptions {
    pub(crate) name: Cow<'static, str>,
    pub(crate) subscriber_warning_threshold: Option<NonZeroUsize>,
}

impl ChannelOptions {
    /// Logs the leak warning if a registration just took the registry past the threshold.
    ///
    /// Only the registration that crosses the threshold warns, so a registry that stays large
    /// does not flood the log. Dropping back under the threshold re-arms the warning.
    pub(crate) fn check_subscriber_count(&self, len: usize) {
        let Some(threshold) = self.subscriber_warning_threshold else {
            return;
        };

        if len.checked_sub(1) == Some(threshold.get()) {
            warn!(
                channel = %self.name,
                subscribers = len,
                threshold = threshold.get(),
                "event channel subscriber count exceeds warning threshold, \
                 subscribers may not be unsubscribing"
            );
        }
    }
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed(UNNAMED_CHANNEL),
            subscriber_warning_threshold: None,
        }
    }
}
