//! Event handlers with a stable identity.
//!
//! A handler is created once and then cloned cheaply. All clones share one callback allocation,
//! which is what identifies the handler to a channel: subscribing a clone is subscribing the
//! same handler, and a clone can later be used to unsubscribe it. Two handlers created
//! separately are different handlers even if they were built from the same closure.
//!
//! If the last clone of a subscribed handler is dropped, the channel keeps invoking it but the
//! subscription can never be removed again except by disposing of the whole channel.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::registry::Identity;
use crate::{Context, HandlerError, LocalContext};

type LocalCallback<S, A> = dyn Fn(&LocalContext, &S, &A) -> Result<(), HandlerError>;

type Callback<S, A> = dyn Fn(&Context, &S, &A) -> Result<(), HandlerError> + Send + Sync;

/// A handler that can be subscribed to a [`LocalEventChannel`][crate::LocalEventChannel].
///
/// The callback receives the context the handler was subscribed with, the sender of the event
/// and the event payload.
///
/// # Example
///
/// ```rust
/// use event_channel::{EventArgs, LocalEventChannel, LocalHandler};
///
/// let on_close = LocalEventChannel::<str>::new();
///
/// let log_close = LocalHandler::new(|_, sender: &str, _: &EventArgs| {
///     println!("{sender} closed");
/// });
///
/// on_close.subscribe(&log_close);
/// on_close.dispatch("socket", &EventArgs::EMPTY).unwrap();
///
/// // The same handler value is needed to unsubscribe.
/// on_close.unsubscribe(&log_close);
/// assert!(on_close.is_empty());
/// ```
pub struct LocalHandler<S: ?Sized, A> {
    callback: Rc<LocalCallback<S, A>>,
}

impl<S: ?Sized, A> LocalHandler<S, A> {
    /// Creates a handler from a callback that cannot fail.
    #[must_use]
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&LocalContext, &S, &A) + 'static,
    {
        Self::fallible(move |context: &LocalContext, sender: &S, args: &A| {
            callback(context, sender, args);
            Ok::<(), HandlerError>(())
        })
    }

    /// Creates a handler from a callback that can fail.
    ///
    /// An error returned by the callback stops the dispatch pass it happened in and is
    /// returned to the caller of `dispatch()` as a
    /// [`DispatchError`][crate::DispatchError].
    ///
    /// # Example
    ///
    /// ```rust
    /// use event_channel::{DispatchError, LocalEventChannel, LocalHandler};
    ///
    /// let on_data = LocalEventChannel::<(), Vec<u8>>::new();
    ///
    /// let parse = LocalHandler::fallible(|_, (): &(), data: &Vec<u8>| {
    ///     if data.is_empty() {
    ///         return Err("empty frame");
    ///     }
    ///
    ///     Ok(())
    /// });
    ///
    /// on_data.subscribe(&parse);
    ///
    /// let result = on_data.dispatch(&(), &Vec::new());
    /// assert!(matches!(result, Err(DispatchError::HandlerFailed { .. })));
    /// ```
    #[must_use]
    pub fn fallible<F, E>(callback: F) -> Self
    where
        F: Fn(&LocalContext, &S, &A) -> Result<(), E> + 'static,
        E: Into<HandlerError>,
    {
        Self {
            callback: Rc::new(
                move |context: &LocalContext, sender: &S, args: &A| -> Result<(), HandlerError> {
                    callback(context, sender, args).map_err(Into::into)
                },
            ),
        }
    }

    pub(crate) fn invoke(
        &self,
        context: &LocalContext,
        sender: &S,
        args: &A,
    ) -> Result<(), HandlerError> {
        (self.callback)(context, sender, args)
    }
}

impl<S: ?Sized, A> Clone for LocalHandler<S, A> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<S: ?Sized, A> Identity for LocalHandler<S, A> {
    fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<S: ?Sized, A> fmt::Debug for LocalHandler<S, A> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalHandler")
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// A handler that can be subscribed to a thread-safe [`EventChannel`][crate::EventChannel].
///
/// Behaves like [`LocalHandler`] but the callback must be `Send + Sync` because it may be
/// invoked from any thread that dispatches the event.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// use event_channel::{EventArgs, EventChannel, Handler};
///
/// let received = Arc::new(AtomicUsize::new(0));
///
/// let on_ping = EventChannel::<()>::new();
/// let count_pings = Handler::new({
///     let received = Arc::clone(&received);
///     move |_, (): &(), _: &EventArgs| {
///         received.fetch_add(1, Ordering::Relaxed);
///     }
/// });
///
/// on_ping.subscribe(&count_pings);
/// on_ping.dispatch(&(), &EventArgs::EMPTY).unwrap();
///
/// assert_eq!(received.load(Ordering::Relaxed), 1);
/// ```
pub struct Handler<S: ?Sized, A> {
    callback: Arc<Callback<S, A>>,
}

impl<S: ?Sized, A> Handler<S, A> {
    /// Creates a handler from a callback that cannot fail.
    #[must_use]
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Context, &S, &A) + Send + Sync + 'static,
    {
        Self::fallible(move |context: &Context, sender: &S, args: &A| {
            callback(context, sender, args);
            Ok::<(), HandlerError>(())
        })
    }

    /// Creates a handler from a callback that can fail.
    ///
    /// An error returned by the callback stops the dispatch pass it happened in and is
    /// returned to the caller of `dispatch()` as a
    /// [`DispatchError`][crate::DispatchError].
    #[must_use]
    pub fn fallible<F, E>(callback: F) -> Self
    where
        F: Fn(&Context, &S, &A) -> Result<(), E> + Send + Sync + 'static,
        E: Into<HandlerError>,
    {
        Self {
            callback: Arc::new(
                move |context: &Context, sender: &S, args: &A| -> Result<(), HandlerError> {
                    callback(context, sender, args).map_err(Into::into)
                },
            ),
        }
    }

    pub(crate) fn invoke(
        &self,
        context: &Context,
        sender: &S,
        args: &A,
    ) -> Result<(), HandlerError> {
        (self.callback)(context, sender, args)
    }
}

impl<S: ?Sized, A> Clone for Handler<S, A> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<S: ?Sized, A> Identity for Handler<S, A> {
    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<S: ?Sized, A> fmt::Debug for Handler<S, A> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("callback", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}
