use std::borrow::Cow;
use std::error::Error as StdError;
use std::result::Result as StdResult;

use thiserror::Error;

/// The error type returned by fallible event handlers.
///
/// Anything that converts into a boxed error can be returned from a handler created via
/// [`LocalHandler::fallible()`][crate::LocalHandler::fallible] or
/// [`Handler::fallible()`][crate::Handler::fallible], including `&str`, `String` and any
/// `Error + Send + Sync` type.
pub type HandlerError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur when dispatching an event.
///
/// The channel itself never fails. The only failure surface is a handler reporting an error,
/// which stops the dispatch pass at that handler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// A handler returned an error. Delivery to the handlers ordered after it was skipped.
    #[error(
        "handler at position {position} of event channel '{channel}' failed, \
         {skipped} remaining handler(s) skipped: {source}"
    )]
    HandlerFailed {
        /// Name of the channel that was dispatching.
        channel: Cow<'static, str>,

        /// Zero-based position of the failed handler in the dispatch snapshot.
        position: usize,

        /// How many registrations of the snapshot were not invoked because of the failure.
        skipped: usize,

        /// The error returned by the handler.
        #[source]
        source: HandlerError,
    },
}

/// A specialized `Result` type for dispatch operations, returning the crate's
/// [`DispatchError`] type as the error value.
pub(crate) type Result<T> = StdResult<T, DispatchError>;
