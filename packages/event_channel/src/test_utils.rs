//! Testing utilities shared by the unit tests of the different modules.

use std::mem;
use std::sync::{Arc, Mutex};

use crate::{Context, EventArgs, Handler, LocalContext, LocalHandler};

/// Records handler invocations in the order they happened.
///
/// Handlers created by the log record their name, suffixed with `@context` when invoked with a
/// context bound to a `&'static str` or an `i32`.
#[derive(Clone, Debug, Default)]
pub(crate) struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    /// Returns the calls recorded so far.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the calls recorded so far and starts a new recording.
    pub(crate) fn take(&self) -> Vec<String> {
        mem::take(&mut *self.calls.lock().unwrap())
    }

    pub(crate) fn local_handler<S: ?Sized>(&self, name: &'static str) -> LocalHandler<S, EventArgs> {
        let log = self.clone();

        LocalHandler::new(move |context: &LocalContext, _: &S, _: &EventArgs| {
            let label = context
                .get::<&'static str>()
                .map(ToString::to_string)
                .or_else(|| context.get::<i32>().map(ToString::to_string));

            log.record(describe(name, label));
        })
    }

    pub(crate) fn handler<S: ?Sized>(&self, name: &'static str) -> Handler<S, EventArgs> {
        let log = self.clone();

        Handler::new(move |context: &Context, _: &S, _: &EventArgs| {
            let label = context
                .get::<&'static str>()
                .map(ToString::to_string)
                .or_else(|| context.get::<i32>().map(ToString::to_string));

            log.record(describe(name, label));
        })
    }
}

fn describe(name: &str, context: Option<String>) -> String {
    match context {
        Some(context) => format!("{name}@{context}"),
        None => name.to_string(),
    }
}
