#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Synchronous in-process event channels.
//!
//! An object that emits a signal (for example "connected" or "data received") owns one event
//! channel per signal. Other code subscribes handlers to the channel, optionally bound to a
//! context, and the owner notifies all of them by dispatching an event through the channel.
//!
//! Both single-threaded and thread-safe variants are available:
//! - [`LocalEventChannel`], [`LocalHandler`], [`LocalContext`] - Single-threaded variants
//! - [`EventChannel`], [`Handler`], [`Context`] - Thread-safe variants
//!
//! # Subscriptions are identified by identity
//!
//! Handlers and contexts are compared by identity, not by value. A handler is created once and
//! cloned wherever it is needed; the clone kept by the subscriber is what later unsubscribes it.
//! The same handler can be subscribed under several contexts at once, each being an independent
//! subscription, and subscribing the same (handler, context) pair again has no effect.
//!
//! ```rust
//! use event_channel::{EventArgs, LocalContext, LocalEventChannel, LocalHandler};
//!
//! let on_change = LocalEventChannel::<()>::new();
//! let handler = LocalHandler::new(|context: &LocalContext, (): &(), _: &EventArgs| {
//!     println!("changed, context bound to {:?}", context.get::<i32>());
//! });
//!
//! let first = LocalContext::new(1);
//! let second = LocalContext::new(2);
//!
//! on_change.subscribe_with(&handler, first.clone());
//! on_change.subscribe_with(&handler, second.clone());
//! on_change.subscribe_with(&handler, first.clone()); // No effect, already subscribed.
//! assert_eq!(on_change.len(), 2);
//!
//! on_change.unsubscribe_with(&handler, &first);
//! assert!(on_change.contains(&handler, &second));
//! ```
//!
//! # Dispatch
//!
//! Dispatching is synchronous: every handler runs to completion on the calling thread before
//! [`LocalEventChannel::dispatch()`] returns. Handlers run in the order in which they were first
//! subscribed. Each pass works on a snapshot of the subscriptions taken when the pass began,
//! so handlers may subscribe and unsubscribe during a pass without affecting that pass.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use event_channel::{EventArgs, LocalContext, LocalEventChannel, LocalHandler};
//!
//! let on_tick = Rc::new(LocalEventChannel::<()>::new());
//! let ticks_seen_by_b = Rc::new(Cell::new(0));
//!
//! let b = LocalHandler::new({
//!     let ticks = Rc::clone(&ticks_seen_by_b);
//!     move |_: &LocalContext, (): &(), _: &EventArgs| ticks.set(ticks.get() + 1)
//! });
//!
//! // `a` removes `b` on every tick.
//! let a = LocalHandler::new({
//!     let on_tick = Rc::clone(&on_tick);
//!     let b = b.clone();
//!     move |_: &LocalContext, (): &(), _: &EventArgs| on_tick.unsubscribe(&b)
//! });
//!
//! on_tick.subscribe(&a);
//! on_tick.subscribe(&b);
//!
//! // `b` was part of the snapshot, so it is still notified of this tick...
//! on_tick.dispatch(&(), &EventArgs::EMPTY).unwrap();
//! assert_eq!(ticks_seen_by_b.get(), 1);
//!
//! // ...but not of the next one.
//! on_tick.dispatch(&(), &EventArgs::EMPTY).unwrap();
//! assert_eq!(ticks_seen_by_b.get(), 1);
//! # on_tick.dispose();
//! ```
//!
//! # Failures
//!
//! Handlers created with `fallible()` may return an error. The first error stops the pass and
//! is returned from `dispatch()` as a [`DispatchError`]; handlers after the failed one are not
//! notified in that pass. Callers that want to isolate subscribers from each other handle the
//! error at the dispatch call site. The channel itself never fails.
//!
//! # Teardown
//!
//! `dispose()` removes every subscription at once. The channel stays usable afterwards.
//!
//! # Logging
//!
//! Channels emit `tracing` events: subscription changes and dispatch passes at `trace` level,
//! disposal and aborted passes at `debug` level, and a `warn` event when the number of
//! subscriptions grows past the threshold configured via
//! [`EventChannelBuilder::subscriber_warning_threshold()`].

mod args;
mod builder;
mod constants;
mod context;
mod error;
mod handler;
mod local;
mod registry;
mod source;
mod sync;

#[cfg(test)]
mod test_utils;

pub use args::*;
pub use builder::EventChannelBuilder;
pub use context::*;
pub use error::{DispatchError, HandlerError};
pub use handler::*;
pub use local::*;
pub use source::*;
pub use sync::*;
