//! Invocation contexts that handlers are bound to when subscribing.
//!
//! A context is an opaque value compared by identity, never by value. Two contexts are the same
//! context if one is a clone of the other, or if both were created from the same shared
//! allocation via `from_rc()`/`from_arc()`. The absent context (`none()`, also the `Default`)
//! is a distinct context of its own.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::registry::Identity;

/// The single-threaded context a [`LocalHandler`][crate::LocalHandler] is invoked with.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use event_channel::{EventArgs, LocalContext, LocalEventChannel, LocalHandler};
///
/// let counter = Rc::new(Cell::new(0_u32));
///
/// let on_tick = LocalEventChannel::<()>::new();
/// let increment = LocalHandler::new(|context: &LocalContext, (): &(), _: &EventArgs| {
///     let counter = context.get::<Cell<u32>>().expect("bound to a counter");
///     counter.set(counter.get() + 1);
/// });
///
/// on_tick.subscribe_with(&increment, LocalContext::from_rc(Rc::clone(&counter)));
/// on_tick.dispatch(&(), &EventArgs::EMPTY).unwrap();
///
/// assert_eq!(counter.get(), 1);
/// ```
#[derive(Clone, Default)]
pub struct LocalContext {
    value: Option<Rc<dyn Any>>,
}

impl LocalContext {
    /// Creates the absent context, used by handlers subscribed without a context.
    #[must_use]
    pub fn none() -> Self {
        Self { value: None }
    }

    /// Creates a new context with its own identity, bound to `value`.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: 'static,
    {
        Self::from_rc(Rc::new(value))
    }

    /// Creates a context bound to an existing shared object.
    ///
    /// Every context created from clones of the same `Rc` is the same context.
    #[must_use]
    pub fn from_rc<T>(value: Rc<T>) -> Self
    where
        T: 'static,
    {
        Self {
            value: Some(value),
        }
    }

    /// Returns the bound value if this context is bound to a value of type `T`.
    #[must_use]
    pub fn get<T>(&self) -> Option<&T>
    where
        T: 'static,
    {
        self.value.as_deref()?.downcast_ref::<T>()
    }

    /// Whether this is the absent context.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.value.is_none()
    }
}

impl Identity for LocalContext {
    fn same_as(&self, other: &Self) -> bool {
        match (&self.value, &other.value) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for LocalContext {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalContext")
            .field("bound", &!self.is_none())
            .finish_non_exhaustive()
    }
}

/// The thread-safe context a [`Handler`][crate::Handler] is invoked with.
///
/// Behaves like [`LocalContext`] but the bound value must be `Send + Sync`.
#[derive(Clone, Default)]
pub struct Context {
    value: Option<Arc<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates the absent context, used by handlers subscribed without a context.
    #[must_use]
    pub fn none() -> Self {
        Self { value: None }
    }

    /// Creates a new context with its own identity, bound to `value`.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::from_arc(Arc::new(value))
    }

    /// Creates a context bound to an existing shared object.
    ///
    /// Every context created from clones of the same `Arc` is the same context.
    #[must_use]
    pub fn from_arc<T>(value: Arc<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            value: Some(value),
        }
    }

    /// Returns the bound value if this context is bound to a value of type `T`.
    #[must_use]
    pub fn get<T>(&self) -> Option<&T>
    where
        T: 'static,
    {
        self.value.as_deref()?.downcast_ref::<T>()
    }

    /// Whether this is the absent context.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.value.is_none()
    }
}

impl Identity for Context {
    fn same_as(&self, other: &Self) -> bool {
        match (&self.value, &other.value) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bound", &!self.is_none())
            .finish_non_exhaustive()
    }
}
