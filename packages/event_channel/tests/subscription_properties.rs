//! Integration tests for the subscription and dispatch guarantees of both channel variants,
//! exercised only through the public API.

#![allow(clippy::indexing_slicing, reason = "panic is fine in tests")]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use event_channel::{
    Context, DispatchError, EventArgs, EventChannel, EventSource, Handler, LocalContext,
    LocalEventChannel, LocalHandler,
};

/// Receiver type used to check which context a handler was invoked with.
#[derive(Debug)]
struct Receiver {
    name: &'static str,
    calls: RefCell<u32>,
}

impl Receiver {
    fn shared(name: &'static str) -> Rc<Self> {
        Rc::new(Self {
            name,
            calls: RefCell::new(0),
        })
    }

    fn calls(&self) -> u32 {
        *self.calls.borrow()
    }
}

type Invocations = Rc<RefCell<Vec<(String, String, u32)>>>;

/// Creates a handler that records (receiver, sender, args) for every invocation.
fn recording_handler(invocations: &Invocations) -> LocalHandler<str, u32> {
    let invocations = Rc::clone(invocations);

    LocalHandler::new(move |context: &LocalContext, sender: &str, args: &u32| {
        let receiver = match context.get::<Receiver>() {
            Some(receiver) => {
                *receiver.calls.borrow_mut() += 1;
                receiver.name.to_string()
            }
            None => "<none>".to_string(),
        };

        invocations
            .borrow_mut()
            .push((receiver, sender.to_string(), *args));
    })
}

#[test]
fn unbound_handler_receives_sender_and_args_once() {
    let channel = LocalEventChannel::<str, u32>::new();
    let invocations = Invocations::default();
    let handler = recording_handler(&invocations);

    channel.subscribe(&handler);
    channel.dispatch("sender", &5).unwrap();

    assert_eq!(
        *invocations.borrow(),
        [("<none>".to_string(), "sender".to_string(), 5)]
    );
}

#[test]
fn bound_handler_receives_its_context() {
    let channel = LocalEventChannel::<str, u32>::new();
    let invocations = Invocations::default();
    let handler = recording_handler(&invocations);
    let receiver = Receiver::shared("ctx");

    channel.subscribe_with(&handler, LocalContext::from_rc(Rc::clone(&receiver)));
    channel.dispatch("s", &1).unwrap();

    assert_eq!(receiver.calls(), 1);
    assert_eq!(invocations.borrow()[0].0, "ctx");
}

#[test]
fn unsubscribing_one_context_keeps_the_other() {
    let channel = LocalEventChannel::<str, u32>::new();
    let invocations = Invocations::default();
    let handler = recording_handler(&invocations);
    let one = Receiver::shared("1");
    let two = Receiver::shared("2");

    channel.subscribe_with(&handler, LocalContext::from_rc(Rc::clone(&one)));
    channel.subscribe_with(&handler, LocalContext::from_rc(Rc::clone(&two)));

    // A fresh context created from the same shared object is the same context.
    channel.unsubscribe_with(&handler, &LocalContext::from_rc(Rc::clone(&one)));
    channel.dispatch("s", &1).unwrap();

    assert_eq!(one.calls(), 0);
    assert_eq!(two.calls(), 1);
    assert_eq!(invocations.borrow().len(), 1);
}

#[test]
fn duplicate_subscription_is_invoked_once() {
    let channel = LocalEventChannel::<str, u32>::new();
    let invocations = Invocations::default();
    let handler = recording_handler(&invocations);

    channel.subscribe(&handler);
    channel.subscribe(&handler);
    channel.dispatch("s", &1).unwrap();

    assert_eq!(invocations.borrow().len(), 1);
}

#[test]
fn unbound_and_bound_subscriptions_are_distinct() {
    let channel = LocalEventChannel::<str, u32>::new();
    let invocations = Invocations::default();
    let handler = recording_handler(&invocations);
    let receiver = Receiver::shared("bound");

    channel.subscribe(&handler);
    channel.subscribe_with(&handler, LocalContext::from_rc(Rc::clone(&receiver)));
    assert_eq!(channel.len(), 2);
    assert_eq!(channel.handler_count(), 1);

    channel.unsubscribe(&handler);
    channel.dispatch("s", &1).unwrap();

    assert_eq!(receiver.calls(), 1);
    assert_eq!(invocations.borrow().len(), 1);
}

#[test]
fn handlers_run_in_subscription_order() {
    let channel = EventChannel::<(), EventArgs>::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let make = |name: &'static str| {
        let order = Arc::clone(&order);
        Handler::new(move |_: &Context, (): &(), _: &EventArgs| {
            order.lock().unwrap().push(name);
        })
    };

    let h1 = make("h1");
    let h2 = make("h2");
    let h3 = make("h3");

    channel.subscribe(&h1);
    channel.subscribe(&h2);
    channel.subscribe(&h3);
    channel.dispatch(&(), &EventArgs::EMPTY).unwrap();

    assert_eq!(*order.lock().unwrap(), ["h1", "h2", "h3"]);
}

#[test]
fn handler_removed_mid_pass_still_runs_in_that_pass() {
    let channel = Arc::new(EventChannel::<(), EventArgs>::new());
    let order = Arc::new(Mutex::new(Vec::new()));

    let b = Handler::new({
        let order = Arc::clone(&order);
        move |_: &Context, (): &(), _: &EventArgs| order.lock().unwrap().push("b")
    });

    let a = Handler::new({
        let order = Arc::clone(&order);
        let channel = Arc::clone(&channel);
        let b = b.clone();
        move |_: &Context, (): &(), _: &EventArgs| {
            order.lock().unwrap().push("a");
            channel.unsubscribe(&b);
        }
    });

    channel.subscribe(&a);
    channel.subscribe(&b);

    channel.dispatch(&(), &EventArgs::EMPTY).unwrap();
    channel.dispatch(&(), &EventArgs::EMPTY).unwrap();

    assert_eq!(*order.lock().unwrap(), ["a", "b", "a"]);

    channel.dispose();
}

#[test]
fn dispose_then_resubscribe() {
    let channel = EventChannel::<(), EventArgs>::new();
    let count = Arc::new(Mutex::new(0_u32));

    let handler = Handler::new({
        let count = Arc::clone(&count);
        move |_: &Context, (): &(), _: &EventArgs| *count.lock().unwrap() += 1
    });

    channel.subscribe(&handler);
    channel.subscribe_with(&handler, Context::new("second"));
    channel.dispose();

    assert!(channel.is_empty());
    channel.dispatch(&(), &EventArgs::EMPTY).unwrap();
    assert_eq!(*count.lock().unwrap(), 0);

    channel.subscribe(&handler);
    channel.dispatch(&(), &EventArgs::EMPTY).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn dropped_handler_cannot_be_unsubscribed_but_still_runs() {
    let channel = LocalEventChannel::<str, u32>::new();
    let invocations = Invocations::default();

    // The only handle to the handler is dropped right after subscribing.
    channel.subscribe(&recording_handler(&invocations));

    // A new handler built the same way is a different handler.
    channel.unsubscribe(&recording_handler(&invocations));
    channel.dispatch("s", &1).unwrap();

    assert_eq!(channel.len(), 1);
    assert_eq!(invocations.borrow().len(), 1);

    channel.dispose();
    assert!(channel.is_empty());
}

#[test]
fn handler_error_reaches_dispatch_caller() {
    let channel = LocalEventChannel::<str, u32>::builder()
        .name("on_frame")
        .build_local();
    let invocations = Invocations::default();

    let reject_odd = LocalHandler::fallible(|_, _: &str, frame: &u32| {
        if frame % 2 == 1 {
            Err(format!("odd frame {frame}"))
        } else {
            Ok(())
        }
    });
    let record = recording_handler(&invocations);

    channel.subscribe(&reject_odd);
    channel.subscribe(&record);

    channel.dispatch("s", &2).unwrap();
    assert_eq!(invocations.borrow().len(), 1);

    let error = channel.dispatch("s", &3).unwrap_err();
    assert!(matches!(
        error,
        DispatchError::HandlerFailed {
            position: 0,
            skipped: 1,
            ..
        }
    ));
    assert!(error.to_string().contains("on_frame"));
    assert!(error.to_string().contains("odd frame 3"));
    assert_eq!(invocations.borrow().len(), 1);
}

#[test]
fn owner_exposes_only_subscription_surface() {
    struct Downloader {
        on_progress: EventChannel<str, u32>,
    }

    impl Downloader {
        fn on_progress(&self) -> &impl EventSource<Handler = Handler<str, u32>, Context = Context> {
            &self.on_progress
        }

        fn download(&self, url: &str) {
            for percent in [50, 100] {
                self.on_progress.dispatch(url, &percent).unwrap();
            }
        }
    }

    let downloader = Downloader {
        on_progress: EventChannel::new(),
    };
    let progress = Arc::new(Mutex::new(Vec::new()));

    let track = Handler::new({
        let progress = Arc::clone(&progress);
        move |_: &Context, url: &str, percent: &u32| {
            progress.lock().unwrap().push(format!("{url} {percent}%"));
        }
    });

    downloader.on_progress().subscribe(&track);
    downloader.download("https://example.com/file");
    downloader.on_progress().unsubscribe(&track);
    downloader.download("https://example.com/other");

    assert_eq!(
        *progress.lock().unwrap(),
        ["https://example.com/file 50%", "https://example.com/file 100%"]
    );
}

#[test]
fn thread_safe_channel_shared_between_threads() {
    const THREADS: usize = 4;
    const PASSES_PER_THREAD: usize = 50;

    let channel = EventChannel::<(), EventArgs>::builder()
        .name("on_sample")
        .build();
    let seen = Arc::new(AtomicUsize::new(0));

    let count = Handler::new({
        let seen = Arc::clone(&seen);
        move |_: &Context, (): &(), _: &EventArgs| {
            seen.fetch_add(1, Ordering::Relaxed);
        }
    });

    channel.subscribe(&count);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                // Each thread adds and removes its own bound subscription while dispatching.
                let context = Context::new(thread::current().id());

                for _ in 0..PASSES_PER_THREAD {
                    channel.subscribe_with(&count, context.clone());
                    channel.dispatch(&(), &EventArgs::EMPTY).unwrap();
                    channel.unsubscribe_with(&count, &context);
                }
            });
        }
    });

    // The unbound subscription ran in every pass; each pass also saw its own thread's context.
    assert!(seen.load(Ordering::Relaxed) >= THREADS * PASSES_PER_THREAD * 2);
    assert_eq!(channel.len(), 1);
    assert!(channel.contains(&count, &Context::none()));
}
