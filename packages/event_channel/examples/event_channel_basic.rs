//! Subscribes a few handlers to a single-threaded channel and dispatches events through it,
//! with trace-level logging enabled to show what the channel does.

use std::cell::Cell;
use std::rc::Rc;

use event_channel::{EventArgs, LocalContext, LocalEventChannel, LocalHandler};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== event_channel basic example ===");

    let on_tick = LocalEventChannel::<str>::builder()
        .name("on_tick")
        .build_local();

    let ticks = Rc::new(Cell::new(0_u32));

    let count = LocalHandler::new({
        let ticks = Rc::clone(&ticks);
        move |_: &LocalContext, _: &str, _: &EventArgs| ticks.set(ticks.get().wrapping_add(1))
    });

    let greet = LocalHandler::new(|context: &LocalContext, sender: &str, _: &EventArgs| {
        match context.get::<&'static str>() {
            Some(listener) => println!("{listener} saw a tick from {sender}"),
            None => println!("someone saw a tick from {sender}"),
        }
    });

    on_tick.subscribe(&count);
    on_tick.subscribe(&greet);
    on_tick.subscribe_with(&greet, LocalContext::new("alice"));
    on_tick.subscribe_with(&greet, LocalContext::new("bob"));

    // Already subscribed, so nothing changes.
    on_tick.subscribe(&count);

    println!("{} subscriptions", on_tick.len());

    if let Err(e) = on_tick.dispatch("clock", &EventArgs::EMPTY) {
        eprintln!("tick failed: {e}");
    }

    // Only the unbound subscription of `greet` goes away.
    on_tick.unsubscribe(&greet);

    if let Err(e) = on_tick.dispatch("clock", &EventArgs::EMPTY) {
        eprintln!("tick failed: {e}");
    }

    on_tick.dispose();

    if let Err(e) = on_tick.dispatch("clock", &EventArgs::EMPTY) {
        eprintln!("tick failed: {e}");
    }

    println!("counted {} ticks", ticks.get());
    println!("Example completed successfully!");
}
