//! An object that owns its signals and exposes only their subscription surface, with one
//! subscriber that fails and one that keeps going. Also shows the subscriber count warning.

use std::num::NonZeroUsize;
use std::thread;

use event_channel::{Context, EventChannel, EventSource, Handler};

#[derive(Debug)]
struct Received {
    bytes: usize,
}

struct Connection {
    peer: String,
    on_received: EventChannel<Connection, Received>,
}

impl Connection {
    fn new(peer: &str) -> Self {
        Self {
            peer: peer.to_string(),
            on_received: EventChannel::builder()
                .name("on_received")
                .subscriber_warning_threshold(NonZeroUsize::MIN)
                .build(),
        }
    }

    fn on_received(&self) -> &impl EventSource<Handler = Handler<Self, Received>, Context = Context> {
        &self.on_received
    }

    fn receive(&self, bytes: usize) {
        if let Err(e) = self.on_received.dispatch(self, &Received { bytes }) {
            tracing::error!(peer = %self.peer, error = %e, "subscriber rejected received data");
        }
    }

    fn close(&self) {
        self.on_received.dispose();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== event_channel owner example ===");

    let connection = Connection::new("example.com:443");

    let limit = Handler::fallible(|context: &Context, connection: &Connection, args: &Received| {
        let max = context.get::<usize>().copied().unwrap_or(usize::MAX);

        if args.bytes > max {
            return Err(format!("{} sent {} bytes, limit is {max}", connection.peer, args.bytes));
        }

        Ok(())
    });

    let log = Handler::new(|_: &Context, connection: &Connection, args: &Received| {
        println!("{} bytes from {}", args.bytes, connection.peer);
    });

    connection.on_received().subscribe_with(&limit, Context::new(1024_usize));

    // The second subscription crosses the threshold of one and emits a warning.
    connection.on_received().subscribe(&log);

    // The thread-safe channel can be dispatched from any thread.
    thread::scope(|s| {
        s.spawn(|| connection.receive(512));
    });

    // `limit` fails here, so `log` is not invoked for this event.
    connection.receive(4096);

    connection.on_received().unsubscribe_with(&limit, &Context::new(1024_usize));
    println!("a fresh context is a different context, limit still subscribed");

    connection.close();
    connection.receive(4096);

    println!("Example completed successfully!");
}
