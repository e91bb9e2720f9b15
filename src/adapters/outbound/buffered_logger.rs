use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy)]
enum Level {
    Info,
    Warn,
    Error,
}

/// Moves logging off the caller's task so dispatch ticks never wait on a slow sink.
///
/// Messages go through a bounded channel of `capacity` and are forwarded to `sink` by a
/// background task; when the channel is full the message is dropped and counted.
/// Must be called inside a tokio runtime.
pub fn init_buffered_logger(sink: DynLogger, capacity: usize) -> DynLogger {
    let (tx, mut rx) = mpsc::channel::<(Level, String)>(capacity.max(1));

    tokio::spawn(async move {
        while let Some((level, msg)) = rx.recv().await {
            match level {
                Level::Info => sink.info(&msg),
                Level::Warn => sink.warn(&msg),
                Level::Error => sink.error(&msg),
            }
        }
    });

    Arc::new(BufferedLogger {
        sender: tx,
        dropped: std::sync::atomic::AtomicUsize::new(0),
    })
}

struct BufferedLogger {
    sender: mpsc::Sender<(Level, String)>,
    dropped: std::sync::atomic::AtomicUsize,
}

impl BufferedLogger {
    fn forward(&self, level: Level, msg: &str) {
        if self.sender.try_send((level, msg.to_string())).is_err() {
            let dropped = self.dropped.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
            tracing::trace!(dropped, "log buffer full; message discarded");
        }
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.forward(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.forward(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.forward(Level::Error, msg);
    }
}
