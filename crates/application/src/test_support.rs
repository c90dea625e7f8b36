//! Log capture for unit tests

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tracing::{Event, Level, Subscriber, subscriber::DefaultGuard};
use tracing_subscriber::{Layer, layer::Context, prelude::*};

/// Counts events at or above WARN, and all events overall
#[derive(Debug, Clone, Default)]
pub struct EventCounter {
    total: Arc<AtomicUsize>,
    warnings: Arc<AtomicUsize>,
}

impl EventCounter {
    /// Install the counter as the thread's default subscriber
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for EventCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.total.fetch_add(1, Ordering::SeqCst);
        if *event.metadata().level() <= Level::WARN {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }
}
