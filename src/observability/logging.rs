//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global subscriber for the binary
//! - Route pipeline diagnostics to a configured sink
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` takes precedence over the configured level
//! - Library code never installs a subscriber; without one, events are dropped

use tracing::Dispatch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global fmt subscriber.
pub fn init_tracing(config: &ObservabilityConfig) {
    let default_filter = format!(
        "prerender_gate={level},tower_http={level}",
        level = config.log_level
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run `f` with `sink` as the current subscriber, if one is configured.
pub fn with_sink<R>(sink: Option<&Dispatch>, f: impl FnOnce() -> R) -> R {
    match sink {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
        None => f(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::span;
    use tracing::subscriber::Subscriber;
    use tracing::{Event, Level, Metadata};

    /// Counts events delivered to it, and how many were errors.
    #[derive(Clone, Default)]
    pub(crate) struct EventCounter {
        total: Arc<AtomicUsize>,
        errors: Arc<AtomicUsize>,
    }

    impl EventCounter {
        pub(crate) fn total(&self) -> usize {
            self.total.load(Ordering::SeqCst)
        }

        pub(crate) fn errors(&self) -> usize {
            self.errors.load(Ordering::SeqCst)
        }
    }

    impl Subscriber for EventCounter {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }
        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}
        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}
        fn event(&self, event: &Event<'_>) {
            self.total.fetch_add(1, Ordering::SeqCst);
            if *event.metadata().level() == Level::ERROR {
                self.errors.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn enter(&self, _: &span::Id) {}
        fn exit(&self, _: &span::Id) {}
    }
}
