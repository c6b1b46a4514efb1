/// Diagnostic logging, injected into components rather than installed globally.
///
/// A [`Diagnostics`] owns a `tracing` dispatcher chosen once at construction:
/// a stderr `fmt` subscriber when `--verbose` is set, otherwise
/// [`Dispatch::none`], which drops every event before formatting.
/// Components emit ordinary `tracing` events inside [`Diagnostics::scope`].
use std::time::Instant;

use tracing::{Dispatch, Level};

/// Handle to the diagnostic channel for one run.
#[derive(Clone)]
pub struct Diagnostics {
    dispatch: Dispatch,
    active: bool,
}

impl Diagnostics {
    /// Construct from the `--verbose` flag.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        if verbose {
            Self::stderr()
        } else {
            Self::silent()
        }
    }

    /// A channel that discards everything.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            dispatch: Dispatch::none(),
            active: false,
        }
    }

    fn stderr() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .without_time()
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
            active: true,
        }
    }

    /// Whether diagnostics are being written anywhere.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run `f` with this channel as the current `tracing` dispatcher.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Start a named timer. Logs elapsed milliseconds on drop when active.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer {
            label,
            start: Instant::now(),
            diag: self.clone(),
        }
    }
}

/// A RAII timer that reports its lifetime through [`Diagnostics`].
///
/// Created via [`Diagnostics::timer`].
pub struct DebugTimer {
    label: &'static str,
    start: Instant,
    diag: Diagnostics,
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if !self.diag.is_active() {
            return;
        }
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        let label = self.label;
        self.diag
            .scope(|| tracing::debug!(target: "raco_events::timing", "{label}: {ms:.2}ms"));
    }
}
