//! Scoped wall-clock diagnostics.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Serializes diagnostic lines so concurrent stopwatches never interleave
/// mid-line. Never taken on the build path.
static DIAGNOSTICS: Mutex<()> = Mutex::new(());

/// A wall-clock span that announces itself when started and reports its
/// elapsed time when dropped, both on stderr.
pub struct Stopwatch {
    label: String,
    started: Instant,
}

impl Stopwatch {
    /// Start a span, printing `<label> has started`.
    pub fn start(label: impl Into<String>) -> Stopwatch {
        let label = label.into();
        {
            let _serialized = DIAGNOSTICS.lock();
            eprintln!("{label} has started");
        }
        Stopwatch {
            label,
            started: Instant::now(),
        }
    }

    /// Time elapsed since the span started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        let _serialized = DIAGNOSTICS.lock();
        eprintln!("{} took {:.3}s", self.label, elapsed.as_secs_f64());
    }
}
