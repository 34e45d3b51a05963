use std::time::{Duration, Instant};

/// Upper bound for a single frame delta, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Logs the lifetime of a scope at debug level.
pub struct StopWatch {
    started: Instant,
    label: &'static str
}

impl StopWatch {
    pub fn named(label: &'static str) -> Self {
        Self { label, started: Instant::now() }
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.started.elapsed().as_secs_f32() * 1000.0
    }
}

impl Drop for StopWatch {
    fn drop(&mut self) {
        log::debug!("{} took {:.2} ms", self.label, self.elapsed_ms());
    }
}

/// Seconds between consecutive render loop iterations, clamped to [`MAX_FRAME_DELTA`].
pub struct FrameClock {
    last: Instant
}

impl FrameClock {
    pub fn start() -> Self {
        Self { last: Instant::now() }
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = clamp_delta(now.duration_since(self.last));
        self.last = now;
        delta
    }
}

fn clamp_delta(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_FRAME_DELTA)
}
