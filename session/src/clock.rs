use std::time::Duration;

/// Converts monotonically increasing frame timestamps into step deltas.
#[derive(Clone, Copy, Debug)]
pub struct SimulationClock {
    last: Option<Duration>,
    max_step: Duration,
}

impl SimulationClock {
    /// Creates a clock that never reports a delta larger than `max_step`.
    #[must_use]
    pub const fn new(max_step: Duration) -> Self {
        Self {
            last: None,
            max_step,
        }
    }

    /// Returns the time elapsed since the previous frame.
    ///
    /// The first frame and timestamps that run backwards yield a zero delta;
    /// long stalls are clamped so a single step cannot tunnel entities.
    pub fn advance(&mut self, timestamp: Duration) -> Duration {
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| timestamp.saturating_sub(last));
        self.last = Some(timestamp);
        delta.min(self.max_step)
    }
}
