//! Timestamp-comparison interval gate.

/// Fires at most once per interval, judged purely by timestamp comparison.
///
/// There is no timer or interrupt behind this: the caller passes the current
/// time each frame and the gate fires when a full interval has elapsed since
/// it last fired. Used for the ≥1 s reporting tick and the 5 s assessment
/// cycle.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval_ms: f64,
    last_fired_ms: f64,
}

impl Cadence {
    /// Create a gate whose first interval starts at `now_ms`.
    pub fn new(interval_ms: f64, now_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: now_ms,
        }
    }

    /// Returns `true` (and rearms) if an interval has elapsed since the last fire.
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_fired_ms >= self.interval_ms {
            self.last_fired_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// The configured interval in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}
