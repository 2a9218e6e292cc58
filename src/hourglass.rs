use std::time::{
    Duration,
    Instant,
};

pub const SAND_DURATION: Duration = Duration::from_secs(90);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SandState {
    Idle,
    Running { remaining: Duration },
    Finished,
}

/// Decorative countdown attached to the hourglass card.
///
/// Nothing in the game depends on it; it only answers questions about a
/// given instant so the UI can draw the sand.
#[derive(Clone, Debug)]
pub struct Hourglass {
    duration: Duration,
    started_at: Option<Instant>,
}

impl Default for Hourglass {
    fn default() -> Self {
        Self::new(SAND_DURATION)
    }
}

impl Hourglass {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: None,
        }
    }

    /// Turns the glass over, restarting it if sand is already falling.
    pub fn flip(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn state(&self, now: Instant) -> SandState {
        match self.started_at {
            None => SandState::Idle,
            Some(start) => {
                let elapsed = now.saturating_duration_since(start);
                if elapsed >= self.duration {
                    SandState::Finished
                } else {
                    SandState::Running {
                        remaining: self.duration - elapsed,
                    }
                }
            }
        }
    }

    /// Share of sand left in the top bulb, from 1.0 down to 0.0.
    pub fn sand_left(&self, now: Instant) -> f64 {
        match self.state(now) {
            SandState::Idle => 1.0,
            SandState::Running { remaining } => {
                remaining.as_secs_f64() / self.duration.as_secs_f64()
            }
            SandState::Finished => 0.0,
        }
    }
}
