use std::time::Duration;

use instant::Instant;

/// Caps the delta of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimiter {
    frame_duration: Duration,
}

impl FrameLimiter {
    /// Create a limiter from a target frame per second
    pub fn new(fps: u32) -> Self {
        FrameLimiter {
            frame_duration: Duration::from_secs(1) / fps.max(1),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// A long frame, e.g. after the window was dragged, counts as one
    /// target frame
    pub fn clamp(&self, elapsed: Duration) -> Duration {
        elapsed.min(self.frame_duration)
    }
}

impl Default for FrameLimiter {
    /// Returns a default frame limiter of 60 frames per second
    fn default() -> Self {
        FrameLimiter::new(60)
    }
}

/// Time elapsed between frames and since the engine started
#[derive(Debug, Default, Clone)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    frame: u64,
    last_frame: Option<Instant>,
}

impl Time {
    /// Duration of the last frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Sum of every frame delta
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of frames run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Measures the time since the previous call, the first call measures
    /// nothing
    pub(crate) fn measure(&mut self, limiter: Option<&FrameLimiter>) -> Duration {
        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map(|last| now.duration_since(last))
            .unwrap_or_default();
        self.last_frame = Some(now);

        match limiter {
            Some(limiter) => limiter.clamp(elapsed),
            None => elapsed,
        }
    }

    pub(crate) fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame += 1;
        log::trace!("time: {:?}", self);
    }
}
