use std::time::Duration;

/// Frame timing with an exponentially smoothed frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    frame_count: u64,
    total_time: f32,
    smoothed_dt: Option<f32>,
    smoothing: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FrameStats {
    /// `smoothing` is the weight of each new sample, clamped to `(0, 1]`.
    pub fn new(smoothing: f32) -> Self {
        Self {
            frame_count: 0,
            total_time: 0.0,
            smoothed_dt: None,
            smoothing: smoothing.clamp(f32::EPSILON, 1.0),
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.record_secs(dt.as_secs_f32());
    }

    pub fn record_secs(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.frame_count += 1;
        self.total_time += dt;
        self.smoothed_dt = Some(match self.smoothed_dt {
            None => dt,
            Some(prev) => prev + (dt - prev) * self.smoothing,
        });
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Seconds accumulated across all recorded frames.
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Smoothed seconds per frame, or zero before the first sample.
    pub fn frame_time(&self) -> f32 {
        self.smoothed_dt.unwrap_or(0.0)
    }

    /// Smoothed frames per second, or zero when no time has passed.
    pub fn fps(&self) -> f32 {
        match self.smoothed_dt {
            Some(dt) if dt > 0.0 => 1.0 / dt,
            _ => 0.0,
        }
    }
}
