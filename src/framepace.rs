use std::time::{Duration, Instant};

/// Caps the frame rate and keeps a smoothed FPS reading for the overlay.
pub struct Framepacer {
    frame_start: Instant,
    target: Option<Duration>,
    smoothed_frametime: f32,
}

impl Framepacer {
    pub fn new(framerate: Option<u32>) -> Self {
        Self {
            frame_start: Instant::now(),
            target: framerate
                .filter(|fps| *fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            smoothed_frametime: 0.0,
        }
    }

    pub fn is_limited(&self) -> bool {
        self.target.is_some()
    }

    /// Seconds spent in the current frame so far.
    pub fn frametime(&self) -> f32 {
        self.frame_start.elapsed().as_secs_f32()
    }

    pub fn framerate(&self) -> f32 {
        if self.smoothed_frametime > f32::EPSILON {
            1.0 / self.smoothed_frametime
        } else {
            0.0
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Sleep out the rest of the frame when limited, then record its length.
    pub fn end_frame(&mut self) {
        if let Some(target) = self.target {
            const ACCURACY: Duration = Duration::from_micros(100);
            if let Some(sleep_time) = target.checked_sub(self.frame_start.elapsed() + ACCURACY) {
                std::thread::sleep(sleep_time);
            }
            while self.frame_start.elapsed() < target {
                std::thread::yield_now();
            }
        }

        let frametime = self.frametime();
        self.smoothed_frametime = if self.smoothed_frametime == 0.0 {
            frametime
        } else {
            self.smoothed_frametime * 0.9 + frametime * 0.1
        };
    }
}
