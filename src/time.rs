//! Frame timing for the demo loop.
//!
//! A thin clock over `std::time`: monotonically increasing elapsed seconds
//! (the evaluators' time input), per-frame delta, and a periodically
//! refreshed FPS estimate.

use std::time::{Duration, Instant};

/// Tracks elapsed time, frame delta, and FPS across a render loop.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frames: u64,
    fps_marker: Instant,
}

/// How often the FPS estimate is recomputed.
const FPS_WINDOW: Duration = Duration::from_millis(500);

impl FrameClock {
    /// Start the clock now. Elapsed time begins near zero.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_marker: now,
        }
    }

    /// Advance the clock by one frame; call once per rendered frame.
    ///
    /// Returns the new elapsed time in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        let window = now.duration_since(self.fps_marker);
        if window >= FPS_WINDOW {
            self.fps = (self.frame_count - self.fps_frames) as f32 / window.as_secs_f32();
            self.fps_frames = self.frame_count;
            self.fps_marker = now;
        }
        self.elapsed_secs
    }

    /// Seconds since the clock started, as of the last tick.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Most recent FPS estimate (0 until the first window elapses).
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_tick_advances() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(5));
        let t = clock.tick();
        assert!(t > 0.0);
        assert!(clock.delta() > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_elapsed_monotone() {
        let mut clock = FrameClock::new();
        let mut prev = 0.0;
        for _ in 0..5 {
            thread::sleep(Duration::from_millis(2));
            let t = clock.tick();
            assert!(t >= prev);
            prev = t;
        }
    }
}
