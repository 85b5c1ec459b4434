use std::time::Instant;

pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frame metadata - frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub delta: f32,
}

/// Frame clock - hands out delta time and frame numbers
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    frame_number: u64,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frame_number: 0,
        }
    }

    /// Advance to the next frame; delta is in seconds since the previous tick
    pub fn tick(&mut self) -> FrameInfo {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        let info = FrameInfo {
            number: self.frame_number,
            delta,
        };
        self.frame_number += 1;
        info
    }

    /// Frames handed out so far
    pub fn frames(&self) -> u64 {
        self.frame_number
    }

    /// Restart delta measurement without touching the frame count
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second average refreshed once per interval
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    interval: f32,
    elapsed: f32,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count a frame; returns the new average when the interval rolls over
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed >= self.interval {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(FPS_UPDATE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_measures_delta() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let frame = clock.tick();

        assert!(frame.delta >= 0.009);
        assert_eq!(frame.number, 0);
    }

    #[test]
    fn clock_numbers_frames() {
        let mut clock = Clock::new();
        clock.tick();
        clock.reset();
        assert_eq!(clock.tick().number, 1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn fps_counter_averages_over_interval() {
        let mut counter = FpsCounter::new(1.0);
        for _ in 0..7 {
            assert_eq!(counter.tick(0.125), None);
        }
        let fps = counter.tick(0.125).expect("interval should roll over");
        assert_eq!(fps, 8.0);
        assert_eq!(counter.fps(), fps);
        assert_eq!(counter.tick(0.125), None);
    }
}
