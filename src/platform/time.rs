//! Fixed-step frame clock
//!
//! Real time accumulates between redraws and is paid out in fixed 60 Hz
//! steps. A single frame never runs more than `max_substeps` steps; time
//! beyond that is dropped so a stall does not snowball.

use std::time::Instant;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

const FPS_SAMPLE_COUNT: usize = 60;

pub struct FrameClock {
    pub fixed_dt: f64,
    pub max_substeps: u32,
    accumulator: f64,
    steps_this_frame: u32,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            fixed_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            accumulator: 0.0,
            steps_this_frame: 0,
            last_instant: Instant::now(),
            fps_samples: [SIM_DT; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / SIM_DT,
        }
    }

    /// Start a frame using the wall clock
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Start a frame that lasted `real_dt` seconds
    pub fn advance(&mut self, real_dt: f64) {
        let real_dt = real_dt.max(0.0);
        // Half a step of headroom keeps float error from eating the last step
        let cap = self.fixed_dt * (f64::from(self.max_substeps) + 0.5);
        self.accumulator = (self.accumulator + real_dt).min(cap);
        self.steps_this_frame = 0;

        self.fps_samples[self.fps_sample_index] = real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// Consume one fixed step if enough time has built up
    pub fn should_step(&mut self) -> bool {
        if self.steps_this_frame < self.max_substeps && self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Restart timing after a pause in redraws (e.g. window occluded)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_instant = Instant::now();
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

    fn drain(clock: &mut FrameClock) -> u32 {
        let mut n = 0;
        while clock.should_step() {
            n += 1;
        }
        n
    }

    #[test]
    fn test_one_frame_one_step() {
        let mut clock = FrameClock::new();
        clock.advance(SIM_DT);
        assert_eq!(drain(&mut clock), 1);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = FrameClock::new();
        clock.advance(SIM_DT * 0.6);
        assert_eq!(drain(&mut clock), 0);
        clock.advance(SIM_DT * 0.6);
        assert_eq!(drain(&mut clock), 1);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut clock = FrameClock::new();
        clock.advance(5.0);
        assert_eq!(drain(&mut clock), MAX_SUBSTEPS);
        assert_eq!(clock.steps_this_frame, MAX_SUBSTEPS);
        // The excess was dropped, not carried over
        clock.advance(0.0);
        assert_eq!(drain(&mut clock), 0);
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut clock = FrameClock::new();
        clock.advance(-1.0);
        assert_eq!(drain(&mut clock), 0);
    }

    #[test]
    fn test_fps_smoothing() {
        let mut clock = FrameClock::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            clock.advance(1.0 / 30.0);
        }
        assert!((clock.smoothed_fps - 30.0).abs() < 0.01);
    }
}
