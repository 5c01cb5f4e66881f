//! Frame scheduling primitives.
//!
//! The host owns the actual timer (a `requestAnimationFrame` callback in the
//! browser, a plain loop in the CLI). [`FrameLoop`] tracks whether that timer
//! should keep re-arming itself and drives one animation frame per tick.

use crate::animation::{Animation, FrameOutcome};
use crate::surface::Surface;

/// Running or paused state of a host's frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
}

/// Explicit "schedule the next tick" state.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    ticks: u64,
    drawn: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    /// A loop that starts running.
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            ticks: 0,
            drawn: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Stops re-scheduling, e.g. while the page is hidden.
    pub fn pause(&mut self) {
        self.state = LoopState::Paused;
    }

    /// Resumes the loop. Returns `true` when it was paused, meaning the host
    /// must arm a new frame callback itself.
    pub fn resume(&mut self) -> bool {
        let was_paused = self.state == LoopState::Paused;
        self.state = LoopState::Running;
        was_paused
    }

    /// Runs one frame of `animation` onto `surface`.
    ///
    /// Returns `None` without touching the animation while paused.
    pub fn tick(
        &mut self,
        animation: &mut dyn Animation,
        surface: &mut dyn Surface,
    ) -> Option<FrameOutcome> {
        if !self.is_running() {
            return None;
        }
        self.ticks += 1;
        let outcome = animation.frame(surface);
        if outcome == FrameOutcome::Drawn {
            self.drawn += 1;
        }
        Some(outcome)
    }

    /// Ticks delivered while running, drawn or idle.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks that actually painted.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}

/// Fires on every `interval`-th frame, starting with frame 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    interval: u64,
}

impl Cadence {
    /// An interval of 0 is treated as 1 (every frame).
    pub fn every(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn is_due(&self, frame: u64) -> bool {
        frame % self.interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{HostStyle, Theme, Viewport};
    use crate::surface::Recorder;
    use serde_json::{json, Value};

    struct Counter {
        frames: u32,
        idle: bool,
    }

    impl Animation for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }
        fn resize(&mut self, _viewport: Viewport) {}
        fn set_pointer(&mut self, _x: f64, _y: f64) {}
        fn set_theme(&mut self, _theme: Theme) {}
        fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
            self.frames += 1;
            if self.idle {
                return FrameOutcome::Idle;
            }
            surface.clear();
            FrameOutcome::Drawn
        }
        fn host_style(&self) -> HostStyle {
            HostStyle {
                opacity: 1.0,
                transparent: false,
            }
        }
        fn params(&self) -> Value {
            json!({})
        }
        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    #[test]
    fn running_loop_drives_frames() {
        let mut lp = FrameLoop::new();
        let mut anim = Counter {
            frames: 0,
            idle: false,
        };
        let mut rec = Recorder::new();
        for _ in 0..3 {
            assert_eq!(lp.tick(&mut anim, &mut rec), Some(FrameOutcome::Drawn));
        }
        assert_eq!(anim.frames, 3);
        assert_eq!(lp.ticks(), 3);
        assert_eq!(lp.drawn(), 3);
        assert_eq!(rec.count("clear"), 3);
    }

    #[test]
    fn paused_loop_skips_animation() {
        let mut lp = FrameLoop::new();
        let mut anim = Counter {
            frames: 0,
            idle: false,
        };
        let mut rec = Recorder::new();
        lp.pause();
        assert_eq!(lp.tick(&mut anim, &mut rec), None);
        assert_eq!(anim.frames, 0);
        assert!(rec.is_empty());
    }

    #[test]
    fn resume_reports_whether_rescheduling_is_needed() {
        let mut lp = FrameLoop::new();
        assert!(!lp.resume());
        lp.pause();
        assert_eq!(lp.state(), LoopState::Paused);
        assert!(lp.resume());
        assert!(lp.is_running());
    }

    #[test]
    fn idle_frames_count_as_ticks_not_draws() {
        let mut lp = FrameLoop::new();
        let mut anim = Counter {
            frames: 0,
            idle: true,
        };
        let mut rec = Recorder::new();
        assert_eq!(lp.tick(&mut anim, &mut rec), Some(FrameOutcome::Idle));
        assert_eq!(lp.ticks(), 1);
        assert_eq!(lp.drawn(), 0);
    }

    #[test]
    fn cadence_fires_on_multiples() {
        let c = Cadence::every(15);
        let due: Vec<u64> = (0..46).filter(|&f| c.is_due(f)).collect();
        assert_eq!(due, vec![0, 15, 30, 45]);
    }

    #[test]
    fn zero_cadence_means_every_frame() {
        let c = Cadence::every(0);
        assert_eq!(c.interval(), 1);
        assert!((0..5).all(|f| c.is_due(f)));
    }
}
