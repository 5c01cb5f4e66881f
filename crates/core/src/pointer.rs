//! Cursor sampling and cursor influence.
//!
//! Pointer events arrive far more often than frames. [`PointerSampler`]
//! buffers them so an animation sees at most one new cursor position per
//! sampling window, applied between frames.

use crate::vector::Vector;

/// When a buffered pointer event is released to the animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplePolicy {
    /// The first event of a window is latched; later events in the same
    /// window are dropped. The latched position is released once
    /// `interval_ms` has elapsed since it arrived.
    Throttle { interval_ms: f64 },
    /// Every event replaces the pending one; the latest is released at the
    /// next frame.
    NextFrame,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    position: Vector,
    since_ms: f64,
}

/// Buffers pointer events according to a [`SamplePolicy`].
#[derive(Debug, Clone)]
pub struct PointerSampler {
    policy: SamplePolicy,
    pending: Option<Pending>,
}

impl PointerSampler {
    pub fn new(policy: SamplePolicy) -> Self {
        Self {
            policy,
            pending: None,
        }
    }

    pub fn policy(&self) -> SamplePolicy {
        self.policy
    }

    /// Records a pointer event observed at `now_ms`.
    pub fn offer(&mut self, now_ms: f64, x: f64, y: f64) {
        let position = Vector::new(x, y);
        match self.policy {
            SamplePolicy::Throttle { .. } => {
                if self.pending.is_none() {
                    self.pending = Some(Pending {
                        position,
                        since_ms: now_ms,
                    });
                }
            }
            SamplePolicy::NextFrame => {
                self.pending = Some(Pending {
                    position,
                    since_ms: now_ms,
                });
            }
        }
    }

    /// Releases the buffered position if it is due at `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> Option<Vector> {
        let pending = self.pending?;
        let due = match self.policy {
            SamplePolicy::Throttle { interval_ms } => now_ms - pending.since_ms >= interval_ms,
            SamplePolicy::NextFrame => true,
        };
        if due {
            self.pending = None;
            Some(pending.position)
        } else {
            None
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Linear cursor falloff: 1 at zero distance, 0 at `radius` and beyond.
///
/// A non-positive radius disables the influence.
pub fn falloff(distance: f64, radius: f64) -> f64 {
    if radius <= 0.0 || !distance.is_finite() || distance >= radius {
        return 0.0;
    }
    1.0 - distance.max(0.0) / radius
}

/// Displacement toward the cursor for a point at `position`.
///
/// Returns `(cursor - position) * falloff * factor`; a negative `factor`
/// pushes away from the cursor instead.
pub fn cursor_pull(position: Vector, cursor: Vector, radius: f64, factor: f64) -> Vector {
    let delta = Vector::new(cursor.x - position.x, cursor.y - position.y);
    let strength = falloff(delta.mag(), radius);
    if strength == 0.0 {
        return Vector::ZERO;
    }
    let mut pull = delta;
    pull.mult(strength * factor);
    pull
}
