//! A single particle leaving a fading trail through the flow field.

use crate::field::FlowField;
use crate::FlowParams;
use backdrop_core::pointer::cursor_pull;
use backdrop_core::{Hsl, LineCap, Stroke, Surface, Theme, Vector, Viewport, Xorshift64};
use std::f64::consts::{PI, TAU};

const SATURATION: f64 = 80.0;
const DARK_LIGHTNESS: f64 = 60.0;
const LIGHT_LIGHTNESS: f64 = 40.0;

/// A particle that steers along the flow field and is drawn as the segment
/// between its previous and current positions.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailParticle {
    pub position: Vector,
    pub previous: Vector,
    pub speed: f64,
    pub max_speed: f64,
    /// Heading in radians.
    pub angle: f64,
    pub previous_angle: f64,
    pub size: f64,
    /// Remaining life in [0, 1]; also scales the stroke width.
    pub life: f64,
    pub decay: f64,
    pub color: Hsl,
}

impl TrailParticle {
    pub fn spawn(rng: &mut Xorshift64, viewport: Viewport, theme: Theme, params: &FlowParams) -> Self {
        let mut particle = Self {
            position: Vector::ZERO,
            previous: Vector::ZERO,
            speed: 0.0,
            max_speed: params.max_speed,
            angle: 0.0,
            previous_angle: 0.0,
            size: 0.0,
            life: 1.0,
            decay: 0.0,
            color: Hsl::new(0.0, SATURATION, DARK_LIGHTNESS),
        };
        particle.reset(rng, viewport, theme, params);
        particle
    }

    /// Re-randomizes the particle somewhere in the viewport with full life
    /// and a color from the theme's hue band.
    pub fn reset(&mut self, rng: &mut Xorshift64, viewport: Viewport, theme: Theme, params: &FlowParams) {
        self.position = Vector::new(
            rng.next_f64() * viewport.width,
            rng.next_f64() * viewport.height,
        );
        self.previous = self.position;
        self.max_speed = params.max_speed;
        let (speed_min, speed_max) = params.speed_range;
        self.speed = rng.next_range(speed_min, speed_max);
        self.angle = rng.next_angle();
        self.previous_angle = self.angle;
        let (size_min, size_max) = params.size_range;
        self.size = rng.next_range(size_min, size_max);
        self.life = 1.0;
        let (decay_min, decay_max) = params.decay_range;
        self.decay = rng.next_range(decay_min, decay_max);

        let ((hue_min, hue_max), lightness) = if theme.is_dark() {
            (params.dark_hue_range, DARK_LIGHTNESS)
        } else {
            (params.light_hue_range, LIGHT_LIGHTNESS)
        };
        self.color = Hsl::new(rng.next_range(hue_min, hue_max), SATURATION, lightness);
    }

    /// Advances one tick: steer toward the local force, move, then reset if
    /// the particle left the viewport or ran out of life.
    ///
    /// The heading eases by `heading_ease` along the shorter arc to the force
    /// direction, not by blending the raw angles. A target just across the
    /// ±π seam therefore nudges the trail instead of swinging it most of a
    /// full turn.
    pub fn update(
        &mut self,
        field: &FlowField,
        cursor: Vector,
        viewport: Viewport,
        theme: Theme,
        params: &FlowParams,
        rng: &mut Xorshift64,
    ) {
        let mut force = field.lookup(self.position.x, self.position.y);
        force.add(cursor_pull(
            self.position,
            cursor,
            params.cursor_radius,
            params.cursor_strength,
        ));

        self.previous_angle = self.angle;
        let target = force.heading();
        self.angle += shortest_arc(self.angle, target) * params.heading_ease;

        let target_speed = (force.mag() * params.force_gain).min(self.max_speed);
        self.speed += (target_speed - self.speed) * params.speed_ease;

        self.previous = self.position;
        let mut step = Vector::from_angle(self.angle);
        step.mult(self.speed);
        self.position.add(step);

        if !viewport.contains(self.position.x, self.position.y) {
            self.reset(rng, viewport, theme, params);
            return;
        }

        self.life -= self.decay;
        if self.life <= 0.0 {
            self.reset(rng, viewport, theme, params);
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.stroke_line(Stroke {
            from: self.previous,
            to: self.position,
            width: self.size * self.life,
            color: self.color.with_alpha(1.0),
            cap: LineCap::Round,
        });
    }
}

/// Signed difference `to - from` wrapped into [-π, π).
fn shortest_arc(from: f64, to: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}
