//! A single drifting polygon.

use crate::GeometryParams;
use backdrop_core::pointer::cursor_pull;
use backdrop_core::{Hsl, Surface, Vector, Viewport, Xorshift64};
use std::f64::consts::TAU;

/// Saturation of every shape, in percent.
const SATURATION: f64 = 70.0;
/// Lightness of every shape, in percent.
const LIGHTNESS: f64 = 60.0;
/// Fewest polygon sides.
const MIN_SIDES: u32 = 3;
/// Most polygon sides.
const MAX_SIDES: u32 = 6;

/// A rotating, pulsing polygon that drifts and bounces off the viewport
/// edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeParticle {
    pub position: Vector,
    pub velocity: Vector,
    /// Circumradius before pulsing.
    pub size: f64,
    pub sides: u32,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub pulse_phase: f64,
    pub pulse_speed: f64,
    pub color: Hsl,
    pub opacity: f64,
}

impl ShapeParticle {
    /// Randomizes every attribute within the ranges in `params`.
    pub fn spawn(rng: &mut Xorshift64, viewport: Viewport, params: &GeometryParams) -> Self {
        let position = Vector::new(
            rng.next_f64() * viewport.width,
            rng.next_f64() * viewport.height,
        );
        let velocity = Vector::new(rng.next_signed(params.speed), rng.next_signed(params.speed));
        let (size_min, size_max) = params.size_range;
        let (pulse_min, pulse_max) = params.pulse_speed_range;
        let (hue_min, hue_max) = params.hue_range;
        let (opacity_min, opacity_max) = params.opacity_range;

        Self {
            position,
            velocity,
            size: rng.next_range(size_min, size_max),
            sides: rng.next_between(MIN_SIDES, MAX_SIDES),
            rotation: rng.next_angle(),
            rotation_speed: rng.next_signed(params.rotation_speed),
            pulse_phase: rng.next_angle(),
            pulse_speed: rng.next_range(pulse_min, pulse_max),
            color: Hsl::new(rng.next_range(hue_min, hue_max), SATURATION, LIGHTNESS),
            opacity: rng.next_range(opacity_min, opacity_max),
        }
    }

    /// Advances one tick: cursor push, drift, bounce, then spin and pulse.
    pub fn update(&mut self, viewport: Viewport, cursor: Vector, params: &GeometryParams) {
        let push = cursor_pull(
            self.position,
            cursor,
            params.cursor_radius,
            params.cursor_strength,
        );
        self.position.add(push).add(self.velocity);

        // Only flip a component that is still carrying the shape outward, so
        // a shape nudged past the edge drifts back instead of jittering.
        if (self.position.x < 0.0 && self.velocity.x < 0.0)
            || (self.position.x > viewport.width && self.velocity.x > 0.0)
        {
            self.velocity.x = -self.velocity.x;
        }
        if (self.position.y < 0.0 && self.velocity.y < 0.0)
            || (self.position.y > viewport.height && self.velocity.y > 0.0)
        {
            self.velocity.y = -self.velocity.y;
        }

        self.rotation += self.rotation_speed;
        self.pulse_phase += self.pulse_speed;
    }

    /// Current circumradius including the pulse.
    pub fn pulsed_size(&self, amplitude: f64) -> f64 {
        self.size * (1.0 + self.pulse_phase.sin() * amplitude)
    }

    /// Polygon corners in viewport coordinates.
    pub fn vertices(&self, amplitude: f64) -> Vec<Vector> {
        let radius = self.pulsed_size(amplitude);
        (0..self.sides)
            .map(|i| {
                let angle = self.rotation + i as f64 * TAU / self.sides as f64;
                let mut corner = Vector::from_angle(angle);
                corner.mult(radius).add(self.position);
                corner
            })
            .collect()
    }

    pub fn draw(&self, surface: &mut dyn Surface, params: &GeometryParams) {
        let points = self.vertices(params.pulse_amplitude);
        surface.fill_polygon(&points, self.color.with_alpha(self.opacity));
    }
}
