//! Minimal 2D vector used for positions, flow directions and forces.
//!
//! Mutating operations work in place and return `&mut Self` so they chain:
//!
//! ```
//! use backdrop_core::Vector;
//!
//! let mut v = Vector::new(3.0, 4.0);
//! v.set_mag(1.0).mult(2.0).add(Vector::new(1.0, 0.0));
//! assert!((v.x - 2.2).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// A 2D vector with `f64` components.
///
/// `Vector` is `Copy`: handing one out never aliases the owner's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians).
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// Euclidean length.
    pub fn mag(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Squared length, for radius checks that can skip the square root.
    pub fn mag_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Rescales to length `mag`. A zero-length vector is left untouched.
    pub fn set_mag(&mut self, mag: f64) -> &mut Self {
        let len = self.mag();
        if len > 0.0 {
            self.x = self.x / len * mag;
            self.y = self.y / len * mag;
        }
        self
    }

    pub fn add(&mut self, other: Vector) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    pub fn mult(&mut self, n: f64) -> &mut Self {
        self.x *= n;
        self.y *= n;
        self
    }

    /// Angle of the vector in radians, in (-π, π].
    pub fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Distance to another point.
    pub fn dist(&self, other: Vector) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}
