//! Seedable Xorshift64 PRNG.
//!
//! Every random particle attribute is drawn from one of these, so a scene
//! replayed with the same seed paints the same frames.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Xorshift64 with shifts (13, 7, 17).
///
/// A zero seed is replaced with a fixed non-zero value, since zero is a
/// fixed point of the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in [0, 1), from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform in [-half_width, half_width).
    pub fn next_signed(&mut self, half_width: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * half_width
    }

    /// Uniform angle in [0, 2π).
    pub fn next_angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }

    /// Uniform integer in [min, max]. Returns `min` when `max <= min`.
    pub fn next_between(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as u64 + 1;
        min + (self.next_u64() % span) as u32
    }
}
