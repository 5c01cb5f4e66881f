#![deny(unsafe_code)]
//! Core types and traits for backdrop, a pair of decorative page-background
//! animations.
//!
//! Provides the [`Animation`] and [`Surface`] traits that separate animation
//! logic from whatever host paints it, the [`Vector`] primitive, improved
//! Perlin [`noise`](noise::noise), HSL/RGBA colors, the `Xorshift64` PRNG,
//! frame scheduling and pointer sampling helpers, and the [`Scene`] config.

pub mod animation;
pub mod color;
pub mod error;
pub mod frame_loop;
pub mod noise;
pub mod params;
pub mod pointer;
pub mod prng;
pub mod scene;
pub mod surface;
pub mod vector;

pub use animation::{Animation, FrameOutcome, HostStyle, Theme, Viewport};
pub use color::{Hsl, Rgba, Srgb};
pub use error::BackdropError;
pub use frame_loop::{Cadence, FrameLoop};
pub use pointer::{PointerSampler, SamplePolicy};
pub use prng::Xorshift64;
pub use scene::Scene;
pub use surface::{LineCap, LinearGradient, Rect, Recorder, Stroke, Surface};
pub use vector::Vector;
