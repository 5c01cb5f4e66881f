#![deny(unsafe_code)]
//! Animation registry: maps animation names to implementations and provides
//! offline rendering onto a software surface.
//!
//! This crate sits between `backdrop-core` (which defines the `Animation`
//! trait) and the animation crates (`backdrop-geometry`, `backdrop-flow`).
//! Both the CLI and the WASM host depend on it so name dispatch lives in one
//! place.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use backdrop_core::{
    Animation, BackdropError, FrameLoop, FrameOutcome, HostStyle, Scene, Surface, Theme, Viewport,
};
use backdrop_flow::FlowTrails;
use backdrop_geometry::GeometryField;
use serde_json::Value;

/// All available animation names.
const ANIMATION_NAMES: &[&str] = &["geometry", "flow"];

/// Enumeration of the available backgrounds.
///
/// Wraps each animation and delegates `Animation` trait methods. Use
/// [`AnimationKind::from_name`] for string-based construction (CLI, WASM).
pub enum AnimationKind {
    /// Rotating, pulsing polygons over a hue-shifting gradient.
    Geometry(GeometryField),
    /// Particle trails steered by a Perlin flow field.
    Flow(FlowTrails),
}

impl AnimationKind {
    /// Constructs an animation by name.
    ///
    /// Returns `BackdropError::UnknownAnimation` if the name is not
    /// recognized.
    pub fn from_name(
        name: &str,
        viewport: Viewport,
        theme: Theme,
        seed: u64,
        params: &Value,
    ) -> Result<Self, BackdropError> {
        match name {
            "geometry" => Ok(AnimationKind::Geometry(GeometryField::from_json(
                viewport, theme, seed, params,
            ))),
            "flow" => Ok(AnimationKind::Flow(FlowTrails::from_json(
                viewport, theme, seed, params,
            ))),
            _ => Err(BackdropError::UnknownAnimation(name.to_string())),
        }
    }

    /// Validates `scene`, builds its animation and rests the cursor where
    /// the scene says.
    pub fn from_scene(scene: &Scene) -> Result<Self, BackdropError> {
        scene.validate()?;
        let mut animation = Self::from_name(
            &scene.animation,
            scene.viewport(),
            scene.theme,
            scene.seed,
            &scene.params,
        )?;
        if let Some([x, y]) = scene.pointer {
            animation.set_pointer(x, y);
        }
        Ok(animation)
    }

    /// Returns a slice of all recognized animation names.
    pub fn list_animations() -> &'static [&'static str] {
        ANIMATION_NAMES
    }
}

impl Animation for AnimationKind {
    fn name(&self) -> &'static str {
        match self {
            AnimationKind::Geometry(a) => a.name(),
            AnimationKind::Flow(a) => a.name(),
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        match self {
            AnimationKind::Geometry(a) => a.resize(viewport),
            AnimationKind::Flow(a) => a.resize(viewport),
        }
    }

    fn set_pointer(&mut self, x: f64, y: f64) {
        match self {
            AnimationKind::Geometry(a) => a.set_pointer(x, y),
            AnimationKind::Flow(a) => a.set_pointer(x, y),
        }
    }

    fn set_theme(&mut self, theme: Theme) {
        match self {
            AnimationKind::Geometry(a) => a.set_theme(theme),
            AnimationKind::Flow(a) => a.set_theme(theme),
        }
    }

    fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
        match self {
            AnimationKind::Geometry(a) => a.frame(surface),
            AnimationKind::Flow(a) => a.frame(surface),
        }
    }

    fn host_style(&self) -> HostStyle {
        match self {
            AnimationKind::Geometry(a) => a.host_style(),
            AnimationKind::Flow(a) => a.host_style(),
        }
    }

    fn params(&self) -> Value {
        match self {
            AnimationKind::Geometry(a) => a.params(),
            AnimationKind::Flow(a) => a.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            AnimationKind::Geometry(a) => a.param_schema(),
            AnimationKind::Flow(a) => a.param_schema(),
        }
    }
}

/// Tally of an offline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub drawn: u64,
}

/// Drives `frames` ticks of `animation` onto `surface` through a
/// [`FrameLoop`], as a browser host would.
pub fn run_frames(
    animation: &mut dyn Animation,
    surface: &mut dyn Surface,
    frames: usize,
) -> RunStats {
    let mut frame_loop = FrameLoop::new();
    for _ in 0..frames {
        frame_loop.tick(animation, surface);
    }
    log::debug!(
        "{}: ran {} frames, {} drawn",
        animation.name(),
        frame_loop.ticks(),
        frame_loop.drawn()
    );
    RunStats {
        frames: frame_loop.ticks(),
        drawn: frame_loop.drawn(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::Recorder;
    use serde_json::json;

    fn viewport() -> Viewport {
        Viewport::new(320.0, 240.0)
    }

    #[test]
    fn from_name_builds_each_animation() {
        for &name in AnimationKind::list_animations() {
            let a = AnimationKind::from_name(name, viewport(), Theme::Dark, 1, &json!({})).unwrap();
            assert_eq!(a.name(), name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = AnimationKind::from_name("aurora", viewport(), Theme::Dark, 1, &json!({}));
        assert!(matches!(result, Err(BackdropError::UnknownAnimation(n)) if n == "aurora"));
    }

    #[test]
    fn list_animations_names_both_backgrounds() {
        assert_eq!(AnimationKind::list_animations(), &["geometry", "flow"]);
    }

    #[test]
    fn from_scene_applies_pointer() {
        let mut scene = Scene::new("geometry", 320, 240);
        scene.pointer = Some([10.0, 20.0]);
        match AnimationKind::from_scene(&scene).unwrap() {
            AnimationKind::Geometry(g) => assert_eq!(g.cursor(), backdrop_core::Vector::new(10.0, 20.0)),
            AnimationKind::Flow(_) => panic!("expected geometry"),
        }
    }

    #[test]
    fn from_scene_validates_first() {
        let scene = Scene::new("flow", 0, 240);
        assert!(matches!(
            AnimationKind::from_scene(&scene),
            Err(BackdropError::InvalidDimensions)
        ));
    }

    #[test]
    fn delegation_host_style_and_params() {
        let g = AnimationKind::from_name("geometry", viewport(), Theme::Dark, 1, &json!({})).unwrap();
        let f = AnimationKind::from_name("flow", viewport(), Theme::Dark, 1, &json!({})).unwrap();
        assert!(!g.host_style().transparent);
        assert!(f.host_style().transparent);
        assert!(g.params().get("connection_radius").is_some());
        assert!(f.param_schema().get("scale").is_some());
    }

    #[test]
    fn run_frames_counts_idle_geometry_in_light_mode() {
        let mut a =
            AnimationKind::from_name("geometry", viewport(), Theme::Light, 1, &json!({})).unwrap();
        let mut rec = Recorder::new();
        let stats = run_frames(&mut a, &mut rec, 10);
        assert_eq!(stats, RunStats { frames: 10, drawn: 0 });
        assert!(rec.is_empty());
    }

    #[test]
    fn theme_switch_through_registry() {
        let mut a =
            AnimationKind::from_name("geometry", viewport(), Theme::Light, 1, &json!({})).unwrap();
        a.set_theme(Theme::Dark);
        let mut rec = Recorder::new();
        assert_eq!(run_frames(&mut a, &mut rec, 3).drawn, 3);
    }

    #[test]
    fn determinism_same_seed() {
        let mut a = AnimationKind::from_name("flow", viewport(), Theme::Dark, 99, &json!({})).unwrap();
        let mut b = AnimationKind::from_name("flow", viewport(), Theme::Dark, 99, &json!({})).unwrap();
        let (mut ra, mut rb) = (Recorder::new(), Recorder::new());
        run_frames(&mut a, &mut ra, 25);
        run_frames(&mut b, &mut rb, 25);
        assert_eq!(ra.commands(), rb.commands());
    }

    #[test]
    fn object_safety() {
        let a = AnimationKind::from_name("flow", viewport(), Theme::Dark, 1, &json!({})).unwrap();
        let boxed: Box<dyn Animation> = Box::new(a);
        assert_eq!(boxed.name(), "flow");
    }
}
