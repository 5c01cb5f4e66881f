#![deny(unsafe_code)]
//! Fluid geometry background.
//!
//! A sparse set of translucent polygons drifts across a dark gradient whose
//! two hues slowly rotate. Shapes spin, pulse in size, bounce off the
//! viewport edges and shy away from the cursor. Pairs of shapes closer than
//! the connection radius are joined by faint lines.
//!
//! The animation only paints in dark mode. In light mode every frame is
//! [`FrameOutcome::Idle`] and the host simply keeps scheduling.

pub mod particle;

pub use particle::ShapeParticle;

use backdrop_core::params::{param_color, param_f64, param_range, param_usize};
use backdrop_core::{
    Animation, FrameOutcome, HostStyle, Hsl, LineCap, LinearGradient, Rect, Srgb, Stroke,
    Surface, Theme, Vector, Viewport, Xorshift64,
};
use serde_json::{json, Value};

/// Viewport area (px²) per shape.
const DEFAULT_AREA_PER_PARTICLE: f64 = 15_000.0;
/// Hard cap on the number of shapes.
const DEFAULT_MAX_PARTICLES: usize = 30;
/// Shape circumradius range in px.
const DEFAULT_SIZE_RANGE: (f64, f64) = (5.0, 15.0);
/// Largest per-axis drift per tick.
const DEFAULT_SPEED: f64 = 0.25;
/// Largest spin per tick, in radians.
const DEFAULT_ROTATION_SPEED: f64 = 0.01;
/// Pulse phase advance per tick, in radians.
const DEFAULT_PULSE_SPEED_RANGE: (f64, f64) = (0.01, 0.03);
/// Relative size swing of the pulse.
const DEFAULT_PULSE_AMPLITUDE: f64 = 0.2;
/// Blue-violet hue band in degrees.
const DEFAULT_HUE_RANGE: (f64, f64) = (200.0, 260.0);
const DEFAULT_OPACITY_RANGE: (f64, f64) = (0.3, 0.8);
/// Cursor influence radius in px.
const DEFAULT_CURSOR_RADIUS: f64 = 100.0;
/// Fraction of the cursor offset applied per tick; negative pushes away.
const DEFAULT_CURSOR_STRENGTH: f64 = -0.05;
/// Shapes closer than this are connected.
const DEFAULT_CONNECTION_RADIUS: f64 = 150.0;
/// Upper bound on connection lines per frame (also capped at 2 per shape).
const DEFAULT_MAX_CONNECTIONS: usize = 100;
/// Alpha of a connection between two coincident shapes.
const DEFAULT_CONNECTION_ALPHA: f64 = 0.2;
const DEFAULT_CONNECTION_WIDTH: f64 = 0.5;
/// Backdrop clock advance per drawn frame.
const DEFAULT_TIME_STEP: f64 = 0.5;

/// Hue drift rates of the two gradient stops, in degrees per clock unit.
const GRADIENT_HUE_RATES: (f64, f64) = (0.05, 0.03);
/// Hue offset of the second gradient stop.
const GRADIENT_HUE_OFFSET: f64 = 120.0;

/// Tunable constants of the geometry field.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryParams {
    pub area_per_particle: f64,
    pub max_particles: usize,
    pub size_range: (f64, f64),
    pub speed: f64,
    pub rotation_speed: f64,
    pub pulse_speed_range: (f64, f64),
    pub pulse_amplitude: f64,
    pub hue_range: (f64, f64),
    pub opacity_range: (f64, f64),
    pub cursor_radius: f64,
    pub cursor_strength: f64,
    pub connection_radius: f64,
    pub max_connections: usize,
    pub connection_alpha: f64,
    pub connection_width: f64,
    pub link_color: Srgb,
    pub time_step: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            area_per_particle: DEFAULT_AREA_PER_PARTICLE,
            max_particles: DEFAULT_MAX_PARTICLES,
            size_range: DEFAULT_SIZE_RANGE,
            speed: DEFAULT_SPEED,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            pulse_speed_range: DEFAULT_PULSE_SPEED_RANGE,
            pulse_amplitude: DEFAULT_PULSE_AMPLITUDE,
            hue_range: DEFAULT_HUE_RANGE,
            opacity_range: DEFAULT_OPACITY_RANGE,
            cursor_radius: DEFAULT_CURSOR_RADIUS,
            cursor_strength: DEFAULT_CURSOR_STRENGTH,
            connection_radius: DEFAULT_CONNECTION_RADIUS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_alpha: DEFAULT_CONNECTION_ALPHA,
            connection_width: DEFAULT_CONNECTION_WIDTH,
            link_color: default_link_color(),
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

fn default_link_color() -> Srgb {
    Srgb::from_u8(100, 150, 255)
}

impl GeometryParams {
    /// Reads overrides from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            area_per_particle: param_f64(params, "area_per_particle", DEFAULT_AREA_PER_PARTICLE),
            max_particles: param_usize(params, "max_particles", DEFAULT_MAX_PARTICLES),
            size_range: param_range(params, "size_range", DEFAULT_SIZE_RANGE),
            speed: param_f64(params, "speed", DEFAULT_SPEED),
            rotation_speed: param_f64(params, "rotation_speed", DEFAULT_ROTATION_SPEED),
            pulse_speed_range: param_range(params, "pulse_speed_range", DEFAULT_PULSE_SPEED_RANGE),
            pulse_amplitude: param_f64(params, "pulse_amplitude", DEFAULT_PULSE_AMPLITUDE),
            hue_range: param_range(params, "hue_range", DEFAULT_HUE_RANGE),
            opacity_range: param_range(params, "opacity_range", DEFAULT_OPACITY_RANGE),
            cursor_radius: param_f64(params, "cursor_radius", DEFAULT_CURSOR_RADIUS),
            cursor_strength: param_f64(params, "cursor_strength", DEFAULT_CURSOR_STRENGTH),
            connection_radius: param_f64(params, "connection_radius", DEFAULT_CONNECTION_RADIUS),
            max_connections: param_usize(params, "max_connections", DEFAULT_MAX_CONNECTIONS),
            connection_alpha: param_f64(params, "connection_alpha", DEFAULT_CONNECTION_ALPHA),
            connection_width: param_f64(params, "connection_width", DEFAULT_CONNECTION_WIDTH),
            link_color: param_color(params, "link_color", default_link_color()),
            time_step: param_f64(params, "time_step", DEFAULT_TIME_STEP),
        }
    }

    /// Number of shapes for a viewport: one per `area_per_particle` px²,
    /// capped at `max_particles`. An empty viewport has no shapes.
    pub fn population(&self, viewport: Viewport) -> usize {
        if viewport.area() <= 0.0 {
            return 0;
        }
        if self.area_per_particle <= 0.0 {
            return self.max_particles;
        }
        let by_area = (viewport.area() / self.area_per_particle).floor() as usize;
        by_area.min(self.max_particles)
    }
}

/// The fluid geometry animation.
pub struct GeometryField {
    params: GeometryParams,
    viewport: Viewport,
    theme: Theme,
    cursor: Vector,
    particles: Vec<ShapeParticle>,
    /// Backdrop clock; advances only on drawn frames.
    time: f64,
    rng: Xorshift64,
}

impl GeometryField {
    /// Creates the field and spawns its shapes. The cursor starts at the
    /// viewport center.
    pub fn new(viewport: Viewport, theme: Theme, seed: u64, params: GeometryParams) -> Self {
        let (cx, cy) = viewport.center();
        let mut field = Self {
            params,
            viewport,
            theme,
            cursor: Vector::new(cx, cy),
            particles: Vec::new(),
            time: 0.0,
            rng: Xorshift64::new(seed),
        };
        field.respawn();
        field
    }

    pub fn from_json(viewport: Viewport, theme: Theme, seed: u64, params: &Value) -> Self {
        Self::new(viewport, theme, seed, GeometryParams::from_json(params))
    }

    pub fn particles(&self) -> &[ShapeParticle] {
        &self.particles
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn cursor(&self) -> Vector {
        self.cursor
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn geometry_params(&self) -> &GeometryParams {
        &self.params
    }

    fn respawn(&mut self) {
        let count = self.params.population(self.viewport);
        let (rng, viewport, params) = (&mut self.rng, self.viewport, &self.params);
        self.particles = (0..count)
            .map(|_| ShapeParticle::spawn(rng, viewport, params))
            .collect();
        log::debug!(
            "geometry: spawned {count} shapes for {}x{}",
            self.viewport.width,
            self.viewport.height
        );
    }

    /// Gradient backdrop colors for the current clock.
    pub fn backdrop(&self) -> LinearGradient {
        let (rate_a, rate_b) = GRADIENT_HUE_RATES;
        let hue_a = (self.time * rate_a).rem_euclid(360.0);
        let hue_b = (self.time * rate_b + GRADIENT_HUE_OFFSET).rem_euclid(360.0);
        LinearGradient::new(
            Vector::ZERO,
            Vector::new(self.viewport.width, self.viewport.height),
        )
        .with_stop(0.0, Hsl::new(hue_a, 30.0, 5.0).with_alpha(1.0))
        .with_stop(1.0, Hsl::new(hue_b, 30.0, 10.0).with_alpha(1.0))
    }

    /// Joins nearby shapes with faint lines. Returns how many were drawn.
    fn draw_connections(&self, surface: &mut dyn Surface) -> usize {
        let limit = (self.particles.len() * 2).min(self.params.max_connections);
        let radius = self.params.connection_radius;
        let mut drawn = 0;

        'outer: for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                if drawn >= limit {
                    break 'outer;
                }
                let distance = a.position.dist(b.position);
                if distance < radius {
                    let color = self
                        .params
                        .link_color
                        .with_alpha(self.params.connection_alpha)
                        .fade(1.0 - distance / radius);
                    surface.stroke_line(Stroke {
                        from: a.position,
                        to: b.position,
                        width: self.params.connection_width,
                        color,
                        cap: LineCap::Butt,
                    });
                    drawn += 1;
                }
            }
        }
        drawn
    }
}

impl Animation for GeometryField {
    fn name(&self) -> &'static str {
        "geometry"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.respawn();
    }

    fn set_pointer(&mut self, x: f64, y: f64) {
        self.cursor = Vector::new(x, y);
    }

    fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            log::debug!("geometry: theme {} -> {}", self.theme, theme);
            self.theme = theme;
        }
    }

    fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
        if !self.theme.is_dark() {
            return FrameOutcome::Idle;
        }

        surface.clear();
        let area = Rect::sized(self.viewport.width, self.viewport.height);
        surface.fill_gradient(area, &self.backdrop());

        let (viewport, cursor) = (self.viewport, self.cursor);
        for particle in &mut self.particles {
            particle.update(viewport, cursor, &self.params);
            particle.draw(surface, &self.params);
        }

        self.draw_connections(surface);
        self.time += self.params.time_step;
        FrameOutcome::Drawn
    }

    fn host_style(&self) -> HostStyle {
        HostStyle {
            opacity: 0.7,
            transparent: false,
        }
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "area_per_particle": p.area_per_particle,
            "max_particles": p.max_particles,
            "size_range": [p.size_range.0, p.size_range.1],
            "speed": p.speed,
            "rotation_speed": p.rotation_speed,
            "pulse_speed_range": [p.pulse_speed_range.0, p.pulse_speed_range.1],
            "pulse_amplitude": p.pulse_amplitude,
            "hue_range": [p.hue_range.0, p.hue_range.1],
            "opacity_range": [p.opacity_range.0, p.opacity_range.1],
            "cursor_radius": p.cursor_radius,
            "cursor_strength": p.cursor_strength,
            "connection_radius": p.connection_radius,
            "max_connections": p.max_connections,
            "connection_alpha": p.connection_alpha,
            "connection_width": p.connection_width,
            "link_color": p.link_color.to_hex(),
            "time_step": p.time_step,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "area_per_particle": {
                "type": "number", "default": DEFAULT_AREA_PER_PARTICLE, "min": 1.0,
                "description": "Viewport area in px² per shape"
            },
            "max_particles": {
                "type": "integer", "default": DEFAULT_MAX_PARTICLES, "min": 0,
                "description": "Upper bound on the number of shapes"
            },
            "size_range": {
                "type": "range", "default": [DEFAULT_SIZE_RANGE.0, DEFAULT_SIZE_RANGE.1],
                "description": "Shape circumradius range in px"
            },
            "speed": {
                "type": "number", "default": DEFAULT_SPEED, "min": 0.0, "max": 5.0,
                "description": "Largest per-axis drift per tick"
            },
            "rotation_speed": {
                "type": "number", "default": DEFAULT_ROTATION_SPEED, "min": 0.0, "max": 0.5,
                "description": "Largest spin per tick in radians"
            },
            "pulse_speed_range": {
                "type": "range", "default": [DEFAULT_PULSE_SPEED_RANGE.0, DEFAULT_PULSE_SPEED_RANGE.1],
                "description": "Pulse phase advance per tick in radians"
            },
            "pulse_amplitude": {
                "type": "number", "default": DEFAULT_PULSE_AMPLITUDE, "min": 0.0, "max": 1.0,
                "description": "Relative size swing of the pulse"
            },
            "hue_range": {
                "type": "range", "default": [DEFAULT_HUE_RANGE.0, DEFAULT_HUE_RANGE.1],
                "description": "Shape hue band in degrees"
            },
            "opacity_range": {
                "type": "range", "default": [DEFAULT_OPACITY_RANGE.0, DEFAULT_OPACITY_RANGE.1],
                "description": "Shape fill opacity range"
            },
            "cursor_radius": {
                "type": "number", "default": DEFAULT_CURSOR_RADIUS, "min": 0.0,
                "description": "Cursor influence radius in px"
            },
            "cursor_strength": {
                "type": "number", "default": DEFAULT_CURSOR_STRENGTH, "min": -1.0, "max": 1.0,
                "description": "Fraction of the cursor offset applied per tick; negative repels"
            },
            "connection_radius": {
                "type": "number", "default": DEFAULT_CONNECTION_RADIUS, "min": 0.0,
                "description": "Shapes closer than this are connected"
            },
            "max_connections": {
                "type": "integer", "default": DEFAULT_MAX_CONNECTIONS, "min": 0,
                "description": "Upper bound on connection lines per frame"
            },
            "connection_alpha": {
                "type": "number", "default": DEFAULT_CONNECTION_ALPHA, "min": 0.0, "max": 1.0,
                "description": "Alpha of the strongest connection"
            },
            "connection_width": {
                "type": "number", "default": DEFAULT_CONNECTION_WIDTH, "min": 0.0,
                "description": "Connection line width in px"
            },
            "link_color": {
                "type": "color", "default": default_link_color().to_hex(),
                "description": "Connection line color"
            },
            "time_step": {
                "type": "number", "default": DEFAULT_TIME_STEP, "min": 0.0,
                "description": "Backdrop clock advance per drawn frame"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::surface::DrawCommand;
    use backdrop_core::Recorder;

    fn field(width: f64, height: f64, theme: Theme, seed: u64) -> GeometryField {
        GeometryField::new(
            Viewport::new(width, height),
            theme,
            seed,
            GeometryParams::default(),
        )
    }

    fn shape_at(x: f64, y: f64) -> ShapeParticle {
        ShapeParticle {
            position: Vector::new(x, y),
            velocity: Vector::ZERO,
            size: 8.0,
            sides: 3,
            rotation: 0.0,
            rotation_speed: 0.0,
            pulse_phase: 0.0,
            pulse_speed: 0.0,
            color: Hsl::new(230.0, 70.0, 60.0),
            opacity: 0.6,
        }
    }

    // ---- Population ----

    #[test]
    fn population_scales_with_area_and_caps() {
        let p = GeometryParams::default();
        assert_eq!(p.population(Viewport::new(300.0, 300.0)), 6);
        assert_eq!(p.population(Viewport::new(800.0, 600.0)), 30);
        assert_eq!(p.population(Viewport::new(3840.0, 2160.0)), 30);
    }

    #[test]
    fn zero_viewport_yields_empty_field() {
        let mut f = field(0.0, 0.0, Theme::Dark, 1);
        assert!(f.particles().is_empty());
        let mut rec = Recorder::new();
        assert_eq!(f.frame(&mut rec), FrameOutcome::Drawn);
        assert_eq!(rec.count("fill_polygon"), 0);
        assert_eq!(rec.count("stroke_line"), 0);
    }

    #[test]
    fn zero_viewport_stays_empty_without_area_limit() {
        let f = GeometryField::from_json(
            Viewport::new(0.0, 0.0),
            Theme::Dark,
            1,
            &json!({"area_per_particle": 0}),
        );
        assert!(f.particles().is_empty());
        let unlimited = GeometryParams {
            area_per_particle: 0.0,
            ..GeometryParams::default()
        };
        assert_eq!(unlimited.population(Viewport::new(640.0, 0.0)), 0);
        assert_eq!(unlimited.population(Viewport::new(100.0, 100.0)), 30);
    }

    #[test]
    fn resize_rebuilds_population() {
        let mut f = field(300.0, 300.0, Theme::Dark, 1);
        assert_eq!(f.particles().len(), 6);
        f.resize(Viewport::new(1200.0, 900.0));
        assert_eq!(f.particles().len(), 30);
        assert!(f
            .particles()
            .iter()
            .all(|p| p.position.x <= 1200.0 && p.position.y <= 900.0));
    }

    // ---- Theme gating ----

    #[test]
    fn light_theme_idles_without_drawing_or_moving() {
        let mut f = field(800.0, 600.0, Theme::Light, 5);
        let before = f.particles().to_vec();
        let mut rec = Recorder::new();
        for _ in 0..5 {
            assert_eq!(f.frame(&mut rec), FrameOutcome::Idle);
        }
        assert!(rec.is_empty());
        assert_eq!(f.particles(), &before[..]);
        assert_eq!(f.time(), 0.0);
    }

    #[test]
    fn switching_to_dark_starts_drawing() {
        let mut f = field(800.0, 600.0, Theme::Light, 5);
        let mut rec = Recorder::new();
        assert_eq!(f.frame(&mut rec), FrameOutcome::Idle);
        f.set_theme(Theme::Dark);
        assert_eq!(f.frame(&mut rec), FrameOutcome::Drawn);
        assert!(!rec.is_empty());
    }

    // ---- Frame composition ----

    #[test]
    fn dark_frame_clears_then_paints_backdrop_then_shapes() {
        let mut f = field(800.0, 600.0, Theme::Dark, 11);
        let mut rec = Recorder::new();
        f.frame(&mut rec);
        let cmds = rec.commands();
        assert_eq!(cmds[0], DrawCommand::Clear);
        assert!(matches!(cmds[1], DrawCommand::FillGradient { .. }));
        assert_eq!(rec.count("fill_polygon"), 30);
        assert!(rec.count("stroke_line") <= 60);
        assert!(cmds[2..32]
            .iter()
            .all(|c| matches!(c, DrawCommand::FillPolygon { .. })));
    }

    #[test]
    fn clock_advances_half_a_unit_per_drawn_frame() {
        let mut f = field(400.0, 400.0, Theme::Dark, 2);
        let mut rec = Recorder::new();
        for _ in 0..4 {
            f.frame(&mut rec);
        }
        assert_eq!(f.time(), 2.0);
    }

    #[test]
    fn backdrop_hues_drift_with_clock() {
        let mut f = field(400.0, 400.0, Theme::Dark, 2);
        f.time = 1000.0;
        let g = f.backdrop();
        let start = Hsl::new(50.0, 30.0, 5.0).with_alpha(1.0);
        let end = Hsl::new(150.0, 30.0, 10.0).with_alpha(1.0);
        assert_eq!(g.stops[0].color, start);
        assert_eq!(g.stops[1].color, end);
        assert_eq!(g.end, Vector::new(400.0, 400.0));
    }

    // ---- Connections ----

    #[test]
    fn connection_alpha_fades_with_distance() {
        let mut f = field(400.0, 400.0, Theme::Dark, 2);
        f.particles = vec![shape_at(100.0, 100.0), shape_at(175.0, 100.0)];
        f.cursor = Vector::new(-1000.0, -1000.0);
        let mut rec = Recorder::new();
        f.frame(&mut rec);
        let strokes: Vec<_> = rec.strokes().collect();
        assert_eq!(strokes.len(), 1);
        assert!((strokes[0].color.a - 0.1).abs() < 1e-9);
        assert_eq!(strokes[0].width, 0.5);
        assert_eq!(strokes[0].cap, LineCap::Butt);
    }

    #[test]
    fn distant_shapes_are_not_connected() {
        let mut f = field(400.0, 400.0, Theme::Dark, 2);
        f.particles = vec![shape_at(10.0, 10.0), shape_at(390.0, 390.0)];
        let mut rec = Recorder::new();
        f.frame(&mut rec);
        assert_eq!(rec.count("stroke_line"), 0);
    }

    #[test]
    fn connections_capped_at_twice_the_population() {
        let mut f = field(400.0, 400.0, Theme::Dark, 2);
        f.particles = (0..10).map(|i| shape_at(200.0 + i as f64, 200.0)).collect();
        f.cursor = Vector::new(-1000.0, -1000.0);
        let mut rec = Recorder::new();
        f.frame(&mut rec);
        // 45 close pairs, capped at 2 * 10
        assert_eq!(rec.count("stroke_line"), 20);
    }

    #[test]
    fn connections_capped_by_max_connections() {
        let params = GeometryParams {
            max_connections: 7,
            ..GeometryParams::default()
        };
        let mut f = GeometryField::new(Viewport::new(400.0, 400.0), Theme::Dark, 2, params);
        f.particles = (0..10).map(|i| shape_at(200.0 + i as f64, 200.0)).collect();
        let mut rec = Recorder::new();
        f.frame(&mut rec);
        assert_eq!(rec.count("stroke_line"), 7);
    }

    // ---- Pointer ----

    #[test]
    fn cursor_starts_centered_and_follows_pointer() {
        let mut f = field(800.0, 600.0, Theme::Dark, 2);
        assert_eq!(f.cursor(), Vector::new(400.0, 300.0));
        f.set_pointer(12.0, 34.0);
        assert_eq!(f.cursor(), Vector::new(12.0, 34.0));
    }

    // ---- Params ----

    #[test]
    fn from_json_uses_defaults_for_empty_object() {
        let f = GeometryField::from_json(Viewport::new(100.0, 100.0), Theme::Dark, 1, &json!({}));
        assert_eq!(f.geometry_params(), &GeometryParams::default());
    }

    #[test]
    fn from_json_reads_overrides() {
        let f = GeometryField::from_json(
            Viewport::new(100.0, 100.0),
            Theme::Dark,
            1,
            &json!({
                "max_particles": 3,
                "area_per_particle": 100.0,
                "hue_range": [10, 20],
                "link_color": "#ff0000",
                "cursor_strength": 0.05
            }),
        );
        assert_eq!(f.particles().len(), 3);
        assert!(f
            .particles()
            .iter()
            .all(|p| (10.0..20.0).contains(&p.color.h)));
        let p = f.params();
        assert_eq!(p["link_color"], "#ff0000");
        assert_eq!(p["cursor_strength"], 0.05);
    }

    #[test]
    fn param_schema_describes_every_param() {
        let f = field(100.0, 100.0, Theme::Dark, 1);
        let params = f.params();
        let schema = f.param_schema();
        for key in params.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
            assert!(schema[key].get("default").is_some(), "{key} missing default");
            assert!(schema[key].get("description").is_some(), "{key} missing description");
        }
    }

    // ---- Determinism ----

    #[test]
    fn same_seed_paints_identical_frames() {
        let mut a = field(640.0, 480.0, Theme::Dark, 99);
        let mut b = field(640.0, 480.0, Theme::Dark, 99);
        let (mut ra, mut rb) = (Recorder::new(), Recorder::new());
        for _ in 0..20 {
            a.frame(&mut ra);
            b.frame(&mut rb);
        }
        assert_eq!(ra.commands(), rb.commands());
    }

    #[test]
    fn different_seeds_diverge() {
        let a = field(640.0, 480.0, Theme::Dark, 1);
        let b = field(640.0, 480.0, Theme::Dark, 2);
        assert_ne!(a.particles(), b.particles());
    }

    #[test]
    fn host_style_is_opaque_at_seventy_percent() {
        let f = field(10.0, 10.0, Theme::Dark, 1);
        assert_eq!(
            f.host_style(),
            HostStyle {
                opacity: 0.7,
                transparent: false
            }
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn shapes_never_escape_far_from_viewport(seed: u64, frames in 1usize..200) {
                let mut f = field(320.0, 240.0, Theme::Dark, seed);
                let mut rec = Recorder::new();
                for _ in 0..frames {
                    f.frame(&mut rec);
                    rec.reset();
                }
                for p in f.particles() {
                    prop_assert!(p.position.x > -10.0 && p.position.x < 330.0, "x = {}", p.position.x);
                    prop_assert!(p.position.y > -10.0 && p.position.y < 250.0, "y = {}", p.position.y);
                }
            }
        }
    }
}
