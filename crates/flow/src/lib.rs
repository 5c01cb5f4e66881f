#![deny(unsafe_code)]
//! Perlin flow-field background.
//!
//! A coarse grid of unit vectors is sampled from 3D gradient noise and
//! resampled every few frames one step further along the noise time axis.
//! Particles steer along the grid (and toward the cursor), and each frame is
//! washed with a translucent fill so their segments fade into trails.
//!
//! Unlike the geometry field this animation runs in both themes; switching
//! theme resets every particle so it picks up the new palette.

pub mod field;
pub mod particle;

pub use field::FlowField;
pub use particle::TrailParticle;

use backdrop_core::params::{param_color, param_f64, param_range, param_usize};
use backdrop_core::{
    Animation, Cadence, FrameOutcome, HostStyle, Rect, Srgb, Surface, Theme, Vector, Viewport,
    Xorshift64,
};
use serde_json::{json, Value};

/// Grid cell size in px.
const DEFAULT_SCALE: f64 = 30.0;
/// Viewport area (px²) per particle.
const DEFAULT_AREA_PER_PARTICLE: f64 = 20_000.0;
const DEFAULT_MAX_SPEED: f64 = 2.0;
/// Initial speed range after a reset.
const DEFAULT_SPEED_RANGE: (f64, f64) = (0.5, 1.0);
/// Stroke width range at full life.
const DEFAULT_SIZE_RANGE: (f64, f64) = (0.5, 2.0);
/// Life lost per tick.
const DEFAULT_DECAY_RANGE: (f64, f64) = (0.002, 0.007);
const DEFAULT_CURSOR_RADIUS: f64 = 100.0;
/// Fraction of the cursor offset added to the flow force.
const DEFAULT_CURSOR_STRENGTH: f64 = 0.02;
/// Fraction of the remaining turn applied per tick.
const DEFAULT_HEADING_EASE: f64 = 0.3;
/// Fraction of the remaining speed change applied per tick.
const DEFAULT_SPEED_EASE: f64 = 0.1;
/// Target speed per unit of force.
const DEFAULT_FORCE_GAIN: f64 = 5.0;
/// Frames between grid resamples in dark mode.
const DEFAULT_DARK_CADENCE: usize = 15;
/// Frames between grid resamples in light mode.
const DEFAULT_LIGHT_CADENCE: usize = 20;
const DEFAULT_DARK_HUE_RANGE: (f64, f64) = (180.0, 240.0);
const DEFAULT_LIGHT_HUE_RANGE: (f64, f64) = (20.0, 80.0);
/// Alpha of the per-frame wash; lower values give longer trails.
const DEFAULT_WASH_ALPHA: f64 = 0.1;

fn default_dark_wash() -> Srgb {
    Srgb::from_u8(10, 10, 10)
}

fn default_light_wash() -> Srgb {
    Srgb::from_u8(245, 245, 245)
}

/// Tunable constants of the flow field.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowParams {
    pub scale: f64,
    pub area_per_particle: f64,
    pub max_speed: f64,
    pub speed_range: (f64, f64),
    pub size_range: (f64, f64),
    pub decay_range: (f64, f64),
    pub cursor_radius: f64,
    pub cursor_strength: f64,
    pub heading_ease: f64,
    pub speed_ease: f64,
    pub force_gain: f64,
    pub dark_cadence: usize,
    pub light_cadence: usize,
    pub dark_hue_range: (f64, f64),
    pub light_hue_range: (f64, f64),
    pub dark_wash: Srgb,
    pub light_wash: Srgb,
    pub wash_alpha: f64,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            area_per_particle: DEFAULT_AREA_PER_PARTICLE,
            max_speed: DEFAULT_MAX_SPEED,
            speed_range: DEFAULT_SPEED_RANGE,
            size_range: DEFAULT_SIZE_RANGE,
            decay_range: DEFAULT_DECAY_RANGE,
            cursor_radius: DEFAULT_CURSOR_RADIUS,
            cursor_strength: DEFAULT_CURSOR_STRENGTH,
            heading_ease: DEFAULT_HEADING_EASE,
            speed_ease: DEFAULT_SPEED_EASE,
            force_gain: DEFAULT_FORCE_GAIN,
            dark_cadence: DEFAULT_DARK_CADENCE,
            light_cadence: DEFAULT_LIGHT_CADENCE,
            dark_hue_range: DEFAULT_DARK_HUE_RANGE,
            light_hue_range: DEFAULT_LIGHT_HUE_RANGE,
            dark_wash: default_dark_wash(),
            light_wash: default_light_wash(),
            wash_alpha: DEFAULT_WASH_ALPHA,
        }
    }
}

impl FlowParams {
    pub fn from_json(params: &Value) -> Self {
        Self {
            scale: param_f64(params, "scale", DEFAULT_SCALE),
            area_per_particle: param_f64(params, "area_per_particle", DEFAULT_AREA_PER_PARTICLE),
            max_speed: param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
            speed_range: param_range(params, "speed_range", DEFAULT_SPEED_RANGE),
            size_range: param_range(params, "size_range", DEFAULT_SIZE_RANGE),
            decay_range: param_range(params, "decay_range", DEFAULT_DECAY_RANGE),
            cursor_radius: param_f64(params, "cursor_radius", DEFAULT_CURSOR_RADIUS),
            cursor_strength: param_f64(params, "cursor_strength", DEFAULT_CURSOR_STRENGTH),
            heading_ease: param_f64(params, "heading_ease", DEFAULT_HEADING_EASE),
            speed_ease: param_f64(params, "speed_ease", DEFAULT_SPEED_EASE),
            force_gain: param_f64(params, "force_gain", DEFAULT_FORCE_GAIN),
            dark_cadence: param_usize(params, "dark_cadence", DEFAULT_DARK_CADENCE),
            light_cadence: param_usize(params, "light_cadence", DEFAULT_LIGHT_CADENCE),
            dark_hue_range: param_range(params, "dark_hue_range", DEFAULT_DARK_HUE_RANGE),
            light_hue_range: param_range(params, "light_hue_range", DEFAULT_LIGHT_HUE_RANGE),
            dark_wash: param_color(params, "dark_wash", default_dark_wash()),
            light_wash: param_color(params, "light_wash", default_light_wash()),
            wash_alpha: param_f64(params, "wash_alpha", DEFAULT_WASH_ALPHA),
        }
    }

    /// One particle per `area_per_particle` px².
    pub fn population(&self, viewport: Viewport) -> usize {
        if self.area_per_particle <= 0.0 {
            return 0;
        }
        (viewport.area() / self.area_per_particle).floor() as usize
    }

    /// Grid resample cadence for a theme.
    pub fn cadence(&self, theme: Theme) -> Cadence {
        let frames = if theme.is_dark() {
            self.dark_cadence
        } else {
            self.light_cadence
        };
        Cadence::every(frames as u64)
    }
}

/// The flow-field trails animation.
pub struct FlowTrails {
    params: FlowParams,
    viewport: Viewport,
    theme: Theme,
    cursor: Vector,
    field: FlowField,
    particles: Vec<TrailParticle>,
    /// Frames drawn so far; drives the grid cadence.
    frame_count: u64,
    rng: Xorshift64,
}

impl FlowTrails {
    /// Creates the grid and particles. The cursor starts at the viewport
    /// center.
    pub fn new(viewport: Viewport, theme: Theme, seed: u64, params: FlowParams) -> Self {
        let (cx, cy) = viewport.center();
        let field = FlowField::new(viewport.width, viewport.height, params.scale);
        let mut trails = Self {
            params,
            viewport,
            theme,
            cursor: Vector::new(cx, cy),
            field,
            particles: Vec::new(),
            frame_count: 0,
            rng: Xorshift64::new(seed),
        };
        trails.respawn();
        trails
    }

    pub fn from_json(viewport: Viewport, theme: Theme, seed: u64, params: &Value) -> Self {
        Self::new(viewport, theme, seed, FlowParams::from_json(params))
    }

    pub fn particles(&self) -> &[TrailParticle] {
        &self.particles
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn cursor(&self) -> Vector {
        self.cursor
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn flow_params(&self) -> &FlowParams {
        &self.params
    }

    fn respawn(&mut self) {
        let count = self.params.population(self.viewport);
        let (rng, viewport, theme, params) =
            (&mut self.rng, self.viewport, self.theme, &self.params);
        self.particles = (0..count)
            .map(|_| TrailParticle::spawn(rng, viewport, theme, params))
            .collect();
        log::debug!(
            "flow: spawned {count} particles for {}x{}",
            self.viewport.width,
            self.viewport.height
        );
    }

    /// Translucent fill that fades previous frames into trails.
    fn wash(&self, surface: &mut dyn Surface) {
        let base = if self.theme.is_dark() {
            self.params.dark_wash
        } else {
            self.params.light_wash
        };
        surface.fill_rect(
            Rect::sized(self.viewport.width, self.viewport.height),
            base.with_alpha(self.params.wash_alpha),
        );
    }
}

impl Animation for FlowTrails {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.field = FlowField::new(viewport.width, viewport.height, self.params.scale);
        self.respawn();
    }

    fn set_pointer(&mut self, x: f64, y: f64) {
        self.cursor = Vector::new(x, y);
    }

    fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        log::debug!("flow: theme {} -> {}, resetting particles", self.theme, theme);
        self.theme = theme;
        let (rng, viewport, params) = (&mut self.rng, self.viewport, &self.params);
        for particle in &mut self.particles {
            particle.reset(rng, viewport, theme, params);
        }
    }

    fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
        self.wash(surface);

        if self.params.cadence(self.theme).is_due(self.frame_count) {
            self.field.update();
        }

        let (field, rng, params) = (&self.field, &mut self.rng, &self.params);
        let (cursor, viewport, theme) = (self.cursor, self.viewport, self.theme);
        for particle in &mut self.particles {
            particle.update(field, cursor, viewport, theme, params, rng);
            particle.draw(surface);
        }

        self.frame_count += 1;
        FrameOutcome::Drawn
    }

    fn host_style(&self) -> HostStyle {
        HostStyle {
            opacity: 0.8,
            transparent: true,
        }
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "scale": p.scale,
            "area_per_particle": p.area_per_particle,
            "max_speed": p.max_speed,
            "speed_range": [p.speed_range.0, p.speed_range.1],
            "size_range": [p.size_range.0, p.size_range.1],
            "decay_range": [p.decay_range.0, p.decay_range.1],
            "cursor_radius": p.cursor_radius,
            "cursor_strength": p.cursor_strength,
            "heading_ease": p.heading_ease,
            "speed_ease": p.speed_ease,
            "force_gain": p.force_gain,
            "dark_cadence": p.dark_cadence,
            "light_cadence": p.light_cadence,
            "dark_hue_range": [p.dark_hue_range.0, p.dark_hue_range.1],
            "light_hue_range": [p.light_hue_range.0, p.light_hue_range.1],
            "dark_wash": p.dark_wash.to_hex(),
            "light_wash": p.light_wash.to_hex(),
            "wash_alpha": p.wash_alpha,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "scale": {
                "type": "number", "default": DEFAULT_SCALE, "min": 1.0,
                "description": "Flow grid cell size in px"
            },
            "area_per_particle": {
                "type": "number", "default": DEFAULT_AREA_PER_PARTICLE, "min": 1.0,
                "description": "Viewport area in px² per particle"
            },
            "max_speed": {
                "type": "number", "default": DEFAULT_MAX_SPEED, "min": 0.0,
                "description": "Speed cap in px per tick"
            },
            "speed_range": {
                "type": "range", "default": [DEFAULT_SPEED_RANGE.0, DEFAULT_SPEED_RANGE.1],
                "description": "Initial speed range after a reset"
            },
            "size_range": {
                "type": "range", "default": [DEFAULT_SIZE_RANGE.0, DEFAULT_SIZE_RANGE.1],
                "description": "Stroke width range at full life"
            },
            "decay_range": {
                "type": "range", "default": [DEFAULT_DECAY_RANGE.0, DEFAULT_DECAY_RANGE.1],
                "description": "Life lost per tick"
            },
            "cursor_radius": {
                "type": "number", "default": DEFAULT_CURSOR_RADIUS, "min": 0.0,
                "description": "Cursor influence radius in px"
            },
            "cursor_strength": {
                "type": "number", "default": DEFAULT_CURSOR_STRENGTH, "min": -1.0, "max": 1.0,
                "description": "Fraction of the cursor offset added to the flow force"
            },
            "heading_ease": {
                "type": "number", "default": DEFAULT_HEADING_EASE, "min": 0.0, "max": 1.0,
                "description": "Fraction of the remaining turn applied per tick"
            },
            "speed_ease": {
                "type": "number", "default": DEFAULT_SPEED_EASE, "min": 0.0, "max": 1.0,
                "description": "Fraction of the remaining speed change applied per tick"
            },
            "force_gain": {
                "type": "number", "default": DEFAULT_FORCE_GAIN, "min": 0.0,
                "description": "Target speed per unit of force"
            },
            "dark_cadence": {
                "type": "integer", "default": DEFAULT_DARK_CADENCE, "min": 1,
                "description": "Frames between grid resamples in dark mode"
            },
            "light_cadence": {
                "type": "integer", "default": DEFAULT_LIGHT_CADENCE, "min": 1,
                "description": "Frames between grid resamples in light mode"
            },
            "dark_hue_range": {
                "type": "range", "default": [DEFAULT_DARK_HUE_RANGE.0, DEFAULT_DARK_HUE_RANGE.1],
                "description": "Particle hue band in dark mode"
            },
            "light_hue_range": {
                "type": "range", "default": [DEFAULT_LIGHT_HUE_RANGE.0, DEFAULT_LIGHT_HUE_RANGE.1],
                "description": "Particle hue band in light mode"
            },
            "dark_wash": {
                "type": "color", "default": default_dark_wash().to_hex(),
                "description": "Wash color in dark mode"
            },
            "light_wash": {
                "type": "color", "default": default_light_wash().to_hex(),
                "description": "Wash color in light mode"
            },
            "wash_alpha": {
                "type": "number", "default": DEFAULT_WASH_ALPHA, "min": 0.0, "max": 1.0,
                "description": "Alpha of the per-frame wash; lower values give longer trails"
            }
        })
    }
}
