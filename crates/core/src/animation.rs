//! The `Animation` trait every background implements, plus the small value
//! types hosts feed into it.
//!
//! The trait is object-safe so hosts can hold a `Box<dyn Animation>` and
//! switch backgrounds at runtime.

use crate::error::BackdropError;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Light or dark page theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Reads the root element's `data-theme` attribute: only `"dark"` is
    /// dark, anything else (including a missing attribute) is light.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(BackdropError::InvalidTheme(s.to_string())),
        }
    }
}

/// Viewport size in CSS pixels.
///
/// Zero and even negative sizes are representable; animations treat them as
/// an empty scene rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Area, with non-positive or non-finite sides counted as zero.
    pub fn area(&self) -> f64 {
        let w = if self.width.is_finite() { self.width.max(0.0) } else { 0.0 };
        let h = if self.height.is_finite() { self.height.max(0.0) } else { 0.0 };
        w * h
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// What a call to [`Animation::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was updated and painted.
    Drawn,
    /// Nothing was updated or painted; the host should still schedule the
    /// next frame.
    Idle,
}

/// How the host should style the canvas element it attaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostStyle {
    /// CSS opacity of the canvas element.
    pub opacity: f64,
    /// Whether the 2D context keeps an alpha channel.
    pub transparent: bool,
}

/// A self-contained background animation.
///
/// Hosts call [`resize`](Animation::resize), [`set_pointer`](Animation::set_pointer)
/// and [`set_theme`](Animation::set_theme) between frames as the page
/// changes, and [`frame`](Animation::frame) once per display refresh.
pub trait Animation {
    /// Short registry name, e.g. `"geometry"`.
    fn name(&self) -> &'static str;

    /// Adapts to a new viewport. Particle sets are rebuilt for the new size.
    fn resize(&mut self, viewport: Viewport);

    /// Latest sampled cursor position in viewport coordinates.
    fn set_pointer(&mut self, x: f64, y: f64);

    /// Applies a theme. Calling it with the current theme is a no-op.
    fn set_theme(&mut self, theme: Theme);

    /// Advances one tick and paints it.
    fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome;

    fn host_style(&self) -> HostStyle;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every parameter: type, default, range, description.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;
    use serde_json::json;

    struct Blink {
        theme: Theme,
        frames: usize,
    }

    impl Animation for Blink {
        fn name(&self) -> &'static str {
            "blink"
        }

        fn resize(&mut self, _viewport: Viewport) {}

        fn set_pointer(&mut self, _x: f64, _y: f64) {}

        fn set_theme(&mut self, theme: Theme) {
            self.theme = theme;
        }

        fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
            if !self.theme.is_dark() {
                return FrameOutcome::Idle;
            }
            self.frames += 1;
            surface.clear();
            FrameOutcome::Drawn
        }

        fn host_style(&self) -> HostStyle {
            HostStyle {
                opacity: 1.0,
                transparent: true,
            }
        }

        fn params(&self) -> Value {
            json!({ "frames": self.frames })
        }

        fn param_schema(&self) -> Value {
            json!({ "frames": { "type": "integer", "default": 0 } })
        }
    }

    #[test]
    fn animation_trait_is_object_safe() {
        let mut anim: Box<dyn Animation> = Box::new(Blink {
            theme: Theme::Dark,
            frames: 0,
        });
        let mut rec = Recorder::new();
        assert_eq!(anim.frame(&mut rec), FrameOutcome::Drawn);
        assert_eq!(anim.params()["frames"], 1);
        assert_eq!(anim.name(), "blink");
    }

    #[test]
    fn theme_from_attribute() {
        assert_eq!(Theme::from_attribute(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_attribute(Some("light")), Theme::Light);
        assert_eq!(Theme::from_attribute(Some("Dark")), Theme::Light);
        assert_eq!(Theme::from_attribute(None), Theme::Light);
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!(matches!(
            "sepia".parse::<Theme>(),
            Err(BackdropError::InvalidTheme(_))
        ));
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn theme_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Theme::Dark).unwrap(), json!("dark"));
    }

    #[test]
    fn viewport_area_ignores_degenerate_sides() {
        assert_eq!(Viewport::new(800.0, 600.0).area(), 480_000.0);
        assert_eq!(Viewport::new(0.0, 600.0).area(), 0.0);
        assert_eq!(Viewport::new(-5.0, 600.0).area(), 0.0);
        assert_eq!(Viewport::new(f64::NAN, 600.0).area(), 0.0);
    }

    #[test]
    fn viewport_contains_is_inclusive() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(vp.contains(0.0, 0.0));
        assert!(vp.contains(800.0, 600.0));
        assert!(!vp.contains(800.1, 10.0));
        assert!(!vp.contains(10.0, -0.1));
        assert_eq!(vp.center(), (400.0, 300.0));
    }
}
