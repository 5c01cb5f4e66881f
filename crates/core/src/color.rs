//! Color types for backdrop.
//!
//! Particles pick their colors in HSL (a hue band plus fixed saturation and
//! lightness), surfaces consume [`Rgba`]. [`Srgb`] sits in between and
//! round-trips through `#rrggbb` hex for configuration.

use crate::error::BackdropError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// HSL color: hue in degrees, saturation and lightness in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// sRGB color with straight (non-premultiplied) alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Srgb {
    /// Builds a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parses `"#rrggbb"` or `"rrggbb"` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, BackdropError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(BackdropError::InvalidConfig(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| BackdropError::InvalidConfig(format!("invalid hex color: {e}")))
        };
        Ok(Srgb::from_u8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats as `"#rrggbb"`, clamping and rounding each channel.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Channels quantized to 8 bits.
    pub fn to_u8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: a.clamp(0.0, 1.0),
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Hsl {
    /// Builds a color from CSS-style arguments: hue in degrees, saturation
    /// and lightness in percent.
    pub fn new(h: f64, s_percent: f64, l_percent: f64) -> Self {
        Self {
            h,
            s: (s_percent / 100.0).clamp(0.0, 1.0),
            l: (l_percent / 100.0).clamp(0.0, 1.0),
        }
    }

    pub fn to_srgb(self) -> Srgb {
        hsl_to_srgb(self)
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        self.to_srgb().with_alpha(a)
    }
}

impl Rgba {
    pub fn from_u8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Srgb::from_u8(r, g, b).with_alpha(a)
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn fade(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn rgb(self) -> Srgb {
        Srgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// CSS `rgba(r, g, b, a)` string for canvas fill and stroke styles.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.rgb().to_u8();
        let a = (self.a.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        format!("rgba({r}, {g}, {b}, {a})")
    }
}

/// Converts HSL to sRGB. Hue wraps, so any real number is accepted.
pub fn hsl_to_srgb(c: Hsl) -> Srgb {
    let h = c.h.rem_euclid(360.0) / 360.0;
    let s = c.s.clamp(0.0, 1.0);
    let l = c.l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Srgb { r: l, g: l, b: l };
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Srgb {
        r: hue_to_channel(p, q, h + 1.0 / 3.0),
        g: hue_to_channel(p, q, h),
        b: hue_to_channel(p, q, h - 1.0 / 3.0),
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
