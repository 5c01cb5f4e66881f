//! Drawing surfaces.
//!
//! An [`Animation`](crate::Animation) paints each frame through the
//! [`Surface`] trait. Hosts supply the implementation: the browser wraps a
//! 2D canvas context, the CLI paints into a tiny-skia pixmap, and tests use
//! the [`Recorder`] to inspect exactly what was drawn.

use crate::color::Rgba;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// A color stop: `offset` in [0, 1] along the gradient axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Linear gradient from `start` to `end`, colored by `stops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: Vector,
    pub end: Vector,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Vector, end: Vector) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f64, color: Rgba) -> Self {
        self.stops.push(ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        });
        self
    }

    /// Color at parameter `t` along the axis, clamped to the end stops.
    ///
    /// Assumes stops were added in increasing offset order. A gradient
    /// without stops is fully transparent.
    pub fn color_at(&self, t: f64) -> Rgba {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Rgba::from_u8(0, 0, 0, 0.0),
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        self.stops
            .windows(2)
            .find(|pair| t <= pair[1].offset)
            .map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                let span = b.offset - a.offset;
                let f = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                Rgba {
                    r: a.color.r + (b.color.r - a.color.r) * f,
                    g: a.color.g + (b.color.g - a.color.g) * f,
                    b: a.color.b + (b.color.b - a.color.b) * f,
                    a: a.color.a + (b.color.a - a.color.a) * f,
                }
            })
            .unwrap_or(last.color)
    }
}

/// How the ends of a stroked line are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

impl LineCap {
    /// Canvas `lineCap` keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
        }
    }
}

/// A stroked line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub from: Vector,
    pub to: Vector,
    pub width: f64,
    pub color: Rgba,
    pub cap: LineCap,
}

/// Sink for the drawing operations an animation issues each frame.
///
/// All colors carry their own alpha; there is no global alpha state.
pub trait Surface {
    /// Resets every pixel to the surface's blank state.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Fills `rect` with a linear gradient.
    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient);

    /// Fills a closed polygon. Fewer than three points draws nothing.
    fn fill_polygon(&mut self, points: &[Vector], color: Rgba);

    fn stroke_line(&mut self, stroke: Stroke);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    FillRect { rect: Rect, color: Rgba },
    FillGradient { rect: Rect, gradient: LinearGradient },
    FillPolygon { points: Vec<Vector>, color: Rgba },
    StrokeLine(Stroke),
}

impl DrawCommand {
    /// Short name of the operation, as used in the serialized `op` tag.
    pub fn op(&self) -> &'static str {
        match self {
            DrawCommand::Clear => "clear",
            DrawCommand::FillRect { .. } => "fill_rect",
            DrawCommand::FillGradient { .. } => "fill_gradient",
            DrawCommand::FillPolygon { .. } => "fill_polygon",
            DrawCommand::StrokeLine(_) => "stroke_line",
        }
    }
}

/// A [`Surface`] that keeps every command it receives.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops everything recorded so far.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of recorded commands whose [`DrawCommand::op`] equals `op`.
    pub fn count(&self, op: &str) -> usize {
        self.commands.iter().filter(|c| c.op() == op).count()
    }

    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::StrokeLine(s) => Some(s),
            _ => None,
        })
    }
}

impl Surface for Recorder {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        self.commands.push(DrawCommand::FillGradient {
            rect,
            gradient: gradient.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[Vector], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_line(&mut self, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeLine(stroke));
    }
}
