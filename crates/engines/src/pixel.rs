//! [`Surface`] backed by a `tiny_skia::Pixmap`.
//!
//! Lets the CLI render frames without a browser. Fills and strokes are
//! anti-aliased and composited source-over, the way a 2D canvas context
//! paints them. Polygons use the even-odd rule.
//!
//! This module is always available (no feature gate) so tests and the `png`
//! snapshot path share the same buffer.

use backdrop_core::error::BackdropError;
use backdrop_core::surface::{LineCap, LinearGradient, Rect, Stroke, Surface};
use backdrop_core::{Rgba, Vector};
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, Shader, SpreadMode,
    Transform,
};

/// An RGBA pixmap that animations can paint onto.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    pixmap: Pixmap,
    /// Blank color restored by [`Surface::clear`].
    blank: Color,
}

impl PixelSurface {
    /// A `width` x `height` pixmap. An opaque surface clears to black, like a
    /// canvas context created without alpha; otherwise it clears to
    /// transparent.
    ///
    /// Returns `BackdropError::InvalidDimensions` for a zero or oversized
    /// extent.
    pub fn new(width: usize, height: usize, opaque: bool) -> Result<Self, BackdropError> {
        let w = u32::try_from(width).map_err(|_| BackdropError::InvalidDimensions)?;
        let h = u32::try_from(height).map_err(|_| BackdropError::InvalidDimensions)?;
        let mut pixmap = Pixmap::new(w, h).ok_or(BackdropError::InvalidDimensions)?;
        let blank = if opaque {
            Color::BLACK
        } else {
            Color::TRANSPARENT
        };
        pixmap.fill(blank);
        Ok(Self { pixmap, blank })
    }

    pub fn width(&self) -> usize {
        self.pixmap.width() as usize
    }

    pub fn height(&self) -> usize {
        self.pixmap.height() as usize
    }

    /// Straight-alpha color at `(x, y)`, or `None` outside the pixmap.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::from_u8(
            c.red(),
            c.green(),
            c.blue(),
            f64::from(c.alpha()) / 255.0,
        ))
    }

    /// Pixmap as straight-alpha 8-bit RGBA, row-major. Length is
    /// `width * height * 4`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    fn fill_paint(shader: Shader<'_>) -> Paint<'_> {
        Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        }
    }
}

/// Converts to a skia color, or `None` for non-finite channels.
fn skia_color(c: Rgba) -> Option<Color> {
    let channel = |v: f64| v.clamp(0.0, 1.0) as f32;
    Color::from_rgba(channel(c.r), channel(c.g), channel(c.b), channel(c.a))
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

fn skia_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
    }
}

fn finite(p: Vector) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Skia shader for `gradient`. A gradient with a degenerate axis or a single
/// stop paints its first color.
fn gradient_shader(gradient: &LinearGradient) -> Option<Shader<'static>> {
    let stops: Vec<GradientStop> = gradient
        .stops
        .iter()
        .filter_map(|s| Some(GradientStop::new(s.offset as f32, skia_color(s.color)?)))
        .collect();
    let solid = || skia_color(gradient.color_at(0.0)).map(Shader::SolidColor);
    if stops.len() < 2 || !finite(gradient.start) || !finite(gradient.end) {
        return solid();
    }
    tiny_skia::LinearGradient::new(
        Point::from_xy(gradient.start.x as f32, gradient.start.y as f32),
        Point::from_xy(gradient.end.x as f32, gradient.end.y as f32),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .or_else(solid)
}

impl Surface for PixelSurface {
    fn clear(&mut self) {
        self.pixmap.fill(self.blank);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let (Some(rect), Some(color)) = (skia_rect(rect), skia_color(color)) else {
            return;
        };
        let paint = Self::fill_paint(Shader::SolidColor(color));
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        let (Some(rect), Some(shader)) = (skia_rect(rect), gradient_shader(gradient)) else {
            return;
        };
        let paint = Self::fill_paint(shader);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn fill_polygon(&mut self, points: &[Vector], color: Rgba) {
        if points.len() < 3 || !points.iter().copied().all(finite) {
            return;
        }
        let Some(color) = skia_color(color) else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].x as f32, points[0].y as f32);
        for p in &points[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }
        pb.close();
        let Some(path) = pb.finish() else {
            return;
        };
        let paint = Self::fill_paint(Shader::SolidColor(color));
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }

    fn stroke_line(&mut self, stroke: Stroke) {
        if !(stroke.width > 0.0 && finite(stroke.from) && finite(stroke.to)) {
            return;
        }
        let Some(color) = skia_color(stroke.color) else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(stroke.from.x as f32, stroke.from.y as f32);
        pb.line_to(stroke.to.x as f32, stroke.to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };
        let style = tiny_skia::Stroke {
            width: stroke.width as f32,
            line_cap: skia_cap(stroke.cap),
            ..Default::default()
        };
        let paint = Self::fill_paint(Shader::SolidColor(color));
        self.pixmap
            .stroke_path(&path, &paint, &style, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One 8-bit quantization step.
    const STEP: f64 = 1.0 / 255.0 + 1e-9;

    fn red() -> Rgba {
        Rgba::from_u8(255, 0, 0, 1.0)
    }

    fn surface(width: usize, height: usize, opaque: bool) -> PixelSurface {
        PixelSurface::new(width, height, opaque).unwrap()
    }

    #[test]
    fn new_surface_clears_per_opacity() {
        let opaque = surface(2, 2, true);
        assert_eq!(opaque.pixel(0, 0).unwrap().a, 1.0);
        let clear = surface(2, 2, false);
        assert_eq!(clear.pixel(1, 1).unwrap().a, 0.0);
        assert!(clear.pixel(2, 0).is_none());
    }

    #[test]
    fn zero_extent_is_rejected() {
        assert!(matches!(
            PixelSurface::new(0, 4, true),
            Err(BackdropError::InvalidDimensions)
        ));
        assert!(PixelSurface::new(4, 0, false).is_err());
    }

    #[test]
    fn to_rgba8_has_four_bytes_per_pixel() {
        let s = surface(8, 4, true);
        let buf = s.to_rgba8();
        assert_eq!(buf.len(), 8 * 4 * 4);
        assert!(buf.chunks(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn fill_rect_is_clipped_to_buffer() {
        let mut s = surface(4, 4, true);
        s.fill_rect(Rect::new(2.0, -3.0, 10.0, 4.0), red());
        assert_eq!(s.pixel(3, 0).unwrap(), red());
        assert_eq!(s.pixel(2, 0).unwrap(), red());
        assert_eq!(s.pixel(1, 0).unwrap().r, 0.0);
        assert_eq!(s.pixel(3, 1).unwrap().r, 0.0);
    }

    #[test]
    fn translucent_fill_blends_source_over() {
        let mut s = surface(1, 1, true);
        s.fill_rect(Rect::sized(1.0, 1.0), Rgba::from_u8(255, 255, 255, 0.1));
        let p = s.pixel(0, 0).unwrap();
        assert!((p.r - 0.1).abs() <= STEP, "{p:?}");
        assert_eq!(p.a, 1.0);
    }

    #[test]
    fn translucent_fill_on_transparent_keeps_alpha() {
        let mut s = surface(1, 1, false);
        s.fill_rect(Rect::sized(1.0, 1.0), Rgba::from_u8(245, 245, 245, 0.1));
        let p = s.pixel(0, 0).unwrap();
        assert!((p.a - 0.1).abs() <= STEP, "{p:?}");
        assert!(p.r > 0.8);
    }

    #[test]
    fn clear_restores_blank() {
        let mut s = surface(2, 2, false);
        s.fill_rect(Rect::sized(2.0, 2.0), red());
        s.clear();
        assert_eq!(s.pixel(0, 0).unwrap().a, 0.0);
    }

    #[test]
    fn gradient_runs_from_start_to_end() {
        let mut s = surface(10, 1, true);
        let g = LinearGradient::new(Vector::ZERO, Vector::new(10.0, 0.0))
            .with_stop(0.0, Rgba::from_u8(0, 0, 0, 1.0))
            .with_stop(1.0, Rgba::from_u8(255, 255, 255, 1.0));
        s.fill_gradient(Rect::sized(10.0, 1.0), &g);
        let first = s.pixel(0, 0).unwrap().r;
        let middle = s.pixel(5, 0).unwrap().r;
        let last = s.pixel(9, 0).unwrap().r;
        assert!(first < 0.1, "{first}");
        assert!((middle - 0.55).abs() < 0.05, "{middle}");
        assert!(last > 0.9, "{last}");
        assert!(first < middle && middle < last);
    }

    #[test]
    fn single_stop_gradient_paints_solid() {
        let mut s = surface(3, 3, false);
        let g = LinearGradient::new(Vector::ZERO, Vector::ZERO).with_stop(0.5, red());
        s.fill_gradient(Rect::sized(3.0, 3.0), &g);
        assert_eq!(s.pixel(1, 1).unwrap(), red());
    }

    #[test]
    fn polygon_fills_interior_only() {
        let mut s = surface(10, 10, false);
        let square = [
            Vector::new(2.0, 2.0),
            Vector::new(6.0, 2.0),
            Vector::new(6.0, 6.0),
            Vector::new(2.0, 6.0),
        ];
        s.fill_polygon(&square, red());
        assert_eq!(s.pixel(3, 3).unwrap(), red());
        assert_eq!(s.pixel(5, 5).unwrap(), red());
        assert_eq!(s.pixel(6, 6).unwrap().a, 0.0);
        assert_eq!(s.pixel(1, 3).unwrap().a, 0.0);
    }

    #[test]
    fn self_intersecting_polygon_uses_even_odd() {
        let mut s = surface(12, 12, false);
        // Two overlapping squares traced as one path: the overlap is a hole.
        let outline = [
            Vector::new(1.0, 1.0),
            Vector::new(11.0, 1.0),
            Vector::new(11.0, 11.0),
            Vector::new(1.0, 11.0),
            Vector::new(1.0, 1.0),
            Vector::new(4.0, 4.0),
            Vector::new(8.0, 4.0),
            Vector::new(8.0, 8.0),
            Vector::new(4.0, 8.0),
            Vector::new(4.0, 4.0),
        ];
        s.fill_polygon(&outline, red());
        assert_eq!(s.pixel(9, 2).unwrap(), red());
        assert_eq!(s.pixel(6, 6).unwrap().a, 0.0);
    }

    #[test]
    fn polygon_outside_buffer_is_ignored() {
        let mut s = surface(4, 4, false);
        let tri = [
            Vector::new(-20.0, -20.0),
            Vector::new(-10.0, -20.0),
            Vector::new(-15.0, -10.0),
        ];
        s.fill_polygon(&tri, red());
        assert!(s.to_rgba8().iter().all(|&b| b == 0));
    }

    #[test]
    fn line_covers_its_path() {
        let mut s = surface(10, 10, false);
        s.stroke_line(Stroke {
            from: Vector::new(1.0, 5.5),
            to: Vector::new(9.0, 5.5),
            width: 1.0,
            color: red(),
            cap: LineCap::Round,
        });
        assert!(s.pixel(5, 5).unwrap().a > 0.9);
        assert_eq!(s.pixel(5, 2).unwrap().a, 0.0);
    }

    #[test]
    fn butt_cap_stops_at_endpoints_and_round_cap_extends() {
        let butt = Stroke {
            from: Vector::new(4.0, 5.0),
            to: Vector::new(8.0, 5.0),
            width: 4.0,
            color: red(),
            cap: LineCap::Butt,
        };
        let mut s = surface(12, 10, false);
        s.stroke_line(butt);
        assert_eq!(s.pixel(3, 4).unwrap().a, 0.0);
        assert!(s.pixel(5, 4).unwrap().a > 0.99);

        let mut s = surface(12, 10, false);
        s.stroke_line(Stroke {
            cap: LineCap::Round,
            ..butt
        });
        assert!(s.pixel(3, 4).unwrap().a > 0.9);
    }

    #[test]
    fn thin_line_is_partially_covered() {
        let mut s = surface(4, 4, false);
        s.stroke_line(Stroke {
            from: Vector::new(0.0, 1.5),
            to: Vector::new(4.0, 1.5),
            width: 0.5,
            color: red(),
            cap: LineCap::Butt,
        });
        let a = s.pixel(2, 1).unwrap().a;
        assert!(a > 0.2 && a < 0.8, "{a}");
    }

    #[test]
    fn degenerate_strokes_draw_nothing() {
        let mut s = surface(4, 4, false);
        let base = Stroke {
            from: Vector::new(1.0, 1.0),
            to: Vector::new(3.0, 3.0),
            width: 0.0,
            color: red(),
            cap: LineCap::Round,
        };
        s.stroke_line(base);
        s.stroke_line(Stroke {
            width: 1.0,
            from: Vector::new(f64::NAN, 1.0),
            ..base
        });
        assert!(s.to_rgba8().iter().all(|&b| b == 0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arbitrary_lines_never_exceed_stroke_alpha(
                x0 in -1e3_f64..1e3, y0 in -1e3_f64..1e3,
                x1 in -1e3_f64..1e3, y1 in -1e3_f64..1e3,
                width in 0.0_f64..5.0,
            ) {
                let mut s = surface(16, 16, false);
                s.stroke_line(Stroke {
                    from: Vector::new(x0, y0),
                    to: Vector::new(x1, y1),
                    width,
                    color: Rgba::from_u8(1, 2, 3, 0.5),
                    cap: LineCap::Round,
                });
                prop_assert!(s.to_rgba8().chunks(4).all(|px| px[3] <= 128));
            }
        }
    }
}
