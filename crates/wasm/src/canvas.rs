//! [`Surface`] over a browser `CanvasRenderingContext2d`.

use backdrop_core::surface::{LinearGradient, Rect, Stroke, Surface};
use backdrop_core::{Rgba, Vector};
use web_sys::CanvasRenderingContext2d;

/// Paints animation frames onto a 2D canvas context.
pub struct Canvas2dSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Canvas2dSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    /// Tracks the canvas backing size so `clear` covers all of it.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn trace_path(&self, points: &[Vector]) {
        self.ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.ctx.move_to(first.x, first.y);
            for p in rest {
                self.ctx.line_to(p.x, p.y);
            }
        }
        self.ctx.close_path();
    }
}

impl Surface for Canvas2dSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        let fill = self.ctx.create_linear_gradient(
            gradient.start.x,
            gradient.start.y,
            gradient.end.x,
            gradient.end.y,
        );
        for stop in &gradient.stops {
            if let Err(e) = fill.add_color_stop(stop.offset as f32, &stop.color.to_css()) {
                log::warn!("gradient stop rejected: {e:?}");
            }
        }
        self.ctx.set_fill_style_canvas_gradient(&fill);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn fill_polygon(&mut self, points: &[Vector], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        self.trace_path(points);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_line(&mut self, stroke: Stroke) {
        self.ctx.set_line_cap(stroke.cap.as_str());
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.begin_path();
        self.ctx.move_to(stroke.from.x, stroke.from.y);
        self.ctx.line_to(stroke.to.x, stroke.to.y);
        self.ctx.stroke();
    }
}
