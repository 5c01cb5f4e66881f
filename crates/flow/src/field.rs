//! Grid of unit direction vectors sampled from gradient noise.
//!
//! The grid reads any [`NoiseFn`] source over `(col, row, time)`. The default
//! is [`ImprovedNoise`], Ken Perlin's reference noise.

use backdrop_core::noise::ImprovedNoise;
use backdrop_core::Vector;
use noise::NoiseFn;
use std::f64::consts::TAU;

/// Noise-space distance between adjacent cells.
const CELL_STEP: f64 = 0.1;
/// Noise-space advance of the time axis per regeneration.
const Z_STEP: f64 = 0.01;

/// A coarse grid of unit vectors, one per `scale`-sized cell, indexed
/// `col + row * cols`.
///
/// Every [`update`](FlowField::update) resamples the whole grid one step
/// further along the noise time axis, so the field drifts smoothly.
#[derive(Debug, Clone)]
pub struct FlowField<N = ImprovedNoise> {
    cols: usize,
    rows: usize,
    scale: f64,
    z_offset: f64,
    vectors: Vec<Vector>,
    source: N,
}

impl FlowField {
    /// Covers a `width` x `height` viewport with `scale`-pixel cells plus one
    /// extra column and row for the right and bottom edges.
    ///
    /// Degenerate sizes give a single-cell grid; a non-positive scale is
    /// treated as 1.
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        let scale = sanitize_scale(scale);
        let cells = |extent: f64| {
            if extent.is_finite() && extent > 0.0 {
                (extent / scale).floor() as usize + 1
            } else {
                1
            }
        };
        Self::with_grid(cells(width), cells(height), scale)
    }

    /// Builds a grid with explicit dimensions and samples it once.
    pub fn with_grid(cols: usize, rows: usize, scale: f64) -> Self {
        Self::with_source(cols, rows, scale, ImprovedNoise)
    }
}

impl<N: NoiseFn<f64, 3>> FlowField<N> {
    /// Builds a grid over a custom noise source and samples it once.
    pub fn with_source(cols: usize, rows: usize, scale: f64, source: N) -> Self {
        let mut field = Self {
            cols,
            rows,
            scale: sanitize_scale(scale),
            z_offset: 0.0,
            vectors: vec![Vector::ZERO; cols.saturating_mul(rows)],
            source,
        };
        field.update();
        field
    }

    /// Resamples every cell at the current time offset, then advances it.
    pub fn update(&mut self) {
        let z = self.z_offset;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let sample = self
                    .source
                    .get([col as f64 * CELL_STEP, row as f64 * CELL_STEP, z]);
                let angle = sample * TAU;
                self.vectors[col + row * self.cols] = Vector::from_angle(angle);
            }
        }
        self.z_offset += Z_STEP;
        log::trace!(
            "flow field resampled: {}x{} cells, z = {:.2}",
            self.cols,
            self.rows,
            self.z_offset
        );
    }

    /// The vector of the cell containing `(x, y)`, or zero when the point
    /// falls outside the grid.
    pub fn lookup(&self, x: f64, y: f64) -> Vector {
        match (self.cell(x), self.cell(y)) {
            (Some(col), Some(row)) if col < self.cols && row < self.rows => {
                self.vectors[col + row * self.cols]
            }
            _ => Vector::ZERO,
        }
    }

    fn cell(&self, coord: f64) -> Option<usize> {
        let index = (coord / self.scale).floor();
        // NaN fails both comparisons.
        if index >= 0.0 && index < usize::MAX as f64 {
            Some(index as usize)
        } else {
            None
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn z_offset(&self) -> f64 {
        self.z_offset
    }

    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    pub fn source(&self) -> &N {
        &self.source
    }
}

fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
