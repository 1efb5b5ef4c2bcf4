use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on cell count for a single field (256M cells ≈ 2 GiB of f64).
pub const MAX_CELLS: usize = 256_000_000;

/// The only fatal condition in the engine: an allocation request the
/// process cannot be expected to satisfy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("height field {width}×{height} exceeds the {max}-cell budget")]
    TooLarge { width: usize, height: usize, max: usize },
}

/// A 2D terrain height-field storing elevations as f64, row-major
/// (`index = y * width + x`). Out-of-bounds reads return 0.0 and
/// out-of-bounds writes are no-ops, so edge-of-grid sampling never needs
/// special-casing by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightField {
    /// Row-major elevation values.
    pub data: Vec<f64>,
    pub width: usize,
    pub height: usize,
}

impl HeightField {
    /// Create a zero-filled HeightField.
    pub fn new(width: usize, height: usize) -> Result<Self, FieldError> {
        let cells = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_CELLS)
            .ok_or(FieldError::TooLarge { width, height, max: MAX_CELLS })?;
        Ok(Self { data: vec![0.0; cells], width, height })
    }

    /// Stored value at (x, y), or 0.0 when (x, y) is outside the grid.
    #[inline]
    pub fn height_at(&self, x: i64, y: i64) -> f64 {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.data[y as usize * self.width + x as usize]
        } else {
            0.0
        }
    }

    /// Add `delta` to the cell at (x, y), clamped to `[lo, hi]`.
    /// Out of bounds: silent no-op.
    #[inline]
    pub fn adjust_height_at(&mut self, x: i64, y: i64, delta: f64, lo: f64, hi: f64) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let i = y as usize * self.width + x as usize;
            self.data[i] = (self.data[i] + delta).clamp(lo, hi);
        }
    }

    /// Sample the field at a fractional position using bilinear
    /// interpolation over the 4 surrounding cells. Exact at integer
    /// coordinates: `sample_bilinear(x, y) == height_at(x, y)`.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let (x1, y1) = (x0 + 1, y0 + 1);
        let xt = x - x0 as f64;
        let yt = y - y0 as f64;

        let top = self.height_at(x0, y0) * (1.0 - xt) + self.height_at(x1, y0) * xt;
        let bottom = self.height_at(x0, y1) * (1.0 - xt) + self.height_at(x1, y1) * xt;
        top * (1.0 - yt) + bottom * yt
    }

    /// Height difference between the bilinearly-averaged right/left and
    /// bottom/top edges of the cell containing (x, y). Not a true gradient;
    /// the erosion integrator consumes it directly as a downhill force, so
    /// the edge-difference form is load-bearing.
    pub fn slope_at(&self, x: f64, y: f64) -> (f64, f64) {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let (x1, y1) = (x0 + 1, y0 + 1);
        let xt = x - x0 as f64;
        let yt = y - y0 as f64;

        // Left and right cell edges, averaged along y.
        let xa = self.height_at(x0, y0) * (1.0 - yt) + self.height_at(x0, y1) * yt;
        let xb = self.height_at(x1, y0) * (1.0 - yt) + self.height_at(x1, y1) * yt;

        // Top and bottom cell edges, averaged along x.
        let ya = self.height_at(x0, y0) * (1.0 - xt) + self.height_at(x1, y0) * xt;
        let yb = self.height_at(x0, y1) * (1.0 - xt) + self.height_at(x1, y1) * xt;

        (xb - xa, yb - ya)
    }

    /// Spread `delta` over the 4 cells surrounding (x, y), weighted
    /// bilinearly. Every adjustment is clamped to the corner extrema
    /// captured before any mutation, so a single deposit can never push a
    /// cell beyond the pre-existing local relief.
    pub fn deposit_weighted(&mut self, x: f64, y: f64, delta: f64) {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let (x1, y1) = (x0 + 1, y0 + 1);
        let xt = x - x0 as f64;
        let yt = y - y0 as f64;

        let corners = [
            self.height_at(x0, y0),
            self.height_at(x1, y0),
            self.height_at(x0, y1),
            self.height_at(x1, y1),
        ];
        let h_min = corners.iter().cloned().fold(f64::INFINITY, f64::min);
        let h_max = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        self.adjust_height_at(x0, y0, delta * (1.0 - xt) * (1.0 - yt), h_min, h_max);
        self.adjust_height_at(x1, y0, delta * xt * (1.0 - yt), h_min, h_max);
        self.adjust_height_at(x0, y1, delta * (1.0 - xt) * yt, h_min, h_max);
        self.adjust_height_at(x1, y1, delta * xt * yt, h_min, h_max);
    }

    pub fn min_elevation(&self) -> f64 {
        self.data.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max_elevation(&self) -> f64 {
        self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}
