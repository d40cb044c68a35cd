//! The plasma scalar field.
//!
//! Each cell value is the sum of three interfering sine terms, three
//! orbiting inverse-square "blobs" and a per-cell shimmer. The value is
//! normalized into `[0, 1]` and used as a lookup into the glyph ramp.
//!
//! Everything time-dependent that is shared across cells is computed once per
//! frame in [`FieldFrame::new`]; [`FieldFrame::sample`] is then a pure function
//! of the cell coordinates.

/// Blob falloff steepness.
const BLOB_K: f64 = 0.08;
/// Blob sum subtracted so that blobs read as highlights over the base field.
const BLOB_BIAS: f64 = 0.9;
/// Grid coordinates are divided by this before entering the sine terms.
const GRID_SCALE: f64 = 6.0;
/// Shimmer phase multiplier (approximately 2π, kept for visual parity).
const SHIMMER_PHASE: f64 = 6.283;

/// Strength multipliers for the field's secondary terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// Weight of the slow blob term.
    pub blob_strength: f64,
    /// Weight of the per-cell hash shimmer.
    pub shimmer_strength: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self { blob_strength: 1.0, shimmer_strength: 0.06 }
    }
}

/// Orbiting blob: center in grid units, falloff and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Blob {
    cx: f64,
    cy: f64,
    k: f64,
    weight: f64,
}

impl Blob {
    fn falloff(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.cx;
        let dy = y - self.cy;
        self.weight / (1.0 + self.k * (dx * dx + dy * dy))
    }
}

/// Per-frame field terms for a grid of `cols` by `rows` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFrame {
    t: f64,
    s1: f64,
    s2: f64,
    s3: f64,
    blobs: [Blob; 3],
    params: FieldParams,
}

impl FieldFrame {
    /// Precomputes the frame terms at animation phase `t` (seconds).
    pub fn new(t: f64, cols: u32, rows: u32, params: FieldParams) -> Self {
        let cols = f64::from(cols);
        let rows = f64::from(rows);

        let orbit = |amp: f64, fx: f64, fy: f64, offset: f64, k: f64, weight: f64| Blob {
            cx: cols * (0.5 + amp * (t * fx + offset).sin()),
            cy: rows * (0.5 + amp * (t * fy + offset).cos()),
            k,
            weight,
        };

        Self {
            t,
            s1: (t * 0.9).sin(),
            s2: (t * 1.3 + 1.7).sin(),
            s3: (t * 0.6 + 3.1).sin(),
            blobs: [
                orbit(0.25, 0.23, 0.19, 0.0, BLOB_K, 1.0),
                orbit(0.3, 0.17, 0.21, 2.0, BLOB_K * 1.1, 0.9),
                orbit(0.22, 0.29, 0.27, 4.0, BLOB_K * 0.95, 0.8),
            ],
            params,
        }
    }

    /// Animation phase this frame was built for.
    pub fn phase(&self) -> f64 {
        self.t
    }

    /// Raw (un-normalized) field value at a cell.
    pub fn raw(&self, col: u32, row: u32) -> f64 {
        let (c, r) = (f64::from(col), f64::from(row));
        let gx = c / GRID_SCALE;
        let gy = r / GRID_SCALE;

        let base = 0.35 * (gx * 0.85).sin() * self.s1
            + 0.35 * (gy * 0.78).sin() * self.s2
            + 0.3 * ((gx + gy) * 0.55).sin() * self.s3;

        let blobs: f64 = self.blobs.iter().map(|b| b.falloff(c, r)).sum();

        let h = hash2(c, r);
        let shimmer = (self.t * (2.2 + h * 2.5) + h * SHIMMER_PHASE).sin();

        base + self.params.blob_strength * (blobs - BLOB_BIAS) + self.params.shimmer_strength * shimmer
    }

    /// Field value at a cell, normalized from `[-1, 1]` into `[0, 1]`.
    pub fn sample(&self, col: u32, row: u32) -> f64 {
        normalize(self.raw(col, row))
    }
}

/// Maps the nominal `[-1, 1]` field range onto `[0, 1]`, clamping.
pub fn normalize(value: f64) -> f64 {
    ((value + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Deterministic sine-scramble hash of integer cell coordinates into `[0, 1)`.
pub fn hash2(x: f64, y: f64) -> f64 {
    let s = (x * 127.1 + y * 311.7).sin() * 43_758.545_312_3;
    s - s.floor()
}
