//! Layered value noise over an integer lattice.
//!
//! Each octave interpolates a 4×4 neighbourhood of pure lattice hashes with
//! a Catmull-Rom-style cubic and accumulates additively into the field.
//! Successive octaves halve the period and multiply the amplitude by the
//! gain, giving a fractal spectrum with fine detail at low amplitude.

use serde::{Deserialize, Serialize};

use crate::heightfield::{FieldError, HeightField};

/// Per-octave generation parameters. Defaults give 4 octaves starting at
/// period 16 / amplitude 100, amplitude ×0.3 and period ×0.5 per octave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseParams {
    pub octaves: u32,
    pub period: f64,
    pub amplitude: f64,
    /// Amplitude multiplier applied after each octave.
    pub gain: f64,
    /// Period multiplier applied after each octave.
    pub period_falloff: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            period: 16.0,
            amplitude: 100.0,
            gain: 0.3,
            period_falloff: 0.5,
        }
    }
}

/// splitmix64 finaliser: a full-avalanche mix of one 64-bit word.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Pure, stateless hash of (seed, x, y) into [0, 1).
///
/// Two calls with identical arguments always return the same value and no
/// call observes or mutates shared state, so lattice values are
/// reproducible and order-independent.
#[inline]
pub fn lattice_noise(seed: i64, x: i64, y: i64) -> f64 {
    let mut h = mix64((seed as u64) ^ (x as u64).wrapping_mul(0x85EB_CA77_C2B2_AE63));
    h = mix64(h ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F));
    // Top 53 bits → the full f64 mantissa range in [0, 1).
    (h >> 11) as f64 / 9_007_199_254_740_992.0
}

/// Cubic interpolation through control points b (t=0) and c (t=1);
/// a and d only shape the curvature in between.
#[inline]
pub fn cubic_interpolate(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    t * (t * (t * (-a + b - c + d) + (2.0 * a - 2.0 * b + c - d)) + (-a + c)) + b
}

/// Add one noise octave into `field`: each cell is a bicubic interpolation
/// of the 4×4 lattice hashes around its position at the given period,
/// scaled by `amplitude`. Contributions stack across calls.
pub fn generate_layer(field: &mut HeightField, seed: i64, period: f64, amplitude: f64) {
    for y in 0..field.height {
        for x in 0..field.width {
            let xp = x as f64 / period;
            let yp = y as f64 / period;
            let x0 = xp.floor() as i64;
            let y0 = yp.floor() as i64;
            let xt = xp - x0 as f64;
            let yt = yp - y0 as f64;

            let mut rows = [0.0f64; 4];
            for (k, row) in rows.iter_mut().enumerate() {
                let ys = y0 - 1 + k as i64;
                *row = cubic_interpolate(
                    lattice_noise(seed, x0 - 1, ys),
                    lattice_noise(seed, x0, ys),
                    lattice_noise(seed, x0 + 1, ys),
                    lattice_noise(seed, x0 + 2, ys),
                    xt,
                );
            }

            field.data[y * field.width + x] +=
                cubic_interpolate(rows[0], rows[1], rows[2], rows[3], yt) * amplitude;
        }
    }
}

/// Accumulate all octaves into `field`. Octave `i` hashes with `seed + i`
/// so layers draw from independent lattices.
pub fn generate_into(field: &mut HeightField, seed: i64, params: &NoiseParams) {
    let mut amplitude = params.amplitude;
    let mut period = params.period;
    for i in 0..params.octaves {
        generate_layer(field, seed + i as i64, period, amplitude);
        amplitude *= params.gain;
        period *= params.period_falloff;
    }
}

/// Generate a fresh fractal-noise field at the given size with the default
/// octave schedule.
pub fn generate(width: usize, height: usize, seed: i64) -> Result<HeightField, FieldError> {
    let mut field = HeightField::new(width, height)?;
    generate_into(&mut field, seed, &NoiseParams::default());
    Ok(field)
}
