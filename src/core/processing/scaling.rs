use ndarray::{Array2, Zip};

use crate::core::params::ClipRange;

/// Linear power to decibels, `10 * log10(x)`. Zero maps to `-inf` and
/// negative input to NaN, both handled by [`clip_and_rescale`].
pub fn to_db(linear: &Array2<f64>) -> Array2<f64> {
    linear.mapv(|v| 10.0 * v.log10())
}

/// Clip to `[clip.min, clip.max]`, then map affinely onto
/// `[out.min, out.max]`:
/// `(v - min) * (out.max - out.min) / (max - min) + out.min`.
#[inline]
pub fn rescale_value(value: f64, clip: ClipRange, out: ClipRange) -> f64 {
    let clipped = value.clamp(clip.min, clip.max);
    (clipped - clip.min) * ((out.max - out.min) / (clip.max - clip.min)) + out.min
}

pub fn clip_and_rescale(db: &Array2<f64>, clip: ClipRange, out: ClipRange) -> Array2<f64> {
    let mut scaled = Array2::<f64>::zeros(db.dim());
    Zip::from(&mut scaled)
        .and(db)
        .par_for_each(|dst, &v| *dst = rescale_value(v, clip, out));
    scaled
}

/// Round to nearest and saturate into `u8`; NaN becomes 0
#[inline]
pub fn saturate_u8(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, 255.0) as u8
    }
}
