use ndarray::{Array2, Array3, Axis};
use tracing::info;

use crate::core::params::CompositeParams;
use crate::core::processing::scaling::{clip_and_rescale, saturate_u8, to_db};
use crate::error::{Error, Result};
use crate::types::BandSource;

/// Build an 8-bit, 3-band (red, green, blue) composite from two linear
/// intensity channels. Each channel is converted to dB, clipped and
/// rescaled independently; each output band takes channel A, channel B or
/// zeros per `params.bands`. Result shape is `(3, rows, cols)`.
pub fn compose_rgb(
    channel_a: &Array2<f64>,
    channel_b: &Array2<f64>,
    params: &CompositeParams,
) -> Result<Array3<u8>> {
    if channel_a.dim() != channel_b.dim() {
        return Err(Error::invalid(format!(
            "intensity channels must have the same array shape, got {:?} and {:?}",
            channel_a.dim(),
            channel_b.dim()
        )));
    }
    params.validate()?;

    info!("Converting {} and {} to dB", params.channel_a, params.channel_b);
    let a_db = to_db(channel_a);
    let b_db = to_db(channel_b);

    info!("Scaling channels individually");
    let a_scaled = clip_and_rescale(&a_db, params.clip_a, params.output).mapv(saturate_u8);
    let b_scaled = clip_and_rescale(&b_db, params.clip_b, params.output).mapv(saturate_u8);

    info!(
        "Stacking to RGB: red:{}, green:{}, blue:{}",
        params.bands.red, params.bands.green, params.bands.blue
    );
    let (rows, cols) = channel_a.dim();
    let mut rgb = Array3::<u8>::zeros((3, rows, cols));
    for (source, mut band) in params
        .bands
        .as_array()
        .into_iter()
        .zip(rgb.axis_iter_mut(Axis(0)))
    {
        match source {
            BandSource::A => band.assign(&a_scaled),
            BandSource::B => band.assign(&b_scaled),
            BandSource::Zero => {}
        }
    }
    Ok(rgb)
}
