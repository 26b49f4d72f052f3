use ndarray::{Array2, Zip, s};
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::annotation::SwathGeometry;
use crate::types::AcquisitionMode;

const EW_SWATHS: &[&str] = &["EW1", "EW2", "EW3", "EW4", "EW5"];
const IW_SWATHS: &[&str] = &["IW1", "IW2", "IW3"];

/// Ordered sub-swath names for an acquisition mode. Only the multi-swath
/// TOPS modes are supported.
pub fn swath_names(mode: AcquisitionMode) -> Result<&'static [&'static str]> {
    match mode {
        AcquisitionMode::Ew => Ok(EW_SWATHS),
        AcquisitionMode::Iw => Ok(IW_SWATHS),
        other => Err(Error::Unsupported(format!(
            "swath mask for acquisition mode {other}"
        ))),
    }
}

/// 0/1 coverage raster of one swath. Boxes are inclusive; the range end is
/// clamped to the raster width and the azimuth end to its height.
pub fn swath_indicator(geometry: &SwathGeometry, swath: &str) -> Array2<u8> {
    let (rows, cols) = (geometry.lines, geometry.samples);
    let mut mask = Array2::<u8>::zeros((rows, cols));
    for b in geometry.boxes_for(swath) {
        let y1 = b.first_azimuth_line.min(rows);
        let y2 = b.last_azimuth_line.saturating_add(1).min(rows);
        let x1 = b.first_range_sample.min(cols);
        let x2 = b.last_range_sample.saturating_add(1).min(cols);
        if y1 >= y2 || x1 >= x2 {
            continue;
        }
        mask.slice_mut(s![y1..y2, x1..x2]).fill(1);
    }
    mask
}

/// Composite all swaths into one labeled raster.
///
/// Each swath contributes `ordinal * coverage` (ordinals are 1-based), and
/// contributions are summed. Pixels covered by several swaths therefore
/// carry the sum of their ordinals (EW1 + EW2 overlap reads 3), not the
/// maximum; downstream consumers rely on this labeling.
pub fn compose_swath_mask(geometry: &SwathGeometry, swaths: &[&str]) -> Array2<u8> {
    let mut mask = Array2::<u8>::zeros((geometry.lines, geometry.samples));
    for (idx, swath) in swaths.iter().enumerate() {
        let ordinal = (idx + 1) as u8;
        debug!("Extracting swath {}/{}: {}", idx + 1, swaths.len(), swath);
        let indicator = swath_indicator(geometry, swath);
        Zip::from(&mut mask)
            .and(&indicator)
            .for_each(|acc, &hit| *acc = acc.wrapping_add(ordinal * hit));
    }
    mask
}

/// Build the full-product swath mask for `mode`
pub fn build_swath_mask(geometry: &SwathGeometry, mode: AcquisitionMode) -> Result<Array2<u8>> {
    let swaths = swath_names(mode)?;
    Ok(compose_swath_mask(geometry, swaths))
}
