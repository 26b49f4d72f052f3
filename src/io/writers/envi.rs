use std::path::Path;

use gdal::raster::{Buffer, GdalType};
use gdal::{Dataset, DriverManager};
use ndarray::Array2;

use crate::error::Result;

/// Write a single-band raster as ENVI. `output_img` names the `.img` file;
/// GDAL places the `.hdr` header next to it.
pub fn write_envi<T: GdalType + Copy>(output_img: &Path, data: &Array2<T>) -> Result<Dataset> {
    let (rows, cols) = data.dim();
    let driver = DriverManager::get_driver_by_name("ENVI")?;
    let ds = driver.create_with_band_type::<T, _>(output_img, cols, rows, 1)?;
    let mut buf = Buffer::new((cols, rows), data.iter().copied().collect());
    let mut band = ds.rasterband(1)?;
    band.write((0, 0), (cols, rows), &mut buf)?;
    Ok(ds)
}
