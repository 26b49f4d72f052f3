use std::fs::File;
use std::path::Path;

use gdal::raster::{Buffer, ColorInterpretation, GdalType};
use gdal::{Dataset, DriverManager};
use ndarray::{Array2, Array3, Axis};
use tiff::encoder::{TiffEncoder, colortype::Gray8};

use crate::error::Result;

const RGB_INTERPRETATION: [ColorInterpretation; 3] = [
    ColorInterpretation::RedBand,
    ColorInterpretation::GreenBand,
    ColorInterpretation::BlueBand,
];

/// Write a `(bands, rows, cols)` array as a GeoTIFF with one raster band per
/// leading index. Three-band outputs are tagged red/green/blue.
pub fn write_tiff_bands<T: GdalType + Copy>(output: &Path, data: &Array3<T>) -> Result<Dataset> {
    let (bands, rows, cols) = data.dim();
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let ds = driver.create_with_band_type::<T, _>(output, cols, rows, bands)?;

    for (idx, plane) in data.axis_iter(Axis(0)).enumerate() {
        let mut band = ds.rasterband(idx + 1)?;
        let interp = if bands == 3 {
            RGB_INTERPRETATION.into_iter().nth(idx).expect("idx < 3 when bands == 3")
        } else {
            ColorInterpretation::GrayIndex
        };
        band.set_color_interpretation(interp)?;
        let mut buf = Buffer::new((cols, rows), plane.iter().copied().collect());
        band.write((0, 0), (cols, rows), &mut buf)?;
    }

    Ok(ds)
}

/// Write a single-band 8-bit TIFF without georeferencing
pub fn write_plain_tiff_u8(output: &Path, data: &Array2<u8>) -> Result<()> {
    let (rows, cols) = data.dim();
    let file = File::create(output)?;
    let mut encoder = TiffEncoder::new(file)?;
    let pixels: Vec<u8> = data.iter().copied().collect();
    encoder.write_image::<Gray8>(cols as u32, rows as u32, &pixels)?;
    Ok(())
}
