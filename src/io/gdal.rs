use std::path::Path;

use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager};
use ndarray::Array2;
use tracing::debug;

use crate::error::{Error, Result};

/// Shape and georeferencing of a GDAL-readable raster
#[derive(Debug, Clone)]
pub struct RasterMetadata {
    /// Width (samples) of the raster
    pub size_x: usize,
    /// Height (lines) of the raster
    pub size_y: usize,
    pub bands: usize,
    /// Affine geotransform, when the dataset carries one
    pub geotransform: Option<[f64; 6]>,
    /// Projection WKT; empty for non-georeferenced rasters
    pub projection: String,
}

/// Reader for feature rasters (ENVI `.img`, GeoTIFF, ...) via GDAL
pub struct RasterReader {
    pub dataset: Dataset,
    pub metadata: RasterMetadata,
}

impl RasterReader {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_found("raster", path));
        }
        let dataset = Dataset::open(path)?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(Error::invalid(format!(
                "no raster bands found in {}",
                path.display()
            )));
        }
        let geotransform = dataset.geo_transform().ok();
        let projection = dataset.projection();
        Ok(Self {
            dataset,
            metadata: RasterMetadata {
                size_x: size_x as usize,
                size_y: size_y as usize,
                bands,
                geotransform,
                projection,
            },
        })
    }

    fn read_buffer<T: gdal::raster::GdalType + Copy>(&self, index: usize) -> Result<Vec<T>> {
        if index == 0 || index > self.metadata.bands {
            return Err(Error::invalid(format!("band index {index} out of range")));
        }
        let band = self.dataset.rasterband(index)?;
        let window = (self.metadata.size_x, self.metadata.size_y);
        let buf = band.read_as::<T>((0, 0), window, window, None)?;
        Ok(buf.data().to_vec())
    }

    /// Read a single band (1-based index) as an f64 array of shape (lines, samples)
    pub fn read_band(&self, index: usize) -> Result<Array2<f64>> {
        let data = self.read_buffer::<f64>(index)?;
        Array2::from_shape_vec((self.metadata.size_y, self.metadata.size_x), data).map_err(|_| {
            Error::invalid(format!(
                "band {index} does not match raster size {}x{}",
                self.metadata.size_x, self.metadata.size_y
            ))
        })
    }
}

/// `(samples, lines)` of a raster
pub fn raster_dimensions(path: &Path) -> Result<(usize, usize)> {
    let reader = RasterReader::open(path)?;
    Ok((reader.metadata.size_x, reader.metadata.size_y))
}

/// Rewrite a (float) GeoTIFF as an ENVI `.img` + `.hdr` pair, keeping all
/// bands and any georeferencing.
pub fn convert_to_envi(input: &Path, output_img: &Path) -> Result<()> {
    let reader = RasterReader::open(input)?;
    let meta = &reader.metadata;
    debug!(
        "Converting {:?} ({} band(s), {}x{}) to ENVI {:?}",
        input, meta.bands, meta.size_x, meta.size_y, output_img
    );

    let driver = DriverManager::get_driver_by_name("ENVI")?;
    let mut ds =
        driver.create_with_band_type::<f32, _>(output_img, meta.size_x, meta.size_y, meta.bands)?;
    if let Some(gt) = meta.geotransform {
        ds.set_geo_transform(&gt)?;
    }
    if !meta.projection.is_empty() {
        ds.set_projection(&meta.projection)?;
    }
    for idx in 1..=meta.bands {
        let data = reader.read_buffer::<f32>(idx)?;
        let mut buf = Buffer::new((meta.size_x, meta.size_y), data);
        let mut band = ds.rasterband(idx)?;
        band.write((0, 0), (meta.size_x, meta.size_y), &mut buf)?;
    }
    Ok(())
}
