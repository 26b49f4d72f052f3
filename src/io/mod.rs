//! I/O layer: product folder layout (`safe`), the annotation swath geometry
//! reader, GDAL-backed raster reading, and `writers` for ENVI and TIFF
//! outputs.
pub mod annotation;
pub use annotation::{AnnotationError, SwathBoundingBox, SwathGeometry};

pub mod gdal;
pub use self::gdal::{RasterMetadata, RasterReader};

pub mod safe;
pub use safe::SafeProduct;

pub mod writers;
