pub mod envi;
pub mod tiff;
