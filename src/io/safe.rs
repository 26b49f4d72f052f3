use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::identity::{ProductIdentity, manifest_path};
use crate::error::{Error, Result};
use crate::io::annotation::{SwathGeometry, find_annotation_file, read_swath_geometry};
use crate::types::Polarization;

/// An unpacked Sentinel-1 product folder (`<basename>.SAFE`) with its
/// resolved identity
#[derive(Debug, Clone)]
pub struct SafeProduct {
    pub folder: PathBuf,
    pub identity: ProductIdentity,
}

impl SafeProduct {
    /// Check the folder exists and resolve its identity from the folder name
    pub fn open(folder: &Path) -> Result<Self> {
        if !folder.is_dir() {
            return Err(Error::not_found("Sentinel-1 SAFE folder", folder));
        }
        let identity = ProductIdentity::from_path(folder)?;
        debug!(
            "safe_folder: {:?}, mode: {}, type: {}, pols: {:?}",
            folder,
            identity.mode,
            identity.product_type,
            identity.polarizations()
        );
        Ok(Self {
            folder: folder.to_path_buf(),
            identity,
        })
    }

    pub fn basename(&self) -> &str {
        &self.identity.basename
    }

    pub fn manifest(&self) -> PathBuf {
        manifest_path(&self.folder)
    }

    /// Swath geometry read from the annotation of `polarization`
    pub fn swath_geometry(&self, polarization: Polarization) -> Result<SwathGeometry> {
        let path = find_annotation_file(&self.folder, polarization)?;
        Ok(read_swath_geometry(&path)?)
    }
}
