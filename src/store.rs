//! Feature-folder layout: which files each artifact occupies and whether an
//! existing artifact lets a request be skipped.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::params::IntensityRequest;
use crate::core::recipe::intensity_stem;
use crate::types::MaskFormat;

pub const INCIDENCE_ANGLE_STEM: &str = "IA";
pub const LATITUDE_STEM: &str = "lat";
pub const LONGITUDE_STEM: &str = "lon";
pub const SWATH_MASK_STEM: &str = "swath_mask";

/// Named product stored in a feature (or result) folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Intensity(IntensityRequest),
    IncidenceAngle,
    LatLon,
    SwathMask(MaskFormat),
    /// RGB composite named after its feature folder
    Composite { basename: String },
}

impl Artifact {
    pub fn label(&self) -> String {
        match self {
            Artifact::Intensity(req) => intensity_stem(req),
            Artifact::IncidenceAngle => INCIDENCE_ANGLE_STEM.to_string(),
            Artifact::LatLon => "lat/lon".to_string(),
            Artifact::SwathMask(_) => SWATH_MASK_STEM.to_string(),
            Artifact::Composite { basename } => format!("{basename}_rgb"),
        }
    }
}

/// Skip-or-produce decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Produce,
}

/// Produce unless every file already exists and overwrite is off
pub fn decide<P: AsRef<Path>>(files: &[P], overwrite: bool) -> Decision {
    if !overwrite && !files.is_empty() && files.iter().all(|f| f.as_ref().exists()) {
        Decision::Skip
    } else {
        Decision::Produce
    }
}

/// What a request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Artifact already present and overwrite was off
    Skipped,
    /// Preconditions held; nothing was written
    DryRun,
    Produced(Vec<PathBuf>),
}

impl Outcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped)
    }
}

fn envi_pair(dir: &Path, stem: &str) -> [PathBuf; 2] {
    [
        dir.join(format!("{stem}.img")),
        dir.join(format!("{stem}.hdr")),
    ]
}

#[derive(Debug, Clone)]
pub struct FeatureStore {
    root: PathBuf,
}

impl FeatureStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder basename, used to name composites
    pub fn basename(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Every file the artifact occupies
    pub fn files(&self, artifact: &Artifact) -> Vec<PathBuf> {
        match artifact {
            Artifact::Intensity(req) => envi_pair(&self.root, &intensity_stem(req)).to_vec(),
            Artifact::IncidenceAngle => envi_pair(&self.root, INCIDENCE_ANGLE_STEM).to_vec(),
            Artifact::LatLon => {
                let mut files = envi_pair(&self.root, LATITUDE_STEM).to_vec();
                files.extend(envi_pair(&self.root, LONGITUDE_STEM));
                files
            }
            Artifact::SwathMask(MaskFormat::Envi) => {
                envi_pair(&self.root, SWATH_MASK_STEM).to_vec()
            }
            Artifact::SwathMask(MaskFormat::Tiff) => {
                vec![self.root.join(format!("{SWATH_MASK_STEM}.tif"))]
            }
            Artifact::Composite { basename } => {
                vec![self.root.join(format!("{basename}_rgb.tif"))]
            }
        }
    }

    /// Files whose presence marks the artifact as done. For ENVI pairs this
    /// is the `.img` data file.
    pub fn markers(&self, artifact: &Artifact) -> Vec<PathBuf> {
        self.files(artifact)
            .into_iter()
            .filter(|p| p.extension().is_none_or(|e| e != "hdr"))
            .collect()
    }

    pub fn decide(&self, artifact: &Artifact, overwrite: bool) -> Decision {
        decide(&self.markers(artifact), overwrite)
    }

    /// Delete whatever files of the artifact exist
    pub fn remove(&self, artifact: &Artifact) -> io::Result<()> {
        for file in self.files(artifact) {
            if file.exists() {
                debug!("Removing {:?}", file);
                fs::remove_file(&file)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::MultilookFactor;
    use crate::types::Polarization;

    fn hh_db() -> IntensityRequest {
        IntensityRequest {
            polarization: Polarization::Hh,
            multilook: MultilookFactor::SINGLE,
            db: true,
        }
    }

    #[test]
    fn artifact_file_names() {
        let store = FeatureStore::new("/feat/P");
        assert_eq!(
            store.files(&Artifact::Intensity(hh_db())),
            vec![
                PathBuf::from("/feat/P/Sigma0_HH_dB.img"),
                PathBuf::from("/feat/P/Sigma0_HH_dB.hdr"),
            ]
        );
        assert_eq!(
            store.markers(&Artifact::LatLon),
            vec![PathBuf::from("/feat/P/lat.img"), PathBuf::from("/feat/P/lon.img")]
        );
        assert_eq!(
            store.files(&Artifact::SwathMask(MaskFormat::Tiff)),
            vec![PathBuf::from("/feat/P/swath_mask.tif")]
        );
        assert_eq!(store.basename(), "P");
    }

    #[test]
    fn skip_requires_all_markers_and_no_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path());
        assert_eq!(store.decide(&Artifact::LatLon, false), Decision::Produce);

        fs::write(dir.path().join("lat.img"), b"").unwrap();
        assert_eq!(store.decide(&Artifact::LatLon, false), Decision::Produce);

        fs::write(dir.path().join("lon.img"), b"").unwrap();
        assert_eq!(store.decide(&Artifact::LatLon, false), Decision::Skip);
        assert_eq!(store.decide(&Artifact::LatLon, true), Decision::Produce);

        store.remove(&Artifact::LatLon).unwrap();
        assert!(!dir.path().join("lat.img").exists());
    }

    #[test]
    fn empty_file_list_never_skips() {
        let none: [PathBuf; 0] = [];
        assert_eq!(decide(&none, false), Decision::Produce);
    }
}
