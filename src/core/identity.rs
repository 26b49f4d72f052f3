//! Product identity resolved from a standardized Sentinel-1 basename
//! (`MISSION_MODE_TYPE_POLCODE_DATETIME_...`).
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{AcquisitionMode, Polarization, PolarizationCode};

const DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Reasons a basename cannot be resolved into a [`ProductIdentity`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("basename `{0}` does not follow the MISSION_MODE_TYPE_POLCODE_DATETIME naming convention")]
    Malformed(String),
    #[error("unknown acquisition mode `{0}`")]
    UnknownMode(String),
    #[error("unknown polarization code `{0}`")]
    UnknownPolarizationCode(String),
    #[error("cannot parse acquisition datetime `{0}`")]
    BadDateTime(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductIdentity {
    pub basename: String,
    pub mode: AcquisitionMode,
    pub product_type: String,
    pub polarization_code: PolarizationCode,
    pub acquired: NaiveDateTime,
}

impl ProductIdentity {
    /// Resolve a basename. Every failure yields an `IdentityError`, so a
    /// half-filled identity can never reach downstream stages.
    pub fn from_basename(basename: &str) -> Result<Self, IdentityError> {
        let parts: Vec<&str> = basename.split('_').collect();
        if parts.len() < 5 {
            return Err(IdentityError::Malformed(basename.to_string()));
        }
        let (mode_tok, type_tok, pol_tok, dt_tok) = (parts[1], parts[2], parts[3], parts[4]);
        debug!("product_mode: {mode_tok}, product_type: {type_tok}, product_pol: {pol_tok}");

        if type_tok.is_empty() {
            return Err(IdentityError::Malformed(basename.to_string()));
        }
        let polarization_code = PolarizationCode::parse(pol_tok)
            .ok_or_else(|| IdentityError::UnknownPolarizationCode(pol_tok.to_string()))?;
        let mode = AcquisitionMode::parse(mode_tok)
            .ok_or_else(|| IdentityError::UnknownMode(mode_tok.to_string()))?;
        let acquired = NaiveDateTime::parse_from_str(dt_tok, DATETIME_FORMAT)
            .map_err(|_| IdentityError::BadDateTime(dt_tok.to_string()))?;

        Ok(Self {
            basename: basename.to_string(),
            mode,
            product_type: type_tok.to_string(),
            polarization_code,
            acquired,
        })
    }

    /// Resolve from a product folder (`.../<basename>.SAFE`) or feature folder
    /// path, using the file stem as basename.
    pub fn from_path(path: &Path) -> Result<Self, IdentityError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_basename(&stem)
    }

    pub fn polarizations(&self) -> &'static [Polarization] {
        self.polarization_code.polarizations()
    }

    pub fn has_polarization(&self, pol: Polarization) -> bool {
        self.polarizations().contains(&pol)
    }

    /// First polarization of the product (co-polarized channel)
    pub fn primary_polarization(&self) -> Polarization {
        self.polarizations()[0]
    }

    /// `YYYYMMDD`
    pub fn date(&self) -> String {
        self.acquired.format("%Y%m%d").to_string()
    }

    /// `YYYYMMDDThhmmss`, as found in the basename
    pub fn datetime_token(&self) -> String {
        self.acquired.format(DATETIME_FORMAT).to_string()
    }

    /// Human-readable label for figures, `YYYY/MM/DD, hh:mm`
    pub fn date_label(&self) -> String {
        self.acquired.format("%Y/%m/%d, %H:%M").to_string()
    }
}

/// Name of the zipped product archive for `basename`
pub fn zip_name(basename: &str) -> String {
    format!("{basename}.zip")
}

/// Path of the manifest inside an unpacked product folder
pub fn manifest_path(safe_folder: &Path) -> PathBuf {
    safe_folder.join("manifest.safe")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EW_BASENAME: &str = "S1A_EW_GRDM_1SDH_20230208T065619_20230208T065723_047141_05A7E5_F291";

    #[test]
    fn date_helpers_follow_basename() {
        let id = ProductIdentity::from_basename(EW_BASENAME).unwrap();
        assert_eq!(id.date(), "20230208");
        assert_eq!(id.datetime_token(), "20230208T065619");
        assert_eq!(id.date_label(), "2023/02/08, 06:56");
    }

    #[test]
    fn naming_helpers() {
        assert_eq!(zip_name("S1A_X"), "S1A_X.zip");
        assert_eq!(
            manifest_path(Path::new("/data/S1A_X.SAFE")),
            PathBuf::from("/data/S1A_X.SAFE/manifest.safe")
        );
    }

    #[test]
    fn from_path_uses_stem() {
        let id = ProductIdentity::from_path(Path::new(&format!("/l1/{EW_BASENAME}.SAFE"))).unwrap();
        assert_eq!(id.basename, EW_BASENAME);
        assert_eq!(id.primary_polarization(), Polarization::Hh);
    }
}
