//! Shared types and enums used across s1feat.
//! Includes `AcquisitionMode`, `Polarization`, `PolarizationCode`,
//! composite band sources (`BandSource`) and swath-mask output formats.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Sentinel-1 acquisition modes
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum AcquisitionMode {
    Sm,
    Iw,
    Ew,
    Wv,
}

impl AcquisitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionMode::Sm => "SM",
            AcquisitionMode::Iw => "IW",
            AcquisitionMode::Ew => "EW",
            AcquisitionMode::Wv => "WV",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "SM" => Some(AcquisitionMode::Sm),
            "IW" => Some(AcquisitionMode::Iw),
            "EW" => Some(AcquisitionMode::Ew),
            "WV" => Some(AcquisitionMode::Wv),
            _ => None,
        }
    }
}

impl std::fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize,
)]
pub enum Polarization {
    Hh,
    Hv,
    Vv,
    Vh,
}

impl Polarization {
    /// Upper-case two-letter code, as used in artifact and engine parameter names
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarization::Hh => "HH",
            Polarization::Hv => "HV",
            Polarization::Vv => "VV",
            Polarization::Vh => "VH",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            Polarization::Hh => "hh",
            Polarization::Hv => "hv",
            Polarization::Vv => "vv",
            Polarization::Vh => "vh",
        }
    }
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Polarization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HH" => Ok(Polarization::Hh),
            "HV" => Ok(Polarization::Hv),
            "VV" => Ok(Polarization::Vv),
            "VH" => Ok(Polarization::Vh),
            other => Err(format!("{other} is not a valid polarization")),
        }
    }
}

/// Four-character polarization code of the product basename (e.g. `1SDH`)
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PolarizationCode {
    /// Dual HH+HV
    Sdh,
    /// Single HH
    Ssh,
    /// Dual VV+VH
    Sdv,
    /// Single VV
    Ssv,
}

impl PolarizationCode {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "1SDH" => Some(PolarizationCode::Sdh),
            "1SSH" => Some(PolarizationCode::Ssh),
            "1SDV" => Some(PolarizationCode::Sdv),
            "1SSV" => Some(PolarizationCode::Ssv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolarizationCode::Sdh => "1SDH",
            PolarizationCode::Ssh => "1SSH",
            PolarizationCode::Sdv => "1SDV",
            PolarizationCode::Ssv => "1SSV",
        }
    }

    /// Polarizations carried by the product, co-polarized channel first
    pub fn polarizations(&self) -> &'static [Polarization] {
        match self {
            PolarizationCode::Sdh => &[Polarization::Hh, Polarization::Hv],
            PolarizationCode::Ssh => &[Polarization::Hh],
            PolarizationCode::Sdv => &[Polarization::Vv, Polarization::Vh],
            PolarizationCode::Ssv => &[Polarization::Vv],
        }
    }
}

/// Source of one output band of the false-color composite
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Serialize, Deserialize)]
pub enum BandSource {
    /// Scaled channel A (co-polarized by default)
    A,
    /// Scaled channel B (cross-polarized by default)
    B,
    Zero,
}

impl std::fmt::Display for BandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BandSource::A => write!(f, "A"),
            BandSource::B => write!(f, "B"),
            BandSource::Zero => write!(f, "zero"),
        }
    }
}

/// On-disk format of the swath mask
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default, Serialize, Deserialize)]
pub enum MaskFormat {
    /// `swath_mask.img` + `.hdr`
    #[default]
    Envi,
    /// Plain single-band 8-bit `swath_mask.tif`
    Tiff,
}
