use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{BandSource, Polarization};

/// Multilook window (range x azimuth). Both factors are odd and positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MultilookFactor {
    range_looks: u32,
    azimuth_looks: u32,
}

impl MultilookFactor {
    pub const SINGLE: MultilookFactor = MultilookFactor {
        range_looks: 1,
        azimuth_looks: 1,
    };

    pub fn new(range_looks: u32, azimuth_looks: u32) -> Result<Self, Error> {
        if range_looks % 2 == 0 || azimuth_looks % 2 == 0 {
            return Err(Error::invalid(format!(
                "looks_rg and looks_az must be odd numbers, got {range_looks}x{azimuth_looks}"
            )));
        }
        Ok(Self {
            range_looks,
            azimuth_looks,
        })
    }

    pub fn range_looks(&self) -> u32 {
        self.range_looks
    }

    pub fn azimuth_looks(&self) -> u32 {
        self.azimuth_looks
    }

    /// Multilooking implies the speckle-filter variant of a recipe
    pub fn speckle_filter(&self) -> bool {
        self.range_looks > 1
    }
}

impl Default for MultilookFactor {
    fn default() -> Self {
        Self::SINGLE
    }
}

impl FromStr for MultilookFactor {
    type Err = Error;

    /// Parse `"<rangeLooks>x<azimuthLooks>"`, e.g. `"3x3"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            Error::invalid(format!(
                "cannot extract looks_rg and looks_az from `{s}`, expected <looks_rg>x<looks_az>"
            ))
        };
        let (rg, az) = s.trim().split_once('x').ok_or_else(malformed)?;
        let rg: u32 = rg.parse().map_err(|_| malformed())?;
        let az: u32 = az.parse().map_err(|_| malformed())?;
        Self::new(rg, az)
    }
}

impl TryFrom<String> for MultilookFactor {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MultilookFactor> for String {
    fn from(ml: MultilookFactor) -> Self {
        ml.to_string()
    }
}

impl std::fmt::Display for MultilookFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.range_looks, self.azimuth_looks)
    }
}

/// Side-effect policy shared by every extraction step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Replace artifacts that already exist
    pub overwrite: bool,
    /// Stage everything but never invoke the external engine
    pub dry_run: bool,
}

/// One intensity extraction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityRequest {
    pub polarization: Polarization,
    pub multilook: MultilookFactor,
    /// Convert to decibels inside the engine recipe
    pub db: bool,
}

/// Clip bounds in dB; also used for the output value range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRange {
    pub min: f64,
    pub max: f64,
}

impl ClipRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, name: &str) -> Result<(), Error> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(Error::invalid(format!(
                "{name}: expected finite min < max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandAssignment {
    pub red: BandSource,
    pub green: BandSource,
    pub blue: BandSource,
}

impl BandAssignment {
    pub fn as_array(&self) -> [BandSource; 3] {
        [self.red, self.green, self.blue]
    }
}

impl Default for BandAssignment {
    fn default() -> Self {
        Self {
            red: BandSource::B,
            green: BandSource::A,
            blue: BandSource::A,
        }
    }
}

/// Parameters of the false-color composite, suitable for config files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeParams {
    pub channel_a: Polarization,
    pub channel_b: Polarization,
    pub clip_a: ClipRange,
    pub clip_b: ClipRange,
    pub output: ClipRange,
    pub bands: BandAssignment,
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self {
            channel_a: Polarization::Hh,
            channel_b: Polarization::Hv,
            clip_a: ClipRange::new(-30.0, 0.0),
            clip_b: ClipRange::new(-35.0, -5.0),
            output: ClipRange::new(0.0, 255.0),
            bands: BandAssignment::default(),
        }
    }
}

impl CompositeParams {
    pub fn validate(&self) -> Result<(), Error> {
        self.clip_a.validate("channel A clip range")?;
        self.clip_b.validate("channel B clip range")?;
        self.output.validate("output range")
    }
}
