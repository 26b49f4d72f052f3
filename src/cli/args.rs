use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use s1feat::{BandSource, MaskFormat, MultilookFactor, Polarization};

fn parse_multilook(s: &str) -> Result<MultilookFactor, String> {
    s.parse().map_err(|e: s1feat::Error| e.to_string())
}

#[derive(Parser)]
#[command(
    name = "s1feat",
    version,
    about = "Sentinel-1 feature extraction (intensity, incidence angle, lat/lon, swath mask)"
)]
pub struct CliArgs {
    /// Engine configuration file (JSON with `gpt` and `graph_root`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Replace artifacts that already exist
    #[arg(long, global = true, default_value_t = false)]
    pub overwrite: bool,

    /// Check preconditions and print engine commands without running them
    #[arg(long, global = true, default_value_t = false)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Input product and feature folder shared by the extraction subcommands
#[derive(Args, Debug, Clone)]
pub struct ProductArgs {
    /// Unpacked Sentinel-1 product folder (`<basename>.SAFE`)
    pub safe: PathBuf,

    /// Feature folder receiving the artifacts
    pub feat: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct CompositeArgs {
    /// Polarization used as channel A
    #[arg(long, value_enum, default_value_t = Polarization::Hh)]
    pub channel_a: Polarization,

    /// Polarization used as channel B
    #[arg(long, value_enum, default_value_t = Polarization::Hv)]
    pub channel_b: Polarization,

    /// Channel A lower clip bound (dB)
    #[arg(long, default_value_t = -30.0, allow_negative_numbers = true)]
    pub a_min: f64,

    /// Channel A upper clip bound (dB)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub a_max: f64,

    /// Channel B lower clip bound (dB)
    #[arg(long, default_value_t = -35.0, allow_negative_numbers = true)]
    pub b_min: f64,

    /// Channel B upper clip bound (dB)
    #[arg(long, default_value_t = -5.0, allow_negative_numbers = true)]
    pub b_max: f64,

    /// Output range lower bound
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub new_min: f64,

    /// Output range upper bound
    #[arg(long, default_value_t = 255.0)]
    pub new_max: f64,

    /// Source of the red band (a, b or zero)
    #[arg(long, value_enum, default_value_t = BandSource::B)]
    pub red: BandSource,

    /// Source of the green band (a, b or zero)
    #[arg(long, value_enum, default_value_t = BandSource::A)]
    pub green: BandSource,

    /// Source of the blue band (a, b or zero)
    #[arg(long, value_enum, default_value_t = BandSource::A)]
    pub blue: BandSource,
}

#[derive(Subcommand)]
pub enum Command {
    /// Calibrated intensity of one polarization
    Intensity {
        #[command(flatten)]
        product: ProductArgs,

        /// Polarization to extract (hh, hv, vv, vh)
        #[arg(long, value_enum)]
        pol: Polarization,

        /// Multilook window "<looks_rg>x<looks_az>", both odd
        #[arg(long, default_value = "1x1", value_parser = parse_multilook)]
        ml: MultilookFactor,

        /// Convert to decibels
        #[arg(long, default_value_t = false)]
        db: bool,
    },

    /// Incidence angle grid
    IncidenceAngle {
        #[command(flatten)]
        product: ProductArgs,
    },

    /// Latitude and longitude grids
    LatLon {
        #[command(flatten)]
        product: ProductArgs,
    },

    /// Labeled sub-swath mask
    SwathMask {
        #[command(flatten)]
        product: ProductArgs,

        /// Output format (envi or tiff)
        #[arg(long, value_enum, default_value_t = MaskFormat::Envi)]
        format: MaskFormat,
    },

    /// False-color composite from two linear intensities of a feature folder
    Rgb {
        /// Feature folder holding `Sigma0_<POL>.img`
        feat: PathBuf,

        /// Folder receiving `<feat basename>_rgb.tif`
        result: PathBuf,

        #[command(flatten)]
        composite: CompositeArgs,
    },

    /// Every feature artifact of one product
    Extract {
        #[command(flatten)]
        product: ProductArgs,

        /// Multilook window "<looks_rg>x<looks_az>", both odd
        #[arg(long, default_value = "1x1", value_parser = parse_multilook)]
        ml: MultilookFactor,

        /// Also write an RGB composite of the product's polarization pair here
        #[arg(long)]
        rgb: Option<PathBuf>,
    },

    /// Extract features for every product listed in a text file
    Batch {
        /// Product basenames, one per line (`#` comments allowed)
        #[arg(long)]
        list: PathBuf,

        /// Folder holding the `<basename>.SAFE` products
        #[arg(long)]
        l1_dir: PathBuf,

        /// Root folder; each product gets `<feature_root>/<basename>`
        #[arg(long)]
        feature_root: PathBuf,

        /// Multilook window "<looks_rg>x<looks_az>", both odd
        #[arg(long, default_value = "1x1", value_parser = parse_multilook)]
        ml: MultilookFactor,

        /// Keep going when a product fails
        #[arg(long, default_value_t = false)]
        continue_on_error: bool,
    },
}
