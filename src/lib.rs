#![doc = r#"
s1feat — Sentinel-1 feature extraction for machine-learning pipelines.

The crate turns Sentinel-1 GRD products (unpacked `.SAFE` folders) into a
folder of per-product feature rasters: calibrated intensities (linear and dB,
optionally multilooked), incidence angle, latitude/longitude grids and a
labeled swath mask. Radiometric processing is delegated to the ESA SNAP graph
processing tool (`gpt`) through recipe templates; swath masks and RGB
composites are computed natively.

Every artifact is idempotent: an existing output is skipped unless overwrite
is requested, so an interrupted batch can simply be re-run.

Requirements
------------
- GDAL development headers and runtime available on your system.
- ESA SNAP with `gpt` (or a compatible engine) plus the graph templates.
- Rust 2024 edition toolchain.

Quick start: extract one intensity
----------------------------------
```rust,no_run
use std::path::Path;
use s1feat::{
    EngineConfig, FeatureExtractor, IntensityRequest, MultilookFactor, Polarization, RunOptions,
};

fn main() -> s1feat::Result<()> {
    let config = EngineConfig::load(None)?;
    let extractor = FeatureExtractor::from_config(config, RunOptions::default());

    let request = IntensityRequest {
        polarization: Polarization::Hh,
        multilook: "3x3".parse::<MultilookFactor>()?,
        db: true,
    };
    extractor.extract_intensity(
        Path::new("/data/l1/S1A_EW_GRDM_1SDH_20200101T000000_20200101T000100_030000_036000_ABCD.SAFE"),
        Path::new("/data/features/S1A_EW_GRDM_1SDH_20200101T000000_20200101T000100_030000_036000_ABCD"),
        &request,
    )?;
    Ok(())
}
```

Batch from a product list
-------------------------
```rust,no_run
use std::path::Path;
use s1feat::{EngineConfig, FeatureExtractor, MultilookFactor, RunOptions};

fn main() -> s1feat::Result<()> {
    let extractor = FeatureExtractor::from_config(EngineConfig::load(None)?, RunOptions::default());
    let report = extractor.process_product_list(
        Path::new("products.txt"),
        Path::new("/data/l1"),
        Path::new("/data/features"),
        MultilookFactor::SINGLE,
        true, // continue_on_error
    )?;
    println!("processed={} skipped={} errors={}", report.processed, report.skipped, report.errors);
    Ok(())
}
```

Error handling
--------------
All public functions return `s1feat::Result<T>`. [`Error::kind`] classifies
failures into invalid input, missing prerequisites, unsupported
configurations, external tool failures and I/O.

Useful modules
--------------
- [`api`] — `FeatureExtractor` and the batch driver.
- [`core`] — product identity, parameters, recipe selection, swath masks, compositing.
- [`engine`] — the external engine seam and the staged invoker.
- [`io`] — SAFE layout, annotation reader, GDAL readers/writers.
- [`store`] — feature folder layout and skip/produce decisions.
"#]

pub mod api;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod io;
pub mod store;
pub mod types;

// Types
pub use config::EngineConfig;
pub use core::identity::{IdentityError, ProductIdentity};
pub use core::params::{
    BandAssignment, ClipRange, CompositeParams, IntensityRequest, MultilookFactor, RunOptions,
};
pub use error::{Error, ErrorKind, Result};
pub use types::{AcquisitionMode, BandSource, MaskFormat, Polarization, PolarizationCode};

// Engine seam
pub use engine::{Engine, EngineInvocation, GptEngine, ProcessReport};

// Readers and helpers
pub use io::gdal::{convert_to_envi, raster_dimensions};
pub use io::{RasterReader, SafeProduct, SwathGeometry};
pub use store::{Artifact, FeatureStore, Outcome};

// High-level API re-exports
pub use api::{BatchReport, FeatureExtractor, FeatureReport, read_product_list};
