//! High-level library API: extract feature artifacts from Sentinel-1 SAFE
//! products into a feature folder, build RGB composites, and drive batches
//! from a product list. Prefer these entrypoints over the low-level engine
//! and processing modules when integrating s1feat.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::core::params::{CompositeParams, IntensityRequest, MultilookFactor, RunOptions};
use crate::core::processing::composite::compose_rgb;
use crate::core::processing::swath_mask::{build_swath_mask, swath_names};
use crate::core::recipe::{MetaRecipe, Recipe, intensity_stem, meta_recipe, select_intensity_recipe};
use crate::engine::{Engine, GptEngine, StageJob, StagedInvoker};
use crate::error::{Error, Result};
use crate::io::safe::SafeProduct;
use crate::io::writers::envi::write_envi;
use crate::io::writers::tiff::{write_plain_tiff_u8, write_tiff_bands};
use crate::io::RasterReader;
use crate::store::{
    Artifact, Decision, FeatureStore, INCIDENCE_ANGLE_STEM, LATITUDE_STEM, LONGITUDE_STEM, Outcome,
};
use crate::types::MaskFormat;

/// Per-artifact outcomes of [`FeatureExtractor::extract_features`]
#[derive(Debug, Clone, Default)]
pub struct FeatureReport {
    pub outcomes: Vec<(String, Outcome)>,
}

impl FeatureReport {
    fn push(&mut self, label: String, outcome: Outcome) {
        self.outcomes.push((label, outcome));
    }

    /// True when every artifact was already present
    pub fn all_skipped(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|(_, o)| o.is_skipped())
    }
}

/// Batch processing report
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Read a product list: one basename per line; blank lines and `#`
/// comments are ignored, a trailing `.SAFE` is tolerated.
pub fn read_product_list(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(Error::not_found("product list", path));
    }
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.strip_suffix(".SAFE").unwrap_or(l).to_string())
        .collect())
}

/// Entry point for all extraction operations. Generic over the engine so
/// tests can substitute an in-process fake for SNAP `gpt`.
pub struct FeatureExtractor<E: Engine = GptEngine> {
    config: EngineConfig,
    engine: E,
    options: RunOptions,
}

impl FeatureExtractor<GptEngine> {
    pub fn from_config(config: EngineConfig, options: RunOptions) -> Self {
        let engine = GptEngine::from_config(&config);
        Self::new(config, engine, options)
    }
}

impl<E: Engine> FeatureExtractor<E> {
    pub fn new(config: EngineConfig, engine: E, options: RunOptions) -> Self {
        Self {
            config,
            engine,
            options,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn invoker(&self) -> StagedInvoker<'_, E> {
        StagedInvoker::new(&self.engine, self.options.dry_run)
    }

    fn stage(&self, recipe: &Recipe, product: &SafeProduct, feat: &Path, stem: &str) -> Result<Outcome> {
        let job = StageJob {
            recipe,
            product: &product.folder,
            feature_dir: feat,
            target_stem: stem,
            overwrite: self.options.overwrite,
        };
        self.invoker().run(&job)
    }

    /// Calibrated intensity (`Sigma0_<POL>[_dB].img/.hdr`), optionally
    /// multilooked and speckle filtered
    pub fn extract_intensity(
        &self,
        safe: &Path,
        feat: &Path,
        request: &IntensityRequest,
    ) -> Result<Outcome> {
        let product = SafeProduct::open(safe)?;
        let recipe = select_intensity_recipe(&product.identity, request, &self.config.graph_root)?;
        info!(
            "Extracting {} from {} (multilook {})",
            intensity_stem(request),
            product.basename(),
            request.multilook
        );
        self.stage(&recipe, &product, feat, &intensity_stem(request))
    }

    /// Incidence angle (`IA.img/.hdr`)
    pub fn extract_incidence_angle(&self, safe: &Path, feat: &Path) -> Result<Outcome> {
        let product = SafeProduct::open(safe)?;
        let recipe = meta_recipe(MetaRecipe::IncidenceAngle, &self.config.graph_root);
        info!("Extracting incidence angle from {}", product.basename());
        self.stage(&recipe, &product, feat, INCIDENCE_ANGLE_STEM)
    }

    /// Latitude and longitude grids. Skipped only when both exist; otherwise
    /// both are regenerated, one engine run each.
    pub fn extract_lat_lon(&self, safe: &Path, feat: &Path) -> Result<Outcome> {
        let store = FeatureStore::new(feat);
        if store.decide(&Artifact::LatLon, self.options.overwrite) == Decision::Skip {
            info!("lat/lon already exist in {:?}, skipping", feat);
            return Ok(Outcome::Skipped);
        }

        let product = SafeProduct::open(safe)?;
        let root = &self.config.graph_root;
        let recipes = [
            (meta_recipe(MetaRecipe::Latitude, root), LATITUDE_STEM),
            (meta_recipe(MetaRecipe::Longitude, root), LONGITUDE_STEM),
        ];
        let jobs: Vec<StageJob<'_>> = recipes
            .iter()
            .map(|(recipe, stem)| StageJob {
                recipe,
                product: &product.folder,
                feature_dir: feat,
                target_stem: *stem,
                overwrite: true,
            })
            .collect();

        let invoker = self.invoker();
        for job in &jobs {
            invoker.check_preconditions(job)?;
        }

        info!("Extracting lat/lon from {}", product.basename());
        let mut produced = Vec::new();
        for job in &jobs {
            if let Outcome::Produced(files) = invoker.run(job)? {
                produced.extend(files);
            }
        }
        if self.options.dry_run {
            return Ok(Outcome::DryRun);
        }
        Ok(Outcome::Produced(produced))
    }

    /// Labeled swath mask computed from the annotation of the product's
    /// first polarization. Does not use the external engine.
    pub fn extract_swath_mask(&self, safe: &Path, feat: &Path, format: MaskFormat) -> Result<Outcome> {
        let store = FeatureStore::new(feat);
        let artifact = Artifact::SwathMask(format);
        if store.decide(&artifact, self.options.overwrite) == Decision::Skip {
            info!("swath mask already exists in {:?}, skipping", feat);
            return Ok(Outcome::Skipped);
        }

        let product = SafeProduct::open(safe)?;
        // Unsupported modes fail before the annotation is read
        swath_names(product.identity.mode)?;
        let pol = product.identity.primary_polarization();
        let geometry = product.swath_geometry(pol)?;
        info!(
            "Building swath mask for {} ({} lines x {} samples, {} bounds records)",
            product.basename(),
            geometry.lines,
            geometry.samples,
            geometry.bounds.len()
        );
        let mask = build_swath_mask(&geometry, product.identity.mode)?;

        if self.options.dry_run {
            return Ok(Outcome::DryRun);
        }

        fs::create_dir_all(feat)?;
        store.remove(&artifact)?;
        let files = store.files(&artifact);
        match format {
            MaskFormat::Envi => {
                write_envi(&files[0], &mask)?;
            }
            MaskFormat::Tiff => write_plain_tiff_u8(&files[0], &mask)?,
        }
        info!("Produced {:?}", files[0]);
        Ok(Outcome::Produced(files))
    }

    /// False-color composite `<result>/<feat basename>_rgb.tif` from the
    /// linear intensities of two polarizations in `feat`
    pub fn make_rgb(&self, feat: &Path, result: &Path, params: &CompositeParams) -> Result<Outcome> {
        params.validate()?;
        if !feat.is_dir() {
            return Err(Error::not_found("feature folder", feat));
        }

        let features = FeatureStore::new(feat);
        let results = FeatureStore::new(result);
        let artifact = Artifact::Composite {
            basename: features.basename(),
        };
        let output = results.files(&artifact).remove(0);
        if results.decide(&artifact, self.options.overwrite) == Decision::Skip {
            info!("{:?} already exists, skipping", output);
            return Ok(Outcome::Skipped);
        }

        let input = |pol| {
            let request = IntensityRequest {
                polarization: pol,
                multilook: MultilookFactor::SINGLE,
                db: false,
            };
            features.files(&Artifact::Intensity(request)).remove(0)
        };
        let a_path = input(params.channel_a);
        let b_path = input(params.channel_b);
        for path in [&a_path, &b_path] {
            if !path.is_file() {
                return Err(Error::not_found("intensity input", path));
            }
        }

        if self.options.dry_run {
            return Ok(Outcome::DryRun);
        }

        info!("Reading {:?} and {:?}", a_path, b_path);
        let reader_a = RasterReader::open(&a_path)?;
        let a = reader_a.read_band(1)?;
        let b = RasterReader::open(&b_path)?.read_band(1)?;
        let rgb = compose_rgb(&a, &b, params)?;

        fs::create_dir_all(result)?;
        results.remove(&artifact)?;
        let mut ds = write_tiff_bands(&output, &rgb)?;
        if let Some(gt) = reader_a.metadata.geotransform {
            ds.set_geo_transform(&gt)?;
        }
        if !reader_a.metadata.projection.is_empty() {
            ds.set_projection(&reader_a.metadata.projection)?;
        }
        info!("Saved RGB composite to {:?}", output);
        Ok(Outcome::Produced(vec![output]))
    }

    /// All feature artifacts of one product: linear and dB intensity for
    /// every polarization, swath mask, incidence angle and lat/lon. Stops at
    /// the first failure; completed artifacts stay and are skipped on rerun.
    pub fn extract_features(
        &self,
        safe: &Path,
        feat: &Path,
        multilook: MultilookFactor,
    ) -> Result<FeatureReport> {
        let product = SafeProduct::open(safe)?;
        let mut report = FeatureReport::default();

        for &polarization in product.identity.polarizations() {
            for db in [false, true] {
                let request = IntensityRequest {
                    polarization,
                    multilook,
                    db,
                };
                let outcome = self.extract_intensity(safe, feat, &request)?;
                report.push(intensity_stem(&request), outcome);
            }
        }

        let format = MaskFormat::default();
        let outcome = self.extract_swath_mask(safe, feat, format)?;
        report.push(Artifact::SwathMask(format).label(), outcome);

        let outcome = self.extract_incidence_angle(safe, feat)?;
        report.push(Artifact::IncidenceAngle.label(), outcome);

        let outcome = self.extract_lat_lon(safe, feat)?;
        report.push(Artifact::LatLon.label(), outcome);

        Ok(report)
    }

    /// Process every product in `list` one after another, reading
    /// `<l1_dir>/<id>.SAFE` into `<feature_root>/<id>`. If
    /// `continue_on_error` is false the first error is returned.
    pub fn process_product_list(
        &self,
        list: &Path,
        l1_dir: &Path,
        feature_root: &Path,
        multilook: MultilookFactor,
        continue_on_error: bool,
    ) -> Result<BatchReport> {
        let ids = read_product_list(list)?;
        info!("Starting batch of {} product(s) from {:?}", ids.len(), list);

        let mut report = BatchReport::default();
        for id in ids {
            let safe: PathBuf = l1_dir.join(format!("{id}.SAFE"));
            let feat = feature_root.join(&id);
            info!("Processing: {:?} -> {:?}", safe, feat);

            match self.extract_features(&safe, &feat, multilook) {
                Ok(features) if features.all_skipped() => {
                    info!("All features of {} already present", id);
                    report.skipped += 1;
                }
                Ok(_) => {
                    info!("Successfully processed: {}", id);
                    report.processed += 1;
                }
                Err(e) => {
                    warn!("Error processing {}: {}", id, e);
                    report.errors += 1;
                    if !continue_on_error {
                        return Err(e);
                    }
                }
            }
        }

        info!(
            "Batch processing complete: processed={} skipped={} errors={}",
            report.processed, report.skipped, report.errors
        );
        Ok(report)
    }
}
