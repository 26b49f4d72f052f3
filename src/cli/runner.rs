use std::path::Path;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use s1feat::{
    BandAssignment, ClipRange, CompositeParams, EngineConfig, FeatureExtractor, GptEngine,
    IntensityRequest, Outcome, RunOptions, SafeProduct,
};

use super::args::{CliArgs, Command, CompositeArgs};
use super::errors::AppError;

/// Install the process-wide subscriber once. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| AppError::InvalidLogLevel {
            level: level.to_string(),
            reason: e.to_string(),
        })?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn composite_params(args: &CompositeArgs) -> CompositeParams {
    CompositeParams {
        channel_a: args.channel_a,
        channel_b: args.channel_b,
        clip_a: ClipRange::new(args.a_min, args.a_max),
        clip_b: ClipRange::new(args.b_min, args.b_max),
        output: ClipRange::new(args.new_min, args.new_max),
        bands: BandAssignment {
            red: args.red,
            green: args.green,
            blue: args.blue,
        },
    }
}

fn report(what: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Skipped => info!("{}: already present, skipped", what),
        Outcome::DryRun => info!("{}: dry run, nothing written", what),
        Outcome::Produced(files) => info!("{}: wrote {:?}", what, files),
    }
}

/// Composite of the product's own polarization pair, default clip ranges
fn pair_composite(safe: &Path) -> Result<CompositeParams, AppError> {
    let product = SafeProduct::open(safe)?;
    match product.identity.polarizations() {
        [a, b] => Ok(CompositeParams {
            channel_a: *a,
            channel_b: *b,
            ..CompositeParams::default()
        }),
        other => Err(AppError::IncompletePolarizationPair {
            available: other
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }),
    }
}

fn dispatch(extractor: &FeatureExtractor<GptEngine>, command: Command) -> Result<(), AppError> {
    match command {
        Command::Intensity {
            product,
            pol,
            ml,
            db,
        } => {
            let request = IntensityRequest {
                polarization: pol,
                multilook: ml,
                db,
            };
            let outcome = extractor.extract_intensity(&product.safe, &product.feat, &request)?;
            report("intensity", &outcome);
        }
        Command::IncidenceAngle { product } => {
            let outcome = extractor.extract_incidence_angle(&product.safe, &product.feat)?;
            report("incidence angle", &outcome);
        }
        Command::LatLon { product } => {
            let outcome = extractor.extract_lat_lon(&product.safe, &product.feat)?;
            report("lat/lon", &outcome);
        }
        Command::SwathMask { product, format } => {
            let outcome = extractor.extract_swath_mask(&product.safe, &product.feat, format)?;
            report("swath mask", &outcome);
        }
        Command::Rgb {
            feat,
            result,
            composite,
        } => {
            let outcome = extractor.make_rgb(&feat, &result, &composite_params(&composite))?;
            report("rgb", &outcome);
        }
        Command::Extract { product, ml, rgb } => {
            let features = extractor.extract_features(&product.safe, &product.feat, ml)?;
            for (label, outcome) in &features.outcomes {
                report(label, outcome);
            }
            if let Some(result) = rgb {
                let params = pair_composite(&product.safe)?;
                let outcome = extractor.make_rgb(&product.feat, &result, &params)?;
                report("rgb", &outcome);
            }
        }
        Command::Batch {
            list,
            l1_dir,
            feature_root,
            ml,
            continue_on_error,
        } => {
            let batch = extractor.process_product_list(
                &list,
                &l1_dir,
                &feature_root,
                ml,
                continue_on_error,
            )?;
            info!("Processed: {}", batch.processed);
            info!("Skipped: {}", batch.skipped);
            info!("Errors: {}", batch.errors);
            if batch.errors > 0 {
                return Err(AppError::BatchFailures {
                    errors: batch.errors,
                });
            }
        }
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&args.log_level)?;

    let config = EngineConfig::load(args.config.as_deref()).map_err(AppError::from)?;
    let options = RunOptions {
        overwrite: args.overwrite,
        dry_run: args.dry_run,
    };
    let extractor = FeatureExtractor::from_config(config, options);

    if let Err(e) = dispatch(&extractor, args.command) {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}
