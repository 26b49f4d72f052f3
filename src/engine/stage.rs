//! Staged engine invocation.
//!
//! The engine writes into a scratch workspace inside the feature folder; on
//! success the staged `<stem>.img`/`<stem>.hdr` pair is copied to its final
//! artifact name and the scratch directory is removed. Preconditions are
//! checked before anything touches the filesystem.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::scratch::ScratchWorkspace;
use super::{Engine, EngineInvocation};
use crate::core::recipe::Recipe;
use crate::error::{Error, Result};
use crate::store::{Decision, Outcome, decide};

/// One recipe run against one product, landing as `<target_stem>.img/.hdr`
/// in `feature_dir`
#[derive(Debug, Clone)]
pub struct StageJob<'a> {
    pub recipe: &'a Recipe,
    pub product: &'a Path,
    pub feature_dir: &'a Path,
    pub target_stem: &'a str,
    pub overwrite: bool,
}

impl StageJob<'_> {
    pub fn targets(&self) -> [PathBuf; 2] {
        [
            self.feature_dir.join(format!("{}.img", self.target_stem)),
            self.feature_dir.join(format!("{}.hdr", self.target_stem)),
        ]
    }
}

pub struct StagedInvoker<'e, E: Engine + ?Sized> {
    engine: &'e E,
    dry_run: bool,
}

impl<'e, E: Engine + ?Sized> StagedInvoker<'e, E> {
    pub fn new(engine: &'e E, dry_run: bool) -> Self {
        Self { engine, dry_run }
    }

    /// Engine executable, product folder and recipe template must all exist
    pub fn check_preconditions(&self, job: &StageJob<'_>) -> Result<()> {
        let exe = self.engine.executable();
        if !exe.is_file() {
            return Err(Error::not_found("graph processing tool", exe));
        }
        if !job.product.is_dir() {
            return Err(Error::not_found("input product", job.product));
        }
        if !job.recipe.template.is_file() {
            return Err(Error::not_found("recipe template", &job.recipe.template));
        }
        Ok(())
    }

    pub fn run(&self, job: &StageJob<'_>) -> Result<Outcome> {
        let targets = job.targets();
        // The `.img` alone marks the artifact as present
        if decide(&targets[..1], job.overwrite) == Decision::Skip {
            info!("{:?} already exists, skipping {}", targets[0], job.recipe.name);
            return Ok(Outcome::Skipped);
        }

        self.check_preconditions(job)?;
        fs::create_dir_all(job.feature_dir)?;
        let scratch = ScratchWorkspace::acquire(job.feature_dir)?;

        let invocation = EngineInvocation {
            program: self.engine.executable().to_path_buf(),
            template: job.recipe.template.clone(),
            input: job.product.to_path_buf(),
            output: scratch.output_file(),
            parameters: job.recipe.parameters.clone(),
        };
        info!("{}", invocation.command_line());

        if self.dry_run {
            scratch.release()?;
            return Ok(Outcome::DryRun);
        }

        let report = self
            .engine
            .execute(&invocation)
            .map_err(|e| Error::ExternalTool {
                program: invocation.program.display().to_string(),
                code: None,
                detail: e.to_string(),
            })?;
        if !report.success {
            warn!("{} failed: {}", job.recipe.name, report.detail());
            return Err(Error::ExternalTool {
                program: invocation.program.display().to_string(),
                code: report.code,
                detail: report.detail(),
            });
        }

        let data_dir = invocation.staged_data_dir();
        let stem = &job.recipe.staged_stem;
        let staged = [
            data_dir.join(format!("{stem}.img")),
            data_dir.join(format!("{stem}.hdr")),
        ];
        for file in &staged {
            if !file.is_file() {
                return Err(Error::MissingOutput { path: file.clone() });
            }
        }
        // Header first: the `.img` is the skip marker and must land last
        for (from, to) in staged.iter().zip(targets.iter()).rev() {
            debug!("Relocating {:?} -> {:?}", from, to);
            if let Err(e) = fs::copy(from, to) {
                discard_partial(&targets);
                return Err(e.into());
            }
        }

        scratch.release()?;
        info!("Produced {:?}", targets[0]);
        Ok(Outcome::Produced(targets.to_vec()))
    }
}

fn discard_partial(targets: &[PathBuf]) {
    for target in targets.iter().filter(|t| t.is_file()) {
        if let Err(e) = fs::remove_file(target) {
            warn!("Could not remove partial output {:?}: {}", target, e);
        }
    }
}
