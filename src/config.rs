//! Engine configuration: where the SNAP `gpt` executable and the graph
//! templates live. Resolved once at startup from an optional JSON file,
//! then `GPT` / `S1FEAT_GRAPH_ROOT` environment overrides, then defaults.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const GPT_ENV: &str = "GPT";
pub const GRAPH_ROOT_ENV: &str = "S1FEAT_GRAPH_ROOT";

const DEFAULT_GPT: &str = "/opt/esa-snap/bin/gpt";
const DEFAULT_GRAPH_ROOT: &str = "snap_graphs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SNAP graph processing tool
    pub gpt: PathBuf,
    /// Directory holding the graph templates (`S1_EW_GRDM/`, `S1_meta/`, ...)
    pub graph_root: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gpt: PathBuf::from(DEFAULT_GPT),
            graph_root: PathBuf::from(DEFAULT_GRAPH_ROOT),
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::not_found("config file", path));
        }
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::invalid(format!("config {}: {e}", path.display())))
    }

    /// Apply environment overrides from `lookup` (normally `std::env::var`)
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(gpt) = lookup(GPT_ENV).filter(|v| !v.is_empty()) {
            self.gpt = PathBuf::from(gpt);
        }
        if let Some(root) = lookup(GRAPH_ROOT_ENV).filter(|v| !v.is_empty()) {
            self.graph_root = PathBuf::from(root);
        }
        self
    }

    /// Full resolution: file (if any), then process environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let base = match file {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|k| std::env::var(k).ok());
        debug!("engine config: {:?}", config);
        Ok(config)
    }
}
