use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Scratch directory name inside a feature folder. Fixed, so two runs
/// targeting the same feature folder must not overlap.
pub const SCRATCH_DIR: &str = "tmp";

/// Disposable staging directory owned by one engine invocation.
///
/// Acquiring always discards a leftover directory from a crashed run and
/// creates a fresh one. The directory is removed by [`release`](Self::release)
/// or, on any early return, when the value is dropped.
#[derive(Debug)]
pub struct ScratchWorkspace {
    path: PathBuf,
    released: bool,
}

impl ScratchWorkspace {
    pub fn acquire(feature_dir: &Path) -> io::Result<Self> {
        let path = feature_dir.join(SCRATCH_DIR);
        if path.exists() {
            debug!("Removing stale scratch workspace {:?}", path);
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir(&path)?;
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output product the engine is told to write (`tmp/tmp.dim`)
    pub fn output_file(&self) -> PathBuf {
        self.path.join("tmp.dim")
    }

    pub fn release(mut self) -> io::Result<()> {
        self.released = true;
        fs::remove_dir_all(&self.path)
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove scratch workspace {:?}: {}", self.path, e);
            }
        }
    }
}
