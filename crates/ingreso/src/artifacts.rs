//! Artifact storage: provisioned output directories for test runs.
//!
//! The store owns the fixed layout under one root: `reports/` for the run
//! report and `reports/screenshots/` for captures. Directory provisioning
//! is idempotent; only real filesystem errors surface.

use crate::driver::Screenshot;
use crate::result::IngresoResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Report directory, relative to the store root
pub const REPORTS_DIR: &str = "reports";

/// Screenshot directory, relative to the store root
pub const SCREENSHOTS_DIR: &str = "reports/screenshots";

/// Run report filename
pub const REPORT_FILE: &str = "test-report.html";

/// Artifact layout rooted at one directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ArtifactStore {
    /// Create a store rooted at `root` (nothing is created yet)
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create `path` and all missing ancestors. No-op when the path
    /// already exists.
    ///
    /// # Errors
    ///
    /// Permission or other filesystem errors propagate as `Io`.
    pub fn ensure_dir(path: impl AsRef<Path>) -> IngresoResult<()> {
        let path = path.as_ref();
        if !path.is_dir() {
            fs::create_dir_all(path)?;
            tracing::debug!(target: "ingreso::artifacts", path = %path.display(), "created directory");
        }
        Ok(())
    }

    /// Provision the full layout: `reports/` and `reports/screenshots/`.
    ///
    /// # Errors
    ///
    /// Propagates `ensure_dir` failures.
    pub fn ensure_layout(&self) -> IngresoResult<()> {
        Self::ensure_dir(self.root.join(REPORTS_DIR))?;
        Self::ensure_dir(self.root.join(SCREENSHOTS_DIR))?;
        Ok(())
    }

    /// Path for a named screenshot: `<root>/reports/screenshots/<name>.png`
    #[must_use]
    pub fn screenshot_path(&self, name: &str) -> PathBuf {
        self.root.join(SCREENSHOTS_DIR).join(format!("{name}.png"))
    }

    /// Path of the run report: `<root>/reports/test-report.html`
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORTS_DIR).join(REPORT_FILE)
    }

    /// Write a capture under its screenshot path, provisioning parents
    /// first.
    ///
    /// # Errors
    ///
    /// Propagates filesystem failures as `Io`.
    pub fn save_screenshot(&self, name: &str, shot: &Screenshot) -> IngresoResult<PathBuf> {
        let path = self.screenshot_path(name);
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, &shot.data)?;
        tracing::info!(
            target: "ingreso::artifacts",
            path = %path.display(),
            bytes = shot.len(),
            "screenshot saved"
        );
        Ok(path)
    }
}
