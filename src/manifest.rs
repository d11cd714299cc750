//! `icons` fragment for a WebExtension manifest.json
//!
//! Browsers look up extension icons through the `icons` key of manifest.json,
//! which maps a pixel size (as a string) to a path relative to the extension
//! root:
//!
//! ```json
//! "icons": {
//!   "16": "icons/icon16.png",
//!   "48": "icons/icon48.png",
//!   "128": "icons/icon128.png"
//! }
//! ```
//!
//! Paths are written relative to the extension root, which is the directory the
//! manifest lives in.

use crate::icon_gen::IconOutcome;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The `icons` object of a manifest, ordered by size
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestIcons {
    #[serde(skip)]
    root: PathBuf,
    pub icons: BTreeMap<u32, String>,
}

impl ManifestIcons {
    /// Creates an empty fragment for an extension rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            icons: BTreeMap::new(),
        }
    }

    /// Adds an icon, replacing any previous entry for the same size
    ///
    /// # Arguments
    /// * `size` - The icon size in pixels, used as the manifest key
    /// * `path` - Path of the written icon file, absolute or relative to the cwd
    ///
    /// # Errors
    /// Returns an error if:
    /// - The root or the icon cannot be resolved on disk
    /// - The icon does not live under the extension root
    /// - The relative path is not valid UTF-8
    pub fn add_icon(&mut self, size: u32, path: &Path) -> Result<()> {
        let entry = manifest_path(&self.root, path)?;
        self.icons.insert(size, entry);
        Ok(())
    }

    /// Builds the fragment from the icons that were actually written
    ///
    /// # Arguments
    /// * `root` - The extension root, i.e. the directory holding manifest.json
    /// * `outcomes` - Per-size results from `write_icons`; failed sizes are skipped
    ///
    /// # Errors
    /// Fails under the same conditions as [`ManifestIcons::add_icon`].
    pub fn from_outcomes(root: impl Into<PathBuf>, outcomes: &[IconOutcome]) -> Result<Self> {
        let mut manifest = Self::new(root);
        for outcome in outcomes.iter().filter(|o| o.is_ok()) {
            manifest.add_icon(outcome.size, &outcome.path)?;
        }
        Ok(manifest)
    }

    /// Serializes the fragment as pretty-printed JSON
    ///
    /// # Returns
    /// * `Result<String>` - `{"icons": {"16": "...", ...}}` with sizes in ascending order
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize manifest icons")
    }
}

/// Path of `icon` relative to `root`, with forward slashes
fn manifest_path(root: &Path, icon: &Path) -> Result<String> {
    let root_abs = root
        .canonicalize()
        .with_context(|| format!("Can't resolve extension root {}", root.display()))?;
    let icon_abs = icon
        .canonicalize()
        .with_context(|| format!("Can't resolve icon path {}", icon.display()))?;

    let Ok(relative) = icon_abs.strip_prefix(&root_abs) else {
        bail!(
            "{} is not inside the extension root {}",
            icon.display(),
            root.display()
        );
    };

    let mut parts = Vec::new();
    for component in relative.components() {
        match component.as_os_str().to_str() {
            Some(part) => parts.push(part),
            None => bail!("{} is not valid UTF-8", relative.display()),
        }
    }
    Ok(parts.join("/"))
}
