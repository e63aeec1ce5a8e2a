//! Job configuration loaded from JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::export::ExportFormat;
use crate::mesh::ExtractOptions;
use crate::models::{ModelKind, RecipeOptions};
use crate::render::ViewOptions;
use crate::voxel::Palette;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// One model build: what to build, where to write it and how to preview it.
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Model recipe to build.
    pub model: ModelKind,
    /// Mesh output path. Defaults to `<model>.<format>`.
    pub output: Option<PathBuf>,
    /// Output format. Taken from the output extension when absent.
    pub format: Option<ExportFormat>,
    /// Seed, coloring and cake parameters for primitive recipes.
    pub recipe: RecipeOptions,
    /// Extraction settings for voxel recipes.
    pub extract: ExtractOptions,
    /// Entries overlaid on the model's own palette.
    pub palette: Palette,
    /// PNG preview path; no preview when absent.
    pub preview: Option<PathBuf>,
    /// Preview settings. The model's own view is used when absent.
    pub view: Option<ViewOptions>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            output: None,
            format: None,
            recipe: RecipeOptions::default(),
            extract: ExtractOptions::default(),
            palette: Palette::new(),
            preview: None,
            view: None,
        }
    }
}

impl JobConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded job config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format to write: explicit, else from the output extension, else OBJ
    pub fn resolved_format(&self) -> ExportFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(ExportFormat::from_path))
            .unwrap_or_default()
    }

    /// Output path, defaulting to the model name with the format's extension
    pub fn resolved_output(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(format!("{}.{}", self.model.name(), self.resolved_format().extension())),
        }
    }
}
