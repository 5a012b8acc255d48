//! Persistent bridge configuration.
//!
//! Stored as TOML under the user's config directory. The backend keeps its own
//! copy of the output paths; [`BackendConfig`] is the JSON shape exchanged with
//! it when pushing or pulling those paths.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dedup::EquivalenceProfile;

pub const DEFAULT_API_PORT: u16 = 5555;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub api_port: u16,
    /// Where the extraction tool writes files pulled out of archives.
    pub codewalker_output_dir: PathBuf,
    /// Where the modeling addon writes exported XML assets.
    pub blender_output_dir: PathBuf,
    /// Where repacked resources for the game server are written.
    pub fivem_output_dir: PathBuf,
    pub rpf_path: PathBuf,
    pub export_with_ytyp: bool,
    pub equivalence: EquivalenceProfile,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_port: DEFAULT_API_PORT,
            codewalker_output_dir: PathBuf::new(),
            blender_output_dir: PathBuf::new(),
            fivem_output_dir: PathBuf::new(),
            rpf_path: PathBuf::new(),
            export_with_ytyp: false,
            equivalence: EquivalenceProfile::default(),
        }
    }
}

/// Output paths as the backend's `get-config` / `set-config` endpoints spell them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codewalker_output_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blender_output_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fivem_output_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "rpfArchivePath")]
    pub rpf_archive_path: Option<String>,
}

impl BridgeConfig {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("asset-bridge");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(BridgeConfig::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_path()?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    pub fn api_base_url(&self) -> String {
        format!("http://localhost:{}/api", self.api_port)
    }

    /// Payload pushed to the backend's `set-config` endpoint.
    pub fn backend_payload(&self) -> BackendConfig {
        BackendConfig {
            codewalker_output_dir: Some(path_string(&self.codewalker_output_dir)),
            blender_output_dir: Some(path_string(&self.blender_output_dir)),
            fivem_output_dir: Some(path_string(&self.fivem_output_dir)),
            rpf_archive_path: Some(path_string(&self.rpf_path)),
        }
    }

    /// Merges a `get-config` response. Paths the backend did not report keep
    /// their current value.
    pub fn apply_backend_config(&mut self, backend: &BackendConfig) {
        let fields = [
            (&mut self.codewalker_output_dir, &backend.codewalker_output_dir),
            (&mut self.blender_output_dir, &backend.blender_output_dir),
            (&mut self.fivem_output_dir, &backend.fivem_output_dir),
            (&mut self.rpf_path, &backend.rpf_archive_path),
        ];

        for (field, value) in fields {
            if let Some(value) = value {
                *field = PathBuf::from(value);
            }
        }
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
