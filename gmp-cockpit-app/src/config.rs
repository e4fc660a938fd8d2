//! Configuration service

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use gmp_cockpit_core::types::SignatureDefaults;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Golden-arrow navigation reuses an open document of the target module
    pub reuse_open_documents: bool,
    /// Handed to every document for its signed saves
    pub signature: SignatureDefaults,
    /// Module keys opened at startup, in order
    pub startup_modules: Vec<String>,
    /// Oldest inactive document is closed when exceeded
    pub max_open_documents: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reuse_open_documents: true,
            signature: SignatureDefaults::default(),
            startup_modules: Vec::new(),
            max_open_documents: None,
        }
    }
}

/// Configuration service trait
pub trait ConfigService: Send + Sync {
    /// Load configuration
    fn load(&self) -> Result<AppConfig>;

    /// Save configuration
    fn save(&self, config: &AppConfig) -> Result<()>;
}

/// JSON file configuration service
///
/// A missing file loads as defaults.
pub struct JsonConfigService {
    path: PathBuf,
}

impl JsonConfigService {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/gmp-cockpit/config.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().context("no configuration directory on this platform")?;
        Ok(Self::new(dir.join("gmp-cockpit").join("config.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigService for JsonConfigService {
    fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            log::debug!("No config at {}, using defaults", self.path.display());
            return Ok(AppConfig::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid configuration in {}", self.path.display()))
    }

    fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        log::info!("Configuration saved to {}", self.path.display());
        Ok(())
    }
}

/// Configuration held in memory only
#[derive(Default)]
pub struct MemoryConfigService {
    config: parking_lot::RwLock<AppConfig>,
}

impl MemoryConfigService {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: parking_lot::RwLock::new(config),
        }
    }
}

impl ConfigService for MemoryConfigService {
    fn load(&self) -> Result<AppConfig> {
        Ok(self.config.read().clone())
    }

    fn save(&self, config: &AppConfig) -> Result<()> {
        *self.config.write() = config.clone();
        Ok(())
    }
}
