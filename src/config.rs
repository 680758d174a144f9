//! Client configuration
//!
//! Describes how to build the single `SdkConfig` shared by every provider
//! adapter. Stored as JSON in the platform-specific config folder:
//! - Linux: ~/.config/cloudhandle/config.json
//! - Windows: %APPDATA%/cloudhandle/config.json
//! - macOS: ~/Library/Application Support/cloudhandle/config.json
//!
//! Values are passed through to the AWS SDK loader without validation.

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::{Credentials, Region};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings used to construct the shared SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Named profile from ~/.aws/config
    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint (LocalStack, MinIO, ...)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Use path-style S3 addressing, required by most S3-compatible servers
    #[serde(default)]
    pub force_path_style: bool,

    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,
}

impl ClientConfig {
    /// Load the configuration from the default location, returning defaults
    /// if the file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load the configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: ClientConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;

        tracing::info!(
            "Loaded config: profile={:?}, region={:?}, endpoint={:?}",
            config.profile,
            config.region,
            config.endpoint_url
        );

        Ok(config)
    }

    /// Save the configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents).with_context(|| format!("Failed to write config to {:?}", path))?;

        tracing::debug!("Saved config to {:?}", path);

        Ok(())
    }

    /// Get the path to the default config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "github.n-orlov", "cloudhandle")
            .context("Failed to determine config directory")?;

        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Static credentials, when both halves are present
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key), Some(secret_key)) => Some(Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "cloudhandle-config",
            )),
            _ => None,
        }
    }

    /// Build the SDK configuration shared by all adapters
    pub async fn sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some(credentials) = self.credentials() {
            loader = loader.credentials_provider(credentials);
        }

        loader.load().await
    }
}
