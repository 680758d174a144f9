//! Shared entry point for both services

use aws_config::SdkConfig;

use crate::cloudformation::StackService;
use crate::config::ClientConfig;
use crate::s3::ObjectService;

/// Holds the one SDK configuration every adapter is built from
#[derive(Debug, Clone)]
pub struct Session {
    sdk_config: SdkConfig,
    force_path_style: bool,
}

impl Session {
    /// Wrap an already loaded SDK configuration, with virtual-hosted S3 addressing
    pub fn new(sdk_config: SdkConfig) -> Self {
        Self {
            sdk_config,
            force_path_style: false,
        }
    }

    /// Build the SDK configuration from a [`ClientConfig`]
    pub async fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            sdk_config: config.sdk_config().await,
            force_path_style: config.force_path_style,
        }
    }

    /// Session from the config file in the default location, or the SDK's
    /// default chain when there is none
    pub async fn load() -> anyhow::Result<Self> {
        let config = ClientConfig::load()?;
        Ok(Self::from_client_config(&config).await)
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.sdk_config
    }

    /// Stack service sharing this session's configuration
    pub fn cloudformation(&self) -> StackService {
        StackService::from_conf(&self.sdk_config)
    }

    /// Object service sharing this session's configuration
    pub fn s3(&self) -> ObjectService {
        ObjectService::from_conf(&self.sdk_config, self.force_path_style)
    }
}
