use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Host configuration document, of which the client reads the staging
/// ("ftp") service entry: `{ "services": { "ftp": { "url", "root" } } }`.
/// Unknown services and fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub services: Services,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Services {
    #[serde(default)]
    pub ftp: FtpService,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FtpService {
    /// Base URL of the staging HTTP API.
    #[serde(default)]
    pub url: String,
    /// Root directory of the staging area shown to users.
    #[serde(default)]
    pub root: String,
}

impl ServiceConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self =
            serde_json::from_str(&data).with_context(|| "failed to parse config JSON")?;

        Ok(config)
    }

    /// Build a config directly from the staging endpoint and root.
    pub fn from_endpoint(url: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            services: Services {
                ftp: FtpService {
                    url: url.into(),
                    root: root.into(),
                },
            },
        }
    }
}
