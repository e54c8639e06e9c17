use std::path::Path;

use tokio::fs;

use crate::common::debug;
use crate::config::Config;
use crate::{BootstrapError, Result};

impl Config {
    /// Load and validate the configuration file at path.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |description: String| BootstrapError::ConfigLoad {
            path: path.to_owned(),
            description,
        };

        let raw = fs::read(path).await.map_err(|e| load_error(e.to_string()))?;
        let config = Config::from_yaml(&raw).map_err(|e| load_error(e.to_string()))?;

        if config.redis.admins.is_none() {
            return Err(BootstrapError::MissingAdmins {
                path: path.to_owned(),
            });
        }

        debug!(
            path = %path.display(),
            admins = config.admins().len(),
            "config loaded"
        );

        Ok(config)
    }

    pub(crate) fn from_yaml(raw: &[u8]) -> crate::common::Result<Self> {
        // A document without content (blank, comments only, or null) means
        // every key takes its default.
        if is_blank_document(raw) {
            return Ok(Config::default());
        }
        let config = serde_yaml::from_slice::<Option<Config>>(raw)?;
        Ok(config.unwrap_or_default())
    }

    /// Configured administrators in file order.
    pub fn admins(&self) -> &[String] {
        self.redis.admins.as_deref().unwrap_or(&[])
    }
}

// serde_yaml reports a stream without any node as an error.
fn is_blank_document(raw: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(raw) else {
        return false;
    };
    text.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---" || line == "...")
}
