use std::path::{Path, PathBuf};

use crate::client::ConfigStore;
use crate::common::{debug, info};
use crate::config::ConsulConfig;
use crate::provision::{Report, Step};
use crate::{BootstrapError, Result};

/// Encoding marker stored next to the config blob.
pub const CONFIG_TYPE: &str = "yaml";

/// Publishes the raw config file to the config store.
#[derive(Debug)]
pub struct ConfigPublisher {
    file: PathBuf,
    namespace: String,
}

impl ConfigPublisher {
    pub fn from_config(config: &ConsulConfig) -> Self {
        Self::new(config.config.file.clone(), config.config.namespace.clone())
    }

    pub fn new(file: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            namespace: namespace.into(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn config_key(&self) -> String {
        format!("{}/config", self.namespace)
    }

    pub fn config_type_key(&self) -> String {
        format!("{}/configType", self.namespace)
    }

    /// Read the config file. Failing to read it is fatal.
    pub async fn load_blob(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.file)
            .await
            .map_err(|err| BootstrapError::ConfigRead {
                path: self.file.clone(),
                description: err.to_string(),
            })
    }

    /// Write blob and type marker. Both writes are attempted.
    pub async fn publish<S>(&self, store: &S, blob: &[u8]) -> Report
    where
        S: ConfigStore + ?Sized,
    {
        let mut report = Report::new();

        let key = self.config_key();
        match store.put(&key, blob).await {
            Ok(()) => debug!(%key, bytes = blob.len(), "blob written"),
            Err(err) => report.record(Step::PutConfig, err),
        }

        let key = self.config_type_key();
        match store.put(&key, CONFIG_TYPE.as_bytes()).await {
            Ok(()) => debug!(%key, "type marker written"),
            Err(err) => report.record(Step::PutConfigType, err),
        }

        info!(
            file = %self.file.display(),
            namespace = %self.namespace,
            failures = report.failures().len(),
            "config published"
        );

        report
    }
}
