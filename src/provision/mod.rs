//! The bootstrap run: seed the cache, then publish the config file.
//!
//! Fatal conditions come back as `Err`. Writes that may fail without
//! stopping the run are collected in a [`Report`].

use std::fmt;

use crate::client::consul::ConsulClient;
use crate::client::{Cache, ConfigStore};
use crate::common::{error, info};
use crate::config::Config;
use crate::{BootstrapError, Result};

pub mod cache;
pub use cache::{CacheKeys, CacheProvisioner};

pub mod publish;
pub use publish::ConfigPublisher;

/// A write that failed without aborting the run.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    SetDescription,
    ClearAdmins,
    AddAdmin(String),
    PutConfig,
    PutConfigType,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Step::SetDescription => write!(f, "set description"),
            Step::ClearAdmins => write!(f, "clear admins"),
            Step::AddAdmin(admin) => write!(f, "add admin {}", admin),
            Step::PutConfig => write!(f, "put config"),
            Step::PutConfigType => write!(f, "put config type"),
        }
    }
}

#[derive(Debug)]
pub struct Failure {
    pub step: Step,
    pub error: BootstrapError,
}

/// Soft failures of a run.
#[derive(Debug, Default)]
pub struct Report {
    failures: Vec<Failure>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    // Log the failure and keep it for the caller.
    pub(crate) fn record(&mut self, step: Step, error: BootstrapError) {
        error!("{}: {}", step, error);
        self.failures.push(Failure { step, error });
    }

    pub(crate) fn merge(&mut self, other: Report) {
        self.failures.extend(other.failures);
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn soft failures into an error.
    pub fn into_strict(self) -> Result<()> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(BootstrapError::SoftFailures {
                count: self.failures.len(),
            })
        }
    }
}

/// Connect to the stores named in config and run the bootstrap.
pub async fn run(config: &Config) -> Result<Report> {
    let mut cache = cache::connect(&config.redis).await?;
    let store = ConsulClient::new(config.consul.addr(), config.consul.credentials())?;

    run_with(config, &mut cache, &store).await
}

/// Run the bootstrap against the given stores.
///
/// The cache is provisioned first. A failed liveness probe aborts the run
/// before the config store is touched.
pub async fn run_with<C, S>(config: &Config, cache: &mut C, store: &S) -> Result<Report>
where
    C: Cache + ?Sized,
    S: ConfigStore + ?Sized,
{
    let mut report = CacheProvisioner::from_config(config)
        .provision(cache)
        .await?;

    let publisher = ConfigPublisher::from_config(&config.consul);
    let blob = publisher.load_blob().await?;
    report.merge(publisher.publish(store, &blob).await);

    if report.is_clean() {
        info!("bootstrap completed");
    } else {
        info!(failures = report.failures().len(), "bootstrap completed with failures");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_report() {
        let report = Report::new();
        assert!(report.into_strict().is_ok());

        let mut report = Report::new();
        report.record(
            Step::AddAdmin("bob".into()),
            BootstrapError::Internal("refused".into()),
        );
        report.record(Step::PutConfig, BootstrapError::Internal("403".into()));
        assert_eq!(report.failures()[0].step, Step::AddAdmin("bob".into()));

        let err = report.into_strict().unwrap_err();
        assert!(matches!(err, BootstrapError::SoftFailures { count: 2 }));
        assert_eq!(err.exit_code(), 5);
    }
}
