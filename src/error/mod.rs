pub(crate) mod internal;

use std::fmt;
use std::path::PathBuf;

use crate::common::trace;

#[derive(Debug)]
pub enum BootstrapError {
    // Config file could not be read or parsed.
    ConfigLoad { path: PathBuf, description: String },
    // redis.admins is not set.
    MissingAdmins { path: PathBuf },
    // Connecting to the cache or the liveness probe failed.
    CacheUnavailable { addr: String, description: String },
    // Config file could not be read when publishing it.
    ConfigRead { path: PathBuf, description: String },
    // Some writes failed and strict mode was requested.
    SoftFailures { count: usize },
    Internal(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl BootstrapError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::ConfigLoad { .. } => 1,
            BootstrapError::MissingAdmins { .. } => 2,
            BootstrapError::CacheUnavailable { .. } => 3,
            BootstrapError::ConfigRead { .. } => 4,
            BootstrapError::SoftFailures { .. } => 5,
            BootstrapError::Internal(_) => 1,
        }
    }
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BootstrapError::ConfigLoad { path, description } => {
                write!(f, "fatal error config file {}: {}", path.display(), description)
            }
            BootstrapError::MissingAdmins { path } => {
                write!(f, "no redis.admins defined in {}", path.display())
            }
            BootstrapError::CacheUnavailable { addr, description } => {
                write!(f, "cache {} unavailable: {}", addr, description)
            }
            BootstrapError::ConfigRead { path, description } => {
                write!(f, "read config file {}: {}", path.display(), description)
            }
            BootstrapError::SoftFailures { count } => {
                write!(f, "{} write(s) failed", count)
            }
            BootstrapError::Internal(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for BootstrapError {}

impl From<internal::Error> for BootstrapError {
    fn from(err: internal::Error) -> Self {
        if let Some(backtrace) = err.backtrace() {
            trace!("{:?}", backtrace);
        }
        BootstrapError::Internal(Box::new(err))
    }
}
