#![allow(clippy::module_inception)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
mod protocol;
pub mod provision;

pub use crate::error::BootstrapError;
pub type Result<T, E = crate::error::BootstrapError> = std::result::Result<T, E>;

pub(crate) mod common {
    pub(crate) type Result<T, E = crate::error::internal::Error> = std::result::Result<T, E>;

    pub(crate) type Error = crate::error::internal::Error;
    pub(crate) type ErrorKind = crate::error::internal::ErrorKind;

    pub use tracing::{debug, error, info, trace, warn};
}
