mod config;
pub use config::{Config, ConsulConfig, Credentials, PublishConfig, RedisConfig};

mod load;

pub mod env {
    pub const LOG_DIRECTIVE: &str = "CHREMOAS_BOOTSTRAP_LOG";
    pub const CONFIG_PATH: &str = "CHREMOAS_BOOTSTRAP_CONFIG";
    pub const STRICT: &str = "CHREMOAS_BOOTSTRAP_STRICT";
}
