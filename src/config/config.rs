use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Bootstrap configuration. Every key except `redis.admins` has a default.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub redis: RedisConfig,
    pub consul: ConsulConfig,
}

// Cache connection and permission data.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub database: u32,
    pub description: String,
    pub namespace: String,
    // Required. None when the key is missing or null.
    pub admins: Option<Vec<String>>,
}

impl RedisConfig {
    const DEFAULT_HOST: &'static str = "localhost";
    const DEFAULT_PORT: u16 = 6379;
    const DEFAULT_DESCRIPTION: &'static str = "Server Admins";
    const DEFAULT_NAMESPACE: &'static str = "com.aba-eve";

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Service identity used to prefix cache keys.
    pub fn service(&self) -> String {
        format!("{}.srv.perms", self.namespace)
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: RedisConfig::DEFAULT_HOST.to_owned(),
            port: RedisConfig::DEFAULT_PORT,
            password: String::new(),
            database: 0,
            description: RedisConfig::DEFAULT_DESCRIPTION.to_owned(),
            namespace: RedisConfig::DEFAULT_NAMESPACE.to_owned(),
            admins: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConsulConfig {
    pub host: String,
    pub port: u16,
    pub config: PublishConfig,
    pub credentials: Credentials,
}

impl ConsulConfig {
    const DEFAULT_HOST: &'static str = "localhost";
    const DEFAULT_PORT: u16 = 8500;

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Basic auth credentials. None unless both username and password are set.
    pub fn credentials(&self) -> Option<Credentials> {
        if self.credentials.username.is_empty() || self.credentials.password.is_empty() {
            None
        } else {
            Some(self.credentials.clone())
        }
    }
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self {
            host: ConsulConfig::DEFAULT_HOST.to_owned(),
            port: ConsulConfig::DEFAULT_PORT,
            config: PublishConfig::default(),
            credentials: Credentials::default(),
        }
    }
}

// What gets published to the config store and where.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PublishConfig {
    pub file: PathBuf,
    pub namespace: String,
}

impl PublishConfig {
    pub const DEFAULT_FILE: &'static str = "chremoas-config.yaml";
    const DEFAULT_NAMESPACE: &'static str = "chremoas-default";
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(PublishConfig::DEFAULT_FILE),
            namespace: PublishConfig::DEFAULT_NAMESPACE.to_owned(),
        }
    }
}

#[derive(Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}
