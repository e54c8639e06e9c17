use crate::client::redis::RedisClient;
use crate::client::Cache;
use crate::common::{debug, info};
use crate::config::{Config, RedisConfig};
use crate::provision::{Report, Step};
use crate::{BootstrapError, Result};

const DESCRIPTION_KEY: &str = "description:server_admins";
const MEMBERS_KEY: &str = "members:server_admins";

/// Fully qualified cache keys for a service.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKeys {
    pub description: String,
    pub members: String,
}

impl CacheKeys {
    pub fn new(service: &str) -> Self {
        Self {
            description: format!("{}:{}", service, DESCRIPTION_KEY),
            members: format!("{}:{}", service, MEMBERS_KEY),
        }
    }
}

/// Connect to the cache described by config. Any failure is fatal.
pub async fn connect(config: &RedisConfig) -> Result<RedisClient> {
    let addr = config.addr();
    debug!(%addr, database = config.database, "connecting to cache");

    RedisClient::connect(addr.as_str(), &config.password, config.database)
        .await
        .map_err(|err| BootstrapError::CacheUnavailable {
            addr: addr.clone(),
            description: err.to_string(),
        })
}

/// Replaces the server admin set and its description in the cache.
#[derive(Debug)]
pub struct CacheProvisioner<'a> {
    addr: String,
    keys: CacheKeys,
    description: &'a str,
    admins: &'a [String],
}

impl<'a> CacheProvisioner<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            addr: config.redis.addr(),
            keys: CacheKeys::new(&config.redis.service()),
            description: &config.redis.description,
            admins: config.admins(),
        }
    }

    pub fn keys(&self) -> &CacheKeys {
        &self.keys
    }

    /// Probe the cache, then overwrite description and admin set.
    ///
    /// Only a failed probe is returned as an error. Write failures are
    /// recorded in the report and the remaining writes still run.
    pub async fn provision<C>(&self, cache: &mut C) -> Result<Report>
    where
        C: Cache + ?Sized,
    {
        let latency = cache
            .ping()
            .await
            .map_err(|err| BootstrapError::CacheUnavailable {
                addr: self.addr.clone(),
                description: err.to_string(),
            })?;
        debug!(latency_ms = latency.num_milliseconds(), "cache is alive");

        let mut report = Report::new();

        if let Err(err) = cache
            .set(&self.keys.description, self.description.as_bytes())
            .await
        {
            report.record(Step::SetDescription, err);
        }

        // Clear whatever the previous run left behind.
        if let Err(err) = cache.delete(&self.keys.members).await {
            report.record(Step::ClearAdmins, err);
        }

        for admin in self.admins {
            match cache.add_to_set(&self.keys.members, admin).await {
                Ok(_) => println!("Added {} to {}", admin, self.keys.members),
                Err(err) => report.record(Step::AddAdmin(admin.clone()), err),
            }
        }

        info!(
            admins = self.admins.len(),
            failures = report.failures().len(),
            "cache provisioned"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;
    use crate::protocol::connection::Connection;
    use crate::protocol::message::Frame;

    // Serves one client, answering AUTH with auth_reply. Returns every
    // command received until the client hangs up.
    async fn fake_cache(listener: TcpListener, auth_reply: Frame) -> Vec<Frame> {
        let (stream, _) = listener.accept().await.unwrap();
        let mut conn = Connection::new(stream, None);
        let mut got = Vec::new();

        while let Some(frame) = conn.read_frame().await.unwrap() {
            let name = match &frame {
                Frame::Array(parts) => parts.first().cloned(),
                _ => None,
            };
            let reply = match name {
                Some(Frame::Bulk(name)) if name == b"AUTH" => auth_reply.clone(),
                Some(Frame::Bulk(name)) if name == b"PING" => Frame::Simple("PONG".into()),
                _ => Frame::Simple("OK".into()),
            };
            got.push(frame);
            conn.write_frame(&reply).await.unwrap();
        }
        got
    }

    fn bulk_array(parts: &[&str]) -> Frame {
        Frame::Array(
            parts
                .iter()
                .map(|p| Frame::Bulk(p.as_bytes().to_vec()))
                .collect(),
        )
    }

    async fn local_config(password: &str, database: u32) -> (TcpListener, RedisConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = RedisConfig {
            host: "127.0.0.1".into(),
            port: listener.local_addr().unwrap().port(),
            password: password.into(),
            database,
            ..RedisConfig::default()
        };
        (listener, config)
    }

    #[test]
    fn connect_selects_database_without_auth() {
        tokio_test::block_on(async {
            let (listener, config) = local_config("", 2).await;
            let server = tokio::spawn(fake_cache(listener, Frame::Simple("OK".into())));

            let mut client = connect(&config).await.unwrap();
            client.ping().await.unwrap();
            drop(client);

            assert_eq!(
                server.await.unwrap(),
                vec![bulk_array(&["SELECT", "2"]), bulk_array(&["PING"])]
            );
        })
    }

    #[test]
    fn connect_authenticates_when_password_is_set() {
        tokio_test::block_on(async {
            let (listener, config) = local_config("hunter2", 0).await;
            let server = tokio::spawn(fake_cache(listener, Frame::Simple("OK".into())));

            let client = connect(&config).await.unwrap();
            assert_eq!(format!("{:?}", client), "RedisClient { .. }");
            drop(client);

            assert_eq!(server.await.unwrap(), vec![bulk_array(&["AUTH", "hunter2"])]);
        })
    }

    #[test]
    fn rejected_password_is_unavailable() {
        tokio_test::block_on(async {
            let (listener, config) = local_config("wrong", 2).await;
            let server = tokio::spawn(fake_cache(
                listener,
                Frame::Error("WRONGPASS invalid username-password pair".into()),
            ));

            let err = connect(&config).await.unwrap_err();
            assert!(matches!(err, BootstrapError::CacheUnavailable { .. }), "{}", err);
            assert!(err.to_string().contains("WRONGPASS"), "{}", err);
            assert_eq!(err.exit_code(), 3);

            // SELECT is never sent after a rejected AUTH.
            assert_eq!(server.await.unwrap(), vec![bulk_array(&["AUTH", "wrong"])]);
        })
    }

    #[test]
    fn keys_are_service_scoped() {
        let keys = CacheKeys::new("com.aba-eve.srv.perms");
        assert_eq!(
            keys.description,
            "com.aba-eve.srv.perms:description:server_admins"
        );
        assert_eq!(keys.members, "com.aba-eve.srv.perms:members:server_admins");
    }

    #[test]
    fn connect_refused_is_unavailable() {
        tokio_test::block_on(async {
            // Bind then drop to get a port nothing listens on.
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let port = listener.local_addr().unwrap().port();
            drop(listener);

            let config = RedisConfig {
                host: "127.0.0.1".into(),
                port,
                ..RedisConfig::default()
            };
            let err = connect(&config).await.unwrap_err();
            assert!(matches!(err, BootstrapError::CacheUnavailable { .. }), "{}", err);
            assert_eq!(err.exit_code(), 3);
        })
    }
}
