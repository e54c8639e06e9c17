use async_trait::async_trait;

use crate::client::ConfigStore;
use crate::common::{debug, Error, ErrorKind};
use crate::config::Credentials;
use crate::Result;

/// Config store client for the consul key value http api.
pub struct ConsulClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl ConsulClient {
    /// Construct client for `host:port`. Requests are sent with basic auth
    /// when credentials are given.
    pub fn new(addr: impl AsRef<str>, credentials: Option<Credentials>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(Error::from)?;

        Ok(Self {
            http,
            base_url: format!("http://{}", addr.as_ref()),
            credentials,
        })
    }

    fn kv_url(&self, key: &str) -> String {
        format!("{}/v1/kv/{}", self.base_url, key.trim_start_matches('/'))
    }
}

#[async_trait]
impl ConfigStore for ConsulClient {
    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let url = self.kv_url(key);
        debug!(%url, bytes = value.len(), "put");

        let mut request = self.http.put(&url).body(value.to_vec());
        if let Some(Credentials { username, password }) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(Error::from)?;
        let status = response.status();
        let body = response.text().await.map_err(Error::from)?;

        // consul answers a successful write with `true`.
        if status.is_success() && body.trim() != "false" {
            Ok(())
        } else {
            Err(Error::from(ErrorKind::Rejected {
                key: key.to_owned(),
                status: status.as_u16(),
            })
            .into())
        }
    }
}
