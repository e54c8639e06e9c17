use std::fmt;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::client::Cache;
use crate::common::{debug, ErrorKind};
use crate::protocol::connection::Connection;
use crate::protocol::message::{Command, Frame, Reply};
use crate::Result;

/// Cache client speaking the redis protocol.
pub struct RedisClient<T = TcpStream> {
    connection: Connection<T>,
}

impl<T> fmt::Debug for RedisClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RedisClient").finish_non_exhaustive()
    }
}

impl RedisClient<TcpStream> {
    pub async fn from_addr(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(crate::common::Error::from)?;
        Ok(RedisClient::new(stream))
    }

    /// Connect, then authenticate when password is not empty and select
    /// database when it is not the default one.
    pub async fn connect(
        addr: impl ToSocketAddrs,
        password: &str,
        database: u32,
    ) -> Result<Self> {
        let mut client = RedisClient::from_addr(addr).await?;
        if !password.is_empty() {
            client.authenticate(password).await?;
        }
        if database != 0 {
            client.select(database).await?;
        }
        Ok(client)
    }
}

impl<T> RedisClient<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: T) -> Self {
        Self {
            connection: Connection::new(stream, Some(1024 * 4)),
        }
    }

    pub async fn authenticate(&mut self, password: &str) -> Result<()> {
        self.request(Command::Auth {
            password: password.to_owned(),
        })
        .await?
        .expect_ok()?;
        Ok(())
    }

    pub async fn select(&mut self, database: u32) -> Result<()> {
        self.request(Command::Select { database })
            .await?
            .expect_ok()?;
        Ok(())
    }

    async fn request(&mut self, command: Command) -> Result<Reply> {
        debug!(command = command.name(), "send");

        let frame: Frame = command.clone().into();
        self.connection.write_frame(&frame).await?;

        match self.connection.read_frame().await? {
            Some(frame) => Ok(Reply::new(&command, frame)),
            None => Err(crate::common::Error::from(ErrorKind::ConnectionResetByPeer).into()),
        }
    }
}

#[async_trait]
impl<T> Cache for RedisClient<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn ping(&mut self) -> Result<chrono::Duration> {
        let start = chrono::Utc::now();
        self.request(Command::Ping).await?.expect_pong()?;
        Ok(chrono::Utc::now() - start)
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.request(Command::Set {
            key: key.to_owned(),
            value: value.to_vec(),
        })
        .await?
        .expect_ok()?;
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> Result<u64> {
        let removed = self
            .request(Command::Del {
                key: key.to_owned(),
            })
            .await?
            .expect_integer()?;
        Ok(removed.max(0) as u64)
    }

    async fn add_to_set(&mut self, key: &str, member: &str) -> Result<bool> {
        let added = self
            .request(Command::Sadd {
                key: key.to_owned(),
                member: member.to_owned(),
            })
            .await?
            .expect_integer()?;
        Ok(added > 0)
    }
}
