use crate::common::{ErrorKind, Result};
use crate::protocol::message::{Command, Frame};

// Interprets the reply frame to a command.
pub(crate) struct Reply {
    command: &'static str,
    frame: Frame,
}

impl Reply {
    pub(crate) fn new(command: &Command, frame: Frame) -> Self {
        Self {
            command: command.name(),
            frame,
        }
    }

    // +OK
    pub(crate) fn expect_ok(self) -> Result<()> {
        let command = self.command;
        match self.into_frame()? {
            Frame::Simple(s) if s == "OK" => Ok(()),
            frame => Err(unexpected(command, frame)),
        }
    }

    // +PONG
    pub(crate) fn expect_pong(self) -> Result<()> {
        let command = self.command;
        match self.into_frame()? {
            Frame::Simple(s) if s == "PONG" => Ok(()),
            frame => Err(unexpected(command, frame)),
        }
    }

    pub(crate) fn expect_integer(self) -> Result<i64> {
        let command = self.command;
        match self.into_frame()? {
            Frame::Integer(n) => Ok(n),
            frame => Err(unexpected(command, frame)),
        }
    }

    // Error replies surface as ErrorKind::Server.
    fn into_frame(self) -> Result<Frame> {
        match self.frame {
            Frame::Error(message) => Err(ErrorKind::Server(message).into()),
            frame => Ok(frame),
        }
    }
}

fn unexpected(command: &str, got: Frame) -> crate::common::Error {
    ErrorKind::UnexpectedResponse {
        command: command.to_owned(),
        got: got.to_string(),
    }
    .into()
}
