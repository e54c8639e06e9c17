use std::error;
use std::fmt;
use std::io;

use backtrace::Backtrace;

#[derive(Debug)]
pub(crate) struct Error {
    kind: ErrorKind,
    backtrace: Option<Backtrace>,
}

#[derive(Debug)]
pub(crate) enum ErrorKind {
    Io(io::Error),
    Yaml(serde_yaml::Error),
    Http(reqwest::Error),
    NetworkFraming(String),
    // Error reply sent by the cache server.
    Server(String),
    // Reply was well formed but not what the command expects.
    UnexpectedResponse { command: String, got: String },
    // Config store answered with a non success status or a false body.
    Rejected { key: String, status: u16 },
    ConnectionResetByPeer,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            ErrorKind::Io(err) => fmt::Display::fmt(err, f),
            ErrorKind::Yaml(err) => write!(f, "yaml error. {}", err),
            ErrorKind::Http(err) => write!(f, "http error. {}", err),
            ErrorKind::NetworkFraming(description) => {
                write!(f, "network framing error. {}", description)
            }
            ErrorKind::Server(message) => write!(f, "server error. {}", message),
            ErrorKind::UnexpectedResponse { command, got } => {
                write!(f, "unexpected response to {}. got {}", command, got)
            }
            ErrorKind::Rejected { key, status } => {
                write!(f, "write to {} rejected (status {})", key, status)
            }
            ErrorKind::ConnectionResetByPeer => write!(f, "connection reset by peer"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::from(ErrorKind::Io(err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::from(ErrorKind::Yaml(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::from(ErrorKind::Http(err))
    }
}

impl From<crate::protocol::message::FrameError> for Error {
    fn from(err: crate::protocol::message::FrameError) -> Self {
        use crate::protocol::message::FrameError;
        match err {
            FrameError::Incomplete => {
                ErrorKind::NetworkFraming("incomplete frame".into()).into()
            }
            FrameError::Invalid(description) => ErrorKind::NetworkFraming(description).into(),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::with_backtrace(kind)
    }
}

impl Error {
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_ref()
    }

    fn with_backtrace(kind: ErrorKind) -> Self {
        Self {
            kind,
            backtrace: Some(Backtrace::new()),
        }
    }
}

impl error::Error for Error {}
