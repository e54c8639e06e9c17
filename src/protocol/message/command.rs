use crate::protocol::message::Frame;

// Commands the client sends to the cache server.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Auth { password: String },
    Select { database: u32 },
    Ping,
    Set { key: String, value: Vec<u8> },
    Del { key: String },
    Sadd { key: String, member: String },
}

impl Command {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Command::Auth { .. } => "AUTH",
            Command::Select { .. } => "SELECT",
            Command::Ping => "PING",
            Command::Set { .. } => "SET",
            Command::Del { .. } => "DEL",
            Command::Sadd { .. } => "SADD",
        }
    }
}

impl From<Command> for Frame {
    fn from(command: Command) -> Self {
        let mut parts: Vec<Vec<u8>> = vec![command.name().into()];

        match command {
            Command::Auth { password } => parts.push(password.into_bytes()),
            Command::Select { database } => parts.push(database.to_string().into_bytes()),
            Command::Ping => (),
            Command::Set { key, value } => {
                parts.push(key.into_bytes());
                parts.push(value);
            }
            Command::Del { key } => parts.push(key.into_bytes()),
            Command::Sadd { key, member } => {
                parts.push(key.into_bytes());
                parts.push(member.into_bytes());
            }
        }

        Frame::Array(parts.into_iter().map(Frame::Bulk).collect())
    }
}
