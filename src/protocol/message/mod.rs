mod command;
pub(crate) use command::Command;

mod frame;
pub(crate) use frame::{frameprefix, Error as FrameError, Frame};

mod parse;
pub(crate) use parse::Reply;

pub(crate) const DELIMITER: &[u8] = b"\r\n";
