use std::fmt;

use bytes::Buf;

use crate::protocol::message::DELIMITER;

// A single value of the redis serialization protocol.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Vec<u8>),
    Null,
    Array(Vec<Frame>),
}

pub(crate) mod frameprefix {
    pub(crate) const SIMPLE: u8 = b'+';
    pub(crate) const ERROR: u8 = b'-';
    pub(crate) const INTEGER: u8 = b':';
    pub(crate) const BULK: u8 = b'$';
    pub(crate) const ARRAY: u8 = b'*';
}

#[derive(Debug)]
pub(crate) enum Error {
    /// Not enough data is available to decode a frame from buffer.
    Incomplete,
    Invalid(String),
}

type ByteCursor<'a> = std::io::Cursor<&'a [u8]>;

impl Frame {
    // Check whether an entire frame can be decoded from src.
    // On success the cursor is positioned right after the frame.
    pub(crate) fn check(src: &mut ByteCursor) -> Result<(), Error> {
        match cursor::get_u8(src)? {
            frameprefix::SIMPLE | frameprefix::ERROR => {
                cursor::get_line(src)?;
                Ok(())
            }
            frameprefix::INTEGER => {
                cursor::get_signed(src)?;
                Ok(())
            }
            frameprefix::BULK => match cursor::get_signed(src)? {
                -1 => Ok(()),
                len if len >= 0 => {
                    // skip bytes length + delimiter
                    cursor::skip(src, len as usize + DELIMITER.len())
                }
                len => Err(Error::Invalid(format!("invalid bulk length {}", len))),
            },
            frameprefix::ARRAY => match cursor::get_signed(src)? {
                -1 => Ok(()),
                len if len >= 0 => {
                    for _ in 0..len {
                        Frame::check(src)?;
                    }
                    Ok(())
                }
                len => Err(Error::Invalid(format!("invalid array length {}", len))),
            },
            prefix => Err(Error::Invalid(format!(
                "unexpected frame prefix {:?}",
                prefix as char
            ))),
        }
    }

    // Decode a frame. Caller must have validated it with check first.
    pub(crate) fn parse(src: &mut ByteCursor) -> Result<Frame, Error> {
        match cursor::get_u8(src)? {
            frameprefix::SIMPLE => Ok(Frame::Simple(cursor::get_string(src)?)),
            frameprefix::ERROR => Ok(Frame::Error(cursor::get_string(src)?)),
            frameprefix::INTEGER => Ok(Frame::Integer(cursor::get_signed(src)?)),
            frameprefix::BULK => {
                let len = cursor::get_signed(src)?;
                if len == -1 {
                    return Ok(Frame::Null);
                }
                let len = usize::try_from(len)
                    .map_err(|_| Error::Invalid(format!("invalid bulk length {}", len)))?;
                let n = len + DELIMITER.len();
                if src.remaining() < n {
                    return Err(Error::Incomplete);
                }
                let value = Vec::from(&src.chunk()[..len]);

                cursor::skip(src, n)?;

                Ok(Frame::Bulk(value))
            }
            frameprefix::ARRAY => {
                let len = cursor::get_signed(src)?;
                if len == -1 {
                    return Ok(Frame::Null);
                }
                let len = usize::try_from(len)
                    .map_err(|_| Error::Invalid(format!("invalid array length {}", len)))?;
                let mut frames = Vec::with_capacity(len);
                for _ in 0..len {
                    frames.push(Frame::parse(src)?);
                }
                Ok(Frame::Array(frames))
            }
            prefix => Err(Error::Invalid(format!(
                "unexpected frame prefix {:?}",
                prefix as char
            ))),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "{}", s),
            Frame::Error(msg) => write!(f, "error: {}", msg),
            Frame::Integer(n) => write!(f, "{}", n),
            Frame::Bulk(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "(nil)"),
            Frame::Array(frames) => {
                write!(f, "[")?;
                for (i, frame) in frames.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", frame)?;
                }
                write!(f, "]")
            }
        }
    }
}

// cursor utilities.
mod cursor {
    use super::*;

    pub(super) fn get_u8(src: &mut ByteCursor) -> Result<u8, Error> {
        if !src.has_remaining() {
            return Err(Error::Incomplete);
        }
        Ok(src.get_u8())
    }

    pub(super) fn skip(src: &mut ByteCursor, n: usize) -> Result<(), Error> {
        if src.remaining() < n {
            return Err(Error::Incomplete);
        }
        src.advance(n);
        Ok(())
    }

    pub(super) fn get_signed(src: &mut ByteCursor) -> Result<i64, Error> {
        let line = get_line(src)?;

        atoi::atoi::<i64>(line)
            .ok_or_else(|| Error::Invalid("invalid protocol decimal format".into()))
    }

    pub(super) fn get_string(src: &mut ByteCursor) -> Result<String, Error> {
        let line = get_line(src)?.to_vec();
        String::from_utf8(line).map_err(|e| Error::Invalid(e.to_string()))
    }

    pub(super) fn get_line<'a>(src: &'a mut ByteCursor) -> Result<&'a [u8], Error> {
        let start = src.position() as usize;
        let len = src.get_ref().len();
        if len < 2 {
            return Err(Error::Incomplete);
        }

        for i in start..len - 1 {
            if src.get_ref()[i] == DELIMITER[0] && src.get_ref()[i + 1] == DELIMITER[1] {
                src.set_position((i + 2) as u64);

                return Ok(&src.get_ref()[start..i]);
            }
        }

        Err(Error::Incomplete)
    }
}
