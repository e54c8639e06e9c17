//! Redis serialization protocol (RESP2) as far as the bootstrap needs it.
//!
//! Only the client side is implemented: commands are written as arrays of
//! bulk strings and any reply type can be read back.

pub(crate) mod connection;

pub(crate) mod message;
