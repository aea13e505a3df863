#![allow(missing_docs)]
//! Handshake messages, their extensions, and the wire primitives they are
//! built from.
//!
//! Everything in here decodes untrusted input.  Decoding never panics: every
//! failure is an [`InvalidMessage`][crate::InvalidMessage], which maps onto
//! the alert to send to the peer.

#[macro_use]
mod macros;

pub mod alert;
pub mod base;
pub mod codec;
pub mod enums;
pub mod extensions;
pub mod handshake;
pub mod message;


#[cfg(test)]
mod handshake_test;
