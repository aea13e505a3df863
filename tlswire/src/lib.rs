//! # tlswire - the wire-format core of a TLS 1.3 handshake
//!
//! tlswire parses and serializes TLS 1.3 handshake messages and their
//! extensions as specified by [RFC 8446], checks every length and enumerated
//! value it reads, and reports failures as the alert that must be sent to the
//! peer.
//!
//! ## Current features
//!
//! * ServerHello (including HelloRetryRequest detection), ClientHello and
//!   EncryptedExtensions codecs.
//! * Extensions: `server_name`, `supported_groups`, `signature_algorithms`,
//!   `signature_algorithms_cert`, `application_layer_protocol_negotiation`,
//!   `pre_shared_key`, `supported_versions`, `cookie`,
//!   `psk_key_exchange_modes` and `key_share`.  Other extension types are
//!   kept as opaque bytes.
//! * Every decoding failure maps to an RFC 8446 alert description.
//! * Negotiated facts from a ServerHello are committed to a
//!   [`ConnectionState`] only once the whole message is valid.
//!
//! ## Non-features
//!
//! Transport I/O, record protection, the key schedule, certificate
//! validation and the handshake state machine live elsewhere; they consume
//! the messages and [`ConnectionState`] produced here.
//!
//! ## Crate features
//! Here's a list of what features are exposed by the tlswire crate and what
//! they mean.
//!
//! - `logging`: this makes the tlswire crate depend on the `log` crate.
//!   tlswire outputs interesting protocol-level messages at `trace!` and
//!   `debug!` level.  This feature is enabled by default.
//!
//! - `ring`: provides [`crypto::ring::RingRandom`], a [`crypto::SecureRandom`]
//!   backed by the operating system via *ring*.  This feature is enabled by
//!   default.
//!
//! [RFC 8446]: https://datatracker.ietf.org/doc/html/rfc8446

// Require docs for public APIs, deny unsafe code, etc.
#![forbid(unsafe_code, unused_must_use)]
#![deny(
    clippy::clone_on_ref_ptr,
    clippy::use_self,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_extern_crates
)]
#![warn(missing_docs, unreachable_pub)]
// Relax these clippy lints:
// - ptr_arg: this triggers on references to type aliases that are Vec
//   underneath.
// - single_component_path_imports: our top-level `use log` import causes
//   a false positive, https://github.com/rust-lang/rust-clippy/issues/5210
// - new_without_default: for internal constructors, the indirection is not
//   helpful
#![allow(
    clippy::ptr_arg,
    clippy::single_component_path_imports,
    clippy::new_without_default
)]
// Enable documentation for all features on docs.rs
#![cfg_attr(docsrs, feature(doc_cfg))]

// log for logging (optional).
#[cfg(feature = "logging")]
use log;

#[cfg(not(feature = "logging"))]
#[macro_use]
mod log {
    macro_rules! trace    ( ($($tt:tt)*) => {{}} );
    macro_rules! debug    ( ($($tt:tt)*) => {{}} );
    macro_rules! warn     ( ($($tt:tt)*) => {{}} );
}

#[macro_use]
pub mod msgs;
pub mod crypto;
mod enums;
mod error;
mod rand;
mod state;

pub use crate::enums::{CipherSuite, HandshakeType, ProtocolVersion, SignatureScheme};
pub use crate::error::{AlertDescription, Error, InvalidMessage, PeerIncompatible};
pub use crate::msgs::alert::AlertMessagePayload;
pub use crate::msgs::enums::{AlertLevel, ExtensionType, NamedGroup};
pub use crate::msgs::extensions::Extension;
pub use crate::msgs::message::HandshakeMessage;
pub use crate::state::ConnectionState;
