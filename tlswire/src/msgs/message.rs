use crate::enums::HandshakeType;
use crate::error::{Error, InvalidMessage};
use crate::msgs::base::Payload;
use crate::msgs::codec::{Codec, Reader};
use crate::msgs::extensions::HasExtensions;
use crate::msgs::handshake::{HandshakeMessagePayload, HandshakePayload, ServerHelloPayload};
use crate::state::ConnectionState;

/// A handshake message, together with the exact bytes it was read from
/// (or encoded to).
///
/// `encoded` is what goes into the transcript; `parsed` is derived from it
/// once and never re-derived.
#[derive(Clone, Debug, PartialEq)]
pub struct HandshakeMessage {
    pub parsed: HandshakeMessagePayload,
    pub encoded: Payload,
}

impl HandshakeMessage {
    /// A whole ServerHello message is never shorter than this: the
    /// handshake header, then [`ServerHelloPayload::MIN_LEN`].
    pub const MIN_SERVER_HELLO_LEN: usize = 4 + ServerHelloPayload::MIN_LEN;

    /// Decode one whole handshake message, header included.
    ///
    /// `bytes` must be exactly the message: its declared length must match.
    /// A valid ServerHello is cross-checked and its negotiated values are
    /// committed to `state`; nothing is written to `state` on any error,
    /// or for any other message type.
    pub fn read(bytes: &[u8], state: &mut ConnectionState) -> Result<Self, Error> {
        let mut r = Reader::init(bytes);
        let parsed = HandshakeMessagePayload::read(&mut r)?;
        r.expect_empty("HandshakeMessage")?;

        match &parsed.payload {
            HandshakePayload::ServerHello(shp) => {
                shp.validate()?;
                Self::commit_server_hello(shp, bytes, state);
            }
            HandshakePayload::HelloRetryRequest(hrr) => hrr.validate()?,
            _ => {}
        }

        Ok(Self {
            parsed,
            encoded: Payload::new(bytes),
        })
    }

    /// Like [`HandshakeMessage::read`], for when a ServerHello (or
    /// HelloRetryRequest) is the only acceptable message.
    pub fn read_server_hello(bytes: &[u8], state: &mut ConnectionState) -> Result<Self, Error> {
        if bytes.len() < Self::MIN_SERVER_HELLO_LEN {
            return Err(InvalidMessage::MessageTooShort.into());
        }

        match HandshakeType::from(bytes[0]) {
            HandshakeType::ServerHello => Self::read(bytes, state),
            _ => Err(InvalidMessage::UnexpectedMessage("expected ServerHello").into()),
        }
    }

    fn commit_server_hello(shp: &ServerHelloPayload, bytes: &[u8], state: &mut ConnectionState) {
        state.record_negotiated_cipher_suite(shp.cipher_suite);
        if let Some(entry) = shp.key_share_entry() {
            state.record_server_key_share(bytes.to_vec(), entry.clone());
        }
        if let Some(index) = shp.psk_index() {
            state.record_psk_selection(index);
        }
    }

    /// The message's canonical bytes, header included.
    pub fn bytes(&self) -> &[u8] {
        self.encoded.bytes()
    }

    /// The message's type; a HelloRetryRequest is reported as such.
    pub fn typ(&self) -> HandshakeType {
        self.parsed.typ
    }
}

/// Encode a message we are about to send.
///
/// Fails if any field is too long for its length prefix.
impl TryFrom<HandshakeMessagePayload> for HandshakeMessage {
    type Error = Error;

    fn try_from(parsed: HandshakeMessagePayload) -> Result<Self, Self::Error> {
        let len = parsed.encoded_len()?;
        let encoded = parsed.get_encoding();
        debug_assert_eq!(encoded.len(), len);

        Ok(Self {
            parsed,
            encoded: Payload::new(encoded),
        })
    }
}
