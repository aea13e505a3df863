use std::fmt;

use crate::crypto::{GetRandomFailed, SecureRandom};
use crate::enums::{CipherSuite, HandshakeType, ProtocolVersion};
use crate::error::{Error, InvalidMessage, PeerIncompatible};
#[cfg(feature = "logging")]
use crate::log::{debug, trace, warn};
use crate::msgs::base::Payload;
use crate::msgs::codec::{self, Codec, LengthPrefixedBuffer, ListLength, Reader, TlsEnum};
use crate::msgs::enums::{Compression, ExtensionType};
use crate::msgs::extensions::{
    encode_extensions, extensions_len, read_extensions, Extension, HasExtensions, KeyShare,
    KeyShareEntry, SupportedVersions,
};
use crate::rand;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Random(pub [u8; 32]);

impl fmt::Debug for Random {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::base::hex(f, &self.0)
    }
}

/// The `random` of a ServerHello that is really a HelloRetryRequest:
/// SHA-256 of "HelloRetryRequest".
pub static HELLO_RETRY_REQUEST_RANDOM: Random = Random([
    0xcf, 0x21, 0xad, 0x74, 0xe5, 0x9a, 0x61, 0x11, 0xbe, 0x1d, 0x8c, 0x02, 0x1e, 0x65, 0xb8, 0x91,
    0xc2, 0xa2, 0x11, 0x16, 0x7a, 0xbb, 0x8c, 0x5e, 0x07, 0x9e, 0x09, 0xe2, 0xc8, 0xa8, 0x33, 0x9c,
]);

impl Codec<'_> for Random {
    fn encode(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.0);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let bytes = match r.take(32) {
            Some(bytes) => bytes,
            None => return Err(InvalidMessage::MissingData("Random")),
        };

        let mut opaque = [0; 32];
        opaque.clone_from_slice(bytes);
        Ok(Self(opaque))
    }
}

impl Random {
    pub fn new(secure_random: &dyn SecureRandom) -> Result<Self, GetRandomFailed> {
        let mut data = [0u8; 32];
        secure_random.fill(&mut data)?;
        Ok(Self(data))
    }
}

impl From<[u8; 32]> for Random {
    #[inline]
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[derive(Copy, Clone)]
pub struct SessionId {
    len: usize,
    data: [u8; 32],
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::base::hex(f, self.as_ref())
    }
}

impl PartialEq for SessionId {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }

        let mut diff = 0u8;
        for i in 0..self.len {
            diff |= self.data[i] ^ other.data[i];
        }

        diff == 0u8
    }
}

impl Codec<'_> for SessionId {
    fn encode(&self, bytes: &mut Vec<u8>) {
        debug_assert!(self.len <= 32);
        bytes.push(self.len as u8);
        bytes.extend_from_slice(self.as_ref());
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let len = usize::from(u8::read(r)?);
        if len > 32 {
            return Err(InvalidMessage::TrailingData("SessionID"));
        }

        let bytes = match r.take(len) {
            Some(bytes) => bytes,
            None => return Err(InvalidMessage::MissingData("SessionID")),
        };

        let mut out = [0u8; 32];
        out[..len].clone_from_slice(bytes);
        Ok(Self { data: out, len })
    }
}

impl SessionId {
    pub fn random(secure_random: &dyn SecureRandom) -> Result<Self, GetRandomFailed> {
        let bytes = rand::random_vec(secure_random, 32)?;
        let mut data = [0u8; 32];
        data.copy_from_slice(&bytes);
        Ok(Self { data, len: 32 })
    }

    pub fn empty() -> Self {
        Self {
            data: [0u8; 32],
            len: 0,
        }
    }

    /// Use `bytes`, which must be at most 32 long.
    pub fn new(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 32 {
            return None;
        }

        let mut data = [0u8; 32];
        data[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            data,
            len: bytes.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for SessionId {
    fn as_ref(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientHelloPayload {
    pub client_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    /// Only the suites we recognize; the rest are dropped when decoding.
    pub cipher_suites: Vec<CipherSuite>,
    pub compression_methods: Vec<Compression>,
    pub extensions: Vec<Extension>,
}

impl Codec<'_> for ClientHelloPayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.client_version.encode(bytes);
        self.random.encode(bytes);
        self.session_id.encode(bytes);
        self.cipher_suites.encode(bytes);
        self.compression_methods.encode(bytes);
        encode_extensions(&self.extensions, bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let client_version = ProtocolVersion::read(r)?;
        let random = Random::read(r)?;
        let session_id = SessionId::read(r)?;
        let cipher_suites = read_offered_cipher_suites(r)?;

        let compression_methods = Vec::<Compression>::read(r)?;
        if compression_methods != [Compression::Null] {
            return Err(InvalidMessage::InvalidCompressionList);
        }

        let extensions = read_extensions(r, HandshakeType::ClientHello)?;
        if let Some(pos) = extensions
            .iter()
            .position(|ext| ext.ext_type() == ExtensionType::PreSharedKey)
        {
            if pos != extensions.len() - 1 {
                return Err(InvalidMessage::PreSharedKeyIsNotFinalExtension);
            }
        }

        r.expect_empty("ClientHelloPayload")?;

        Ok(Self {
            client_version,
            random,
            session_id,
            cipher_suites,
            compression_methods,
            extensions,
        })
    }
}

/// A client MAY offer suites we do not know: they are skipped, and only a
/// list with nothing we know is an error.  That is decided once the whole
/// list has been read.
fn read_offered_cipher_suites(r: &mut Reader<'_>) -> Result<Vec<CipherSuite>, InvalidMessage> {
    let len = ListLength::U16.read(r)?;
    let mut sub = r.sub(len)?;
    if len % CipherSuite::WIRE_LEN != 0 {
        return Err(InvalidMessage::OddListLength("CipherSuites"));
    }
    if len == 0 {
        return Err(InvalidMessage::IllegalEmptyList("CipherSuites"));
    }

    let mut suites = Vec::new();
    while sub.any_left() {
        let suite = CipherSuite::read(&mut sub)?;
        match suite.is_known() {
            true => suites.push(suite),
            false => trace!("Ignoring offered cipher suite {:?}", suite),
        }
    }

    if suites.is_empty() {
        warn!("No recognized cipher suite offered");
        return Err(InvalidMessage::UnknownCipherSuite);
    }
    Ok(suites)
}

impl HasExtensions for ClientHelloPayload {
    fn extensions(&self) -> &[Extension] {
        &self.extensions
    }
}

impl ClientHelloPayload {
    /// A TLS 1.3 ClientHello with a fresh random and a random legacy
    /// session id, as middlebox compatibility mode asks.
    /// A TLS 1.3 ServerHello with a fresh random.
    ///
    /// `session_id` must be the ClientHello's `legacy_session_id`, which
    /// the server echoes.
    pub fn new(
        secure_random: &dyn SecureRandom,
        session_id: SessionId,
        cipher_suite: CipherSuite,
        extensions: Vec<Extension>,
    ) -> Result<Self, GetRandomFailed> {
        Ok(Self {
            legacy_version: ProtocolVersion::TLSv1_2,
            random: Random::new(secure_random)?,
            session_id,
            cipher_suite,
            compression_method: Compression::Null,
            extensions,
        })
    }

    /// A HelloRetryRequest, echoing the client's `session_id` like
    /// [`ServerHelloPayload::new`].
    pub fn new_retry_request(
        session_id: SessionId,
        cipher_suite: CipherSuite,
        extensions: Vec<Extension>,
    ) -> Self {
        Self {
            legacy_version: ProtocolVersion::TLSv1_2,
            random: HELLO_RETRY_REQUEST_RANDOM,
            session_id,
            cipher_suite,
            compression_method: Compression::Null,
            extensions,
        }
    }

    pub fn is_hello_retry_request(&self) -> bool {
        self.random == HELLO_RETRY_REQUEST_RANDOM
    }

    /// The extension context: `ServerHello` or `HelloRetryRequest`.
    pub fn context(&self) -> HandshakeType {
        match self.is_hello_retry_request() {
            true => HandshakeType::HelloRetryRequest,
            false => HandshakeType::ServerHello,
        }
    }

    /// The server's key share, if it sent exactly one.
    pub fn key_share_entry(&self) -> Option<&KeyShareEntry> {
        match self.key_share()? {
            KeyShare::ServerShares(entries) if entries.len() == 1 => entries.first(),
            _ => None,
        }
    }

    /// Checks that need the whole message: extensions may come in any order.
    pub fn validate(&self) -> Result<(), PeerIncompatible> {
        match self.supported_versions() {
            Some(SupportedVersions::Selected(ProtocolVersion::TLSv1_3)) => {}
            Some(SupportedVersions::Selected(_)) => return Err(PeerIncompatible::Tls13NotSelected),
            _ => return Err(PeerIncompatible::SupportedVersionsExtensionRequired),
        }

        if self.is_hello_retry_request() {
            return Ok(());
        }

        match self.key_share() {
            Some(KeyShare::ServerShares(entries)) if entries.len() == 1 => Ok(()),
            Some(KeyShare::ServerShares(_)) => Err(PeerIncompatible::ExpectedSingleKeyShare),
            _ => Err(PeerIncompatible::KeyShareExtensionRequired),
        }
    }
}

impl Codec<'_> for ServerHelloPayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.legacy_version.encode(bytes);
        self.random.encode(bytes);
        self.session_id.encode(bytes);
        self.cipher_suite.encode(bytes);
        self.compression_method.encode(bytes);
        encode_extensions(&self.extensions, bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let legacy_version = ProtocolVersion::read(r)?;
        if legacy_version != ProtocolVersion::TLSv1_2 {
            warn!("ServerHello legacy_version {:?}", legacy_version);
            return Err(InvalidMessage::IllegalLegacyVersion);
        }

        let random = Random::read(r)?;
        let context = match random == HELLO_RETRY_REQUEST_RANDOM {
            true => {
                debug!("ServerHello is a HelloRetryRequest");
                HandshakeType::HelloRetryRequest
            }
            false => HandshakeType::ServerHello,
        };

        let session_id = SessionId::read(r)?;
        // unknown suites are only reported once the whole message has been read
        let cipher_suite = CipherSuite::read(r)?;

        let compression_method = Compression::read(r)?;
        if compression_method != Compression::Null {
            return Err(InvalidMessage::UnsupportedCompression);
        }

        let extensions = read_extensions(r, context)?;
        r.expect_empty("ServerHelloPayload")?;

        if !cipher_suite.is_known() {
            warn!("Server chose unknown cipher suite {:?}", cipher_suite);
            return Err(InvalidMessage::UnknownCipherSuite);
        }

        Ok(Self {
            legacy_version,
            random,
            session_id,
            cipher_suite,
            compression_method,
            extensions,
        })
    }
}

impl HasExtensions for ServerHelloPayload {
    fn extensions(&self) -> &[Extension] {
        &self.extensions
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum HandshakePayload {
    ClientHello(ClientHelloPayload),
    ServerHello(ServerHelloPayload),
    HelloRetryRequest(ServerHelloPayload),
    EncryptedExtensions(Vec<Extension>),
    /// A handshake message this crate does not decode.
    Unknown(Payload),
}

impl HandshakePayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        use self::HandshakePayload::*;
        match self {
            ClientHello(x) => x.encode(bytes),
            ServerHello(x) | HelloRetryRequest(x) => x.encode(bytes),
            EncryptedExtensions(x) => encode_extensions(x, bytes),
            Unknown(x) => x.encode(bytes),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandshakeMessagePayload {
    pub typ: HandshakeType,
    pub payload: HandshakePayload,
}

impl Codec<'_> for HandshakeMessagePayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        // a HelloRetryRequest travels as a ServerHello
        match self.typ {
            HandshakeType::HelloRetryRequest => HandshakeType::ServerHello,
            _ => self.typ,
        }
        .encode(bytes);

        let nested = LengthPrefixedBuffer::new(ListLength::U24, bytes);
        self.payload.encode(nested.buf);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let mut typ = HandshakeType::read(r)?;
        let len = usize::from(codec::u24::read(r)?);
        let mut sub = r.sub(len)?;

        let payload = match typ {
            HandshakeType::ClientHello => {
                HandshakePayload::ClientHello(ClientHelloPayload::read(&mut sub)?)
            }
            HandshakeType::ServerHello => {
                if sub.left() < ServerHelloPayload::MIN_LEN {
                    return Err(InvalidMessage::MessageTooShort);
                }

                let shp = ServerHelloPayload::read(&mut sub)?;
                match shp.is_hello_retry_request() {
                    true => {
                        typ = HandshakeType::HelloRetryRequest;
                        HandshakePayload::HelloRetryRequest(shp)
                    }
                    false => HandshakePayload::ServerHello(shp),
                }
            }
            HandshakeType::EncryptedExtensions => HandshakePayload::EncryptedExtensions(
                read_extensions(&mut sub, HandshakeType::EncryptedExtensions)?,
            ),
            HandshakeType::MessageHash => {
                // does not appear on the wire
                return Err(InvalidMessage::UnexpectedMessage("MessageHash"));
            }
            HandshakeType::HelloRetryRequest => {
                // not legal on wire
                return Err(InvalidMessage::UnexpectedMessage("HelloRetryRequest"));
            }
            _ => HandshakePayload::Unknown(Payload::read(&mut sub)),
        };

        sub.expect_empty("HandshakeMessagePayload")
            .map(|_| Self { typ, payload })
    }
}

impl HandshakeMessagePayload {
    pub fn server_hello(payload: ServerHelloPayload) -> Self {
        let typ = payload.context();
        let payload = match typ {
            HandshakeType::HelloRetryRequest => HandshakePayload::HelloRetryRequest(payload),
            _ => HandshakePayload::ServerHello(payload),
        };
        Self { typ, payload }
    }

    pub fn client_hello(payload: ClientHelloPayload) -> Self {
        Self {
            typ: HandshakeType::ClientHello,
            payload: HandshakePayload::ClientHello(payload),
        }
    }

    pub fn encrypted_extensions(extensions: Vec<Extension>) -> Self {
        Self {
            typ: HandshakeType::EncryptedExtensions,
            payload: HandshakePayload::EncryptedExtensions(extensions),
        }
    }

    /// The number of bytes this message encodes to, header included.
    ///
    /// Fails, without encoding anything, if some field is too long for its
    /// length prefix.
    pub fn encoded_len(&self) -> Result<usize, Error> {
        use self::HandshakePayload::*;
        let body = match &self.payload {
            ClientHello(ch) => {
                2 + 32
                    + ListLength::U8.prefixed(ch.session_id.len(), "SessionID")?
                    + ListLength::U16.prefixed(
                        ch.cipher_suites.len() * CipherSuite::WIRE_LEN,
                        "CipherSuites",
                    )?
                    + ListLength::U8.prefixed(ch.compression_methods.len(), "CompressionMethods")?
                    + extensions_len(&ch.extensions)?
            }
            ServerHello(shp) | HelloRetryRequest(shp) => {
                2 + 32
                    + ListLength::U8.prefixed(shp.session_id.len(), "SessionID")?
                    + CipherSuite::WIRE_LEN
                    + 1
                    + extensions_len(&shp.extensions)?
            }
            EncryptedExtensions(exts) => extensions_len(exts)?,
            Unknown(raw) => raw.0.len(),
        };

        Ok(1 + ListLength::U24.prefixed(body, "HandshakeMessagePayload")?)
    }
}
