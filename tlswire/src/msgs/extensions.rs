//! Extension blocks and the decoders for each extension type.
//!
//! An extension's wire shape depends on which handshake message carries it,
//! so decoding is driven by a static table keyed by (extension type,
//! handshake context).  Types with no entry for a context are kept as
//! opaque bytes.

use std::collections::BTreeSet;

use crate::enums::{HandshakeType, ProtocolVersion, SignatureScheme};
use crate::error::{Error, InvalidMessage};
#[cfg(feature = "logging")]
use crate::log::{trace, warn};
use crate::msgs::base::{Payload, PayloadU16, PayloadU8};
use crate::msgs::codec::{Codec, LengthPrefixedBuffer, ListLength, Reader, TlsEnum, TlsListElement};
use crate::msgs::enums::{ExtensionType, NamedGroup, PskKeyExchangeMode, ServerNameType};

/// A decoded extension.
///
/// Variants whose wire shape differs between messages record which shape
/// they hold, so encoding needs no context.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum Extension {
    /// `server_name` in a ClientHello.
    ServerName(Vec<ServerName>),
    /// Empty `server_name` in EncryptedExtensions.
    ServerNameAck,
    /// `supported_groups`.  Unrecognized groups are dropped when decoding.
    NamedGroups(Vec<NamedGroup>),
    /// `signature_algorithms`.
    SignatureAlgorithms(Vec<SignatureScheme>),
    /// `signature_algorithms_cert`.
    SignatureAlgorithmsCert(Vec<SignatureScheme>),
    /// `application_layer_protocol_negotiation`.
    Protocols(Vec<ProtocolName>),
    PresharedKey(PreSharedKey),
    SupportedVersions(SupportedVersions),
    Cookie(PayloadU16),
    PresharedKeyModes(Vec<PskKeyExchangeMode>),
    KeyShare(KeyShare),
    /// Anything without a decoder for the carrying message.
    Unknown(UnknownExtension),
}

#[derive(Clone, Debug, PartialEq)]
pub enum KeyShare {
    /// ClientHello: a u16-length list of offered shares.
    ClientShares(Vec<KeyShareEntry>),
    /// ServerHello: the selected share(s), written back to back.
    ///
    /// Exactly one is legal; the count is checked once the whole
    /// ServerHello has been read.
    ServerShares(Vec<KeyShareEntry>),
    /// HelloRetryRequest: the group the client should retry with.
    SelectedGroup(NamedGroup),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SupportedVersions {
    /// ClientHello: the versions offered.
    Offered(Vec<ProtocolVersion>),
    /// ServerHello and HelloRetryRequest: the version chosen.
    Selected(ProtocolVersion),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PreSharedKey {
    Offer(PresharedKeyOffer),
    /// Index into the client's identity list.
    Selected(u16),
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnknownExtension {
    pub typ: ExtensionType,
    pub payload: Payload,
}

impl UnknownExtension {
    fn read(typ: ExtensionType, r: &mut Reader<'_>) -> Self {
        let payload = Payload::read(r);
        Self { typ, payload }
    }
}

// --- TLS 1.3 Key shares ---
#[derive(Clone, Debug, PartialEq)]
pub struct KeyShareEntry {
    pub group: NamedGroup,
    pub payload: PayloadU16,
}

impl KeyShareEntry {
    pub fn new(group: NamedGroup, payload: &[u8]) -> Self {
        Self {
            group,
            payload: PayloadU16::new(payload.to_vec()),
        }
    }
}

impl Codec<'_> for KeyShareEntry {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.group.encode(bytes);
        self.payload.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let group = NamedGroup::read(r)?;
        let payload = PayloadU16::read(r)?;
        if payload.0.is_empty() {
            return Err(InvalidMessage::IllegalEmptyValue("KeyShareEntry"));
        }

        Ok(Self { group, payload })
    }
}

impl TlsListElement for KeyShareEntry {
    const SIZE_LEN: ListLength = ListLength::U16;
}

// --- TLS 1.3 PresharedKey offers ---
#[derive(Clone, Debug, PartialEq)]
pub struct PresharedKeyIdentity {
    pub identity: PayloadU16,
    pub obfuscated_ticket_age: u32,
}

impl PresharedKeyIdentity {
    pub fn new(id: Vec<u8>, age: u32) -> Self {
        Self {
            identity: PayloadU16::new(id),
            obfuscated_ticket_age: age,
        }
    }
}

impl Codec<'_> for PresharedKeyIdentity {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.identity.encode(bytes);
        self.obfuscated_ticket_age.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        Ok(Self {
            identity: PayloadU16::read(r)?,
            obfuscated_ticket_age: u32::read(r)?,
        })
    }
}

impl TlsListElement for PresharedKeyIdentity {
    const SIZE_LEN: ListLength = ListLength::U16;
}

#[derive(Clone, Debug, PartialEq)]
pub struct PresharedKeyBinder(pub PayloadU8);

impl Codec<'_> for PresharedKeyBinder {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.0.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        Ok(Self(PayloadU8::read(r)?))
    }
}

impl TlsListElement for PresharedKeyBinder {
    const SIZE_LEN: ListLength = ListLength::U16;
}

#[derive(Clone, Debug, PartialEq)]
pub struct PresharedKeyOffer {
    pub identities: Vec<PresharedKeyIdentity>,
    pub binders: Vec<PresharedKeyBinder>,
}

impl PresharedKeyOffer {
    /// Make a new one with one entry.
    pub fn new(id: PresharedKeyIdentity, binder: Vec<u8>) -> Self {
        Self {
            identities: vec![id],
            binders: vec![PresharedKeyBinder(PayloadU8::new(binder))],
        }
    }
}

impl Codec<'_> for PresharedKeyOffer {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.identities.encode(bytes);
        self.binders.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let offer = Self {
            identities: Vec::read(r)?,
            binders: Vec::read(r)?,
        };

        if offer.identities.is_empty() {
            return Err(InvalidMessage::IllegalEmptyList("PskIdentities"));
        }
        if offer.binders.is_empty() {
            return Err(InvalidMessage::IllegalEmptyList("PskBinders"));
        }
        Ok(offer)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ServerNamePayload {
    HostName(PayloadU16),
    Unknown(Payload),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerName {
    pub typ: ServerNameType,
    pub payload: ServerNamePayload,
}

impl ServerName {
    pub fn host_name(name: &[u8]) -> Self {
        Self {
            typ: ServerNameType::HostName,
            payload: ServerNamePayload::HostName(PayloadU16::new(name.to_vec())),
        }
    }
}

impl Codec<'_> for ServerName {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.typ.encode(bytes);
        match &self.payload {
            ServerNamePayload::HostName(name) => name.encode(bytes),
            ServerNamePayload::Unknown(raw) => raw.encode(bytes),
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let typ = ServerNameType::read(r)?;

        let payload = match typ {
            ServerNameType::HostName => {
                let name = PayloadU16::read(r)?;
                if name.0.is_empty() {
                    return Err(InvalidMessage::IllegalEmptyValue("HostName"));
                }
                ServerNamePayload::HostName(name)
            }
            // an unknown name type has no known length, so it must be last
            _ => ServerNamePayload::Unknown(Payload::read(r)),
        };

        Ok(Self { typ, payload })
    }
}

impl TlsListElement for ServerName {
    const SIZE_LEN: ListLength = ListLength::U16;
}

/// An ALPN protocol name, eg. `h2`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProtocolName(pub PayloadU8);

impl From<&[u8]> for ProtocolName {
    fn from(name: &[u8]) -> Self {
        Self(PayloadU8::new(name.to_vec()))
    }
}

impl AsRef<[u8]> for ProtocolName {
    fn as_ref(&self) -> &[u8] {
        &self.0 .0
    }
}

impl Codec<'_> for ProtocolName {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.0.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let name = PayloadU8::read(r)?;
        match name.0.is_empty() {
            true => Err(InvalidMessage::IllegalEmptyValue("ProtocolName")),
            false => Ok(Self(name)),
        }
    }
}

impl TlsListElement for ProtocolName {
    const SIZE_LEN: ListLength = ListLength::U16;
}

impl Extension {
    pub fn ext_type(&self) -> ExtensionType {
        match self {
            Self::ServerName(_) | Self::ServerNameAck => ExtensionType::ServerName,
            Self::NamedGroups(_) => ExtensionType::EllipticCurves,
            Self::SignatureAlgorithms(_) => ExtensionType::SignatureAlgorithms,
            Self::SignatureAlgorithmsCert(_) => ExtensionType::SignatureAlgorithmsCert,
            Self::Protocols(_) => ExtensionType::ALProtocolNegotiation,
            Self::PresharedKey(_) => ExtensionType::PreSharedKey,
            Self::SupportedVersions(_) => ExtensionType::SupportedVersions,
            Self::Cookie(_) => ExtensionType::Cookie,
            Self::PresharedKeyModes(_) => ExtensionType::PSKKeyExchangeModes,
            Self::KeyShare(_) => ExtensionType::KeyShare,
            Self::Unknown(r) => r.typ,
        }
    }

    /// Write this extension's type, length and payload.
    pub fn encode(&self, bytes: &mut Vec<u8>) {
        self.ext_type().encode(bytes);
        let nested = LengthPrefixedBuffer::new(ListLength::U16, bytes);

        match self {
            Self::ServerName(r) => r.encode(nested.buf),
            Self::ServerNameAck => {}
            Self::NamedGroups(r) => r.encode(nested.buf),
            Self::SignatureAlgorithms(r) | Self::SignatureAlgorithmsCert(r) => {
                r.encode(nested.buf)
            }
            Self::Protocols(r) => r.encode(nested.buf),
            Self::PresharedKey(PreSharedKey::Offer(r)) => r.encode(nested.buf),
            Self::PresharedKey(PreSharedKey::Selected(r)) => r.encode(nested.buf),
            Self::SupportedVersions(SupportedVersions::Offered(r)) => r.encode(nested.buf),
            Self::SupportedVersions(SupportedVersions::Selected(r)) => r.encode(nested.buf),
            Self::Cookie(r) => r.encode(nested.buf),
            Self::PresharedKeyModes(r) => r.encode(nested.buf),
            Self::KeyShare(KeyShare::ClientShares(r)) => r.encode(nested.buf),
            Self::KeyShare(KeyShare::ServerShares(r)) => {
                for entry in r {
                    entry.encode(nested.buf);
                }
            }
            Self::KeyShare(KeyShare::SelectedGroup(r)) => r.encode(nested.buf),
            Self::Unknown(r) => r.payload.encode(nested.buf),
        }
    }

    /// The number of bytes [`Extension::encode`] writes, header included.
    ///
    /// Fails if any length prefix inside the extension, or the extension's
    /// own, would overflow.
    pub fn encoded_len(&self) -> Result<usize, Error> {
        let body = match self {
            Self::ServerName(names) => {
                let mut len = 0;
                for name in names {
                    len += 1 + match &name.payload {
                        ServerNamePayload::HostName(host) => {
                            ListLength::U16.prefixed(host.0.len(), "HostName")?
                        }
                        ServerNamePayload::Unknown(raw) => raw.0.len(),
                    };
                }
                list_len::<ServerName>(len, "ServerNames")?
            }
            Self::ServerNameAck => 0,
            Self::NamedGroups(groups) => {
                list_len::<NamedGroup>(groups.len() * NamedGroup::WIRE_LEN, "NamedGroups")?
            }
            Self::SignatureAlgorithms(schemes) | Self::SignatureAlgorithmsCert(schemes) => {
                list_len::<SignatureScheme>(
                    schemes.len() * SignatureScheme::WIRE_LEN,
                    "SignatureSchemes",
                )?
            }
            Self::Protocols(protocols) => {
                let mut len = 0;
                for protocol in protocols {
                    len += ListLength::U8.prefixed(protocol.0 .0.len(), "ProtocolName")?;
                }
                list_len::<ProtocolName>(len, "ProtocolNames")?
            }
            Self::PresharedKey(PreSharedKey::Offer(offer)) => {
                let mut identities = 0;
                for id in &offer.identities {
                    identities +=
                        ListLength::U16.prefixed(id.identity.0.len(), "PskIdentity")? + 4;
                }
                let mut binders = 0;
                for binder in &offer.binders {
                    binders += ListLength::U8.prefixed(binder.0 .0.len(), "PskBinder")?;
                }
                list_len::<PresharedKeyIdentity>(identities, "PskIdentities")?
                    + list_len::<PresharedKeyBinder>(binders, "PskBinders")?
            }
            Self::PresharedKey(PreSharedKey::Selected(_)) => 2,
            Self::SupportedVersions(SupportedVersions::Offered(versions)) => {
                list_len::<ProtocolVersion>(
                    versions.len() * ProtocolVersion::WIRE_LEN,
                    "ProtocolVersions",
                )?
            }
            Self::SupportedVersions(SupportedVersions::Selected(_)) => ProtocolVersion::WIRE_LEN,
            Self::Cookie(cookie) => ListLength::U16.prefixed(cookie.0.len(), "Cookie")?,
            Self::PresharedKeyModes(modes) => list_len::<PskKeyExchangeMode>(
                modes.len() * PskKeyExchangeMode::WIRE_LEN,
                "PskKeyExchangeModes",
            )?,
            Self::KeyShare(KeyShare::ClientShares(entries)) => {
                list_len::<KeyShareEntry>(key_share_entries_len(entries)?, "KeyShareEntries")?
            }
            Self::KeyShare(KeyShare::ServerShares(entries)) => key_share_entries_len(entries)?,
            Self::KeyShare(KeyShare::SelectedGroup(_)) => NamedGroup::WIRE_LEN,
            Self::Unknown(r) => r.payload.0.len(),
        };

        Ok(ExtensionType::WIRE_LEN + ListLength::U16.prefixed(body, "Extension")?)
    }

    /// Read one extension block as it appears in a `context` message.
    ///
    /// The block must be consumed exactly by its decoder.
    pub fn read(r: &mut Reader<'_>, context: HandshakeType) -> Result<Self, InvalidMessage> {
        let typ = ExtensionType::read(r)?;
        let len = usize::from(u16::read(r)?);
        let mut sub = r.sub(len)?;

        let ext = match decoder_for(typ, context) {
            Some(decode) => decode(&mut sub)?,
            None => {
                trace!("Keeping {:?} in {:?} as opaque bytes", typ, context);
                Self::Unknown(UnknownExtension::read(typ, &mut sub))
            }
        };

        sub.expect_empty("Extension")
            .map(|_| ext)
    }
}

type Decoder = fn(&mut Reader<'_>) -> Result<Extension, InvalidMessage>;

/// Registered decoders, by extension type and the message that carries it.
static DECODERS: &[(ExtensionType, HandshakeType, Decoder)] = &[
    (
        ExtensionType::ServerName,
        HandshakeType::ClientHello,
        read_server_name_list,
    ),
    (
        ExtensionType::ServerName,
        HandshakeType::EncryptedExtensions,
        read_server_name_ack,
    ),
    (
        ExtensionType::EllipticCurves,
        HandshakeType::ClientHello,
        read_named_groups,
    ),
    (
        ExtensionType::EllipticCurves,
        HandshakeType::EncryptedExtensions,
        read_named_groups,
    ),
    (
        ExtensionType::SignatureAlgorithms,
        HandshakeType::ClientHello,
        read_signature_algorithms,
    ),
    (
        ExtensionType::SignatureAlgorithmsCert,
        HandshakeType::ClientHello,
        read_signature_algorithms_cert,
    ),
    (
        ExtensionType::ALProtocolNegotiation,
        HandshakeType::ClientHello,
        read_protocols,
    ),
    (
        ExtensionType::ALProtocolNegotiation,
        HandshakeType::EncryptedExtensions,
        read_protocols,
    ),
    (
        ExtensionType::PreSharedKey,
        HandshakeType::ClientHello,
        read_psk_offer,
    ),
    (
        ExtensionType::PreSharedKey,
        HandshakeType::ServerHello,
        read_psk_selected,
    ),
    (
        ExtensionType::SupportedVersions,
        HandshakeType::ClientHello,
        read_versions_offered,
    ),
    (
        ExtensionType::SupportedVersions,
        HandshakeType::ServerHello,
        read_version_selected,
    ),
    (
        ExtensionType::SupportedVersions,
        HandshakeType::HelloRetryRequest,
        read_version_selected,
    ),
    (
        ExtensionType::Cookie,
        HandshakeType::ClientHello,
        read_cookie,
    ),
    (
        ExtensionType::Cookie,
        HandshakeType::HelloRetryRequest,
        read_cookie,
    ),
    (
        ExtensionType::PSKKeyExchangeModes,
        HandshakeType::ClientHello,
        read_psk_modes,
    ),
    (
        ExtensionType::KeyShare,
        HandshakeType::ClientHello,
        read_client_shares,
    ),
    (
        ExtensionType::KeyShare,
        HandshakeType::ServerHello,
        read_server_shares,
    ),
    (
        ExtensionType::KeyShare,
        HandshakeType::HelloRetryRequest,
        read_selected_group,
    ),
];

fn decoder_for(typ: ExtensionType, context: HandshakeType) -> Option<Decoder> {
    DECODERS
        .iter()
        .find(|(t, c, _)| *t == typ && *c == context)
        .map(|(_, _, decode)| *decode)
}

/// Read a length prefix which must account for everything left in `r`,
/// which is the whole extension payload.
fn read_inner_len<'a>(
    r: &mut Reader<'a>,
    size_len: ListLength,
    name: &'static str,
) -> Result<Reader<'a>, InvalidMessage> {
    let len = size_len.read(r)?;
    if len != r.left() {
        return Err(InvalidMessage::InconsistentLength(name));
    }
    r.sub(len)
}

/// What a list decoder does with a code outside its enumeration.
#[derive(Clone, Copy, Debug, PartialEq)]
enum UnknownValues {
    Keep,
    Ignore,
    Reject,
}

fn read_code_list<T>(
    r: &mut Reader<'_>,
    name: &'static str,
    unknown: UnknownValues,
) -> Result<Vec<T>, InvalidMessage>
where
    T: for<'a> Codec<'a> + TlsEnum + TlsListElement,
{
    let mut sub = read_inner_len(r, T::SIZE_LEN, name)?;
    if sub.left() % T::WIRE_LEN != 0 {
        return Err(InvalidMessage::OddListLength(name));
    }
    if !sub.any_left() {
        return Err(InvalidMessage::IllegalEmptyList(name));
    }

    let mut ret = Vec::new();
    while sub.any_left() {
        let item = T::read(&mut sub)?;
        if item.is_known() {
            ret.push(item);
            continue;
        }

        match unknown {
            UnknownValues::Keep => ret.push(item),
            UnknownValues::Ignore => trace!("Ignoring unknown value {:?} in {}", item, name),
            UnknownValues::Reject => {
                warn!("Rejecting unknown value {:?} in {}", item, name);
                return Err(InvalidMessage::UnrecognizedValue(name));
            }
        }
    }

    Ok(ret)
}

fn read_list<T>(r: &mut Reader<'_>, name: &'static str) -> Result<Vec<T>, InvalidMessage>
where
    T: for<'a> Codec<'a> + TlsListElement,
{
    let mut sub = read_inner_len(r, T::SIZE_LEN, name)?;
    if !sub.any_left() {
        return Err(InvalidMessage::IllegalEmptyList(name));
    }

    let mut ret = Vec::new();
    while sub.any_left() {
        ret.push(T::read(&mut sub)?);
    }
    Ok(ret)
}

fn read_server_name_list(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    read_list(r, "ServerNameList").map(Extension::ServerName)
}

fn read_server_name_ack(_: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    Ok(Extension::ServerNameAck)
}

fn read_named_groups(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    read_code_list(r, "NamedGroups", UnknownValues::Ignore).map(Extension::NamedGroups)
}

fn read_signature_algorithms(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    read_code_list(r, "SignatureSchemes", UnknownValues::Reject)
        .map(Extension::SignatureAlgorithms)
}

fn read_signature_algorithms_cert(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    read_code_list(r, "SignatureSchemes", UnknownValues::Reject)
        .map(Extension::SignatureAlgorithmsCert)
}

fn read_protocols(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    read_list(r, "ProtocolNames").map(Extension::Protocols)
}

fn read_psk_offer(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    PresharedKeyOffer::read(r).map(|offer| Extension::PresharedKey(PreSharedKey::Offer(offer)))
}

fn read_psk_selected(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    u16::read(r).map(|index| Extension::PresharedKey(PreSharedKey::Selected(index)))
}

fn read_versions_offered(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    read_code_list(r, "ProtocolVersions", UnknownValues::Keep)
        .map(|versions| Extension::SupportedVersions(SupportedVersions::Offered(versions)))
}

fn read_version_selected(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    ProtocolVersion::read(r)
        .map(|version| Extension::SupportedVersions(SupportedVersions::Selected(version)))
}

fn read_cookie(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    let mut sub = read_inner_len(r, ListLength::U16, "Cookie")?;
    match sub.any_left() {
        true => Ok(Extension::Cookie(PayloadU16::new(sub.rest().to_vec()))),
        false => Err(InvalidMessage::IllegalEmptyValue("Cookie")),
    }
}

fn read_psk_modes(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    read_code_list(r, "PskKeyExchangeModes", UnknownValues::Keep)
        .map(Extension::PresharedKeyModes)
}

fn read_client_shares(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    // an empty list is legal: the client asks the server to pick a group
    let mut sub = read_inner_len(r, ListLength::U16, "KeyShareEntries")?;
    let mut shares = Vec::new();
    while sub.any_left() {
        shares.push(KeyShareEntry::read(&mut sub)?);
    }
    Ok(Extension::KeyShare(KeyShare::ClientShares(shares)))
}

fn read_server_shares(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    let mut shares = Vec::new();
    while r.any_left() {
        shares.push(KeyShareEntry::read(r)?);
    }
    Ok(Extension::KeyShare(KeyShare::ServerShares(shares)))
}

fn read_selected_group(r: &mut Reader<'_>) -> Result<Extension, InvalidMessage> {
    NamedGroup::read(r).map(|group| Extension::KeyShare(KeyShare::SelectedGroup(group)))
}

/// Read a u16-length block of extensions carried by a `context` message.
///
/// Wire order is preserved.  A type appearing twice is an error.
pub fn read_extensions(
    r: &mut Reader<'_>,
    context: HandshakeType,
) -> Result<Vec<Extension>, InvalidMessage> {
    let len = usize::from(u16::read(r)?);
    let mut sub = r.sub(len)?;

    let mut seen = BTreeSet::new();
    let mut exts = Vec::new();
    while sub.any_left() {
        let ext = Extension::read(&mut sub, context)?;
        let typ = u16::from(ext.ext_type());
        if !seen.insert(typ) {
            warn!("Duplicate extension {:?} in {:?}", ext.ext_type(), context);
            return Err(InvalidMessage::DuplicateExtension(typ));
        }
        exts.push(ext);
    }

    Ok(exts)
}

/// The number of bytes [`encode_extensions`] writes for `exts`, length
/// prefix included.
///
/// Fails if any extension, or the block as a whole, is too long to encode.
pub fn extensions_len(exts: &[Extension]) -> Result<usize, Error> {
    let mut len = 0;
    for ext in exts {
        len += ext.encoded_len()?;
    }
    ListLength::U16.prefixed(len, "Extensions")
}

fn list_len<T: TlsListElement>(len: usize, what: &'static str) -> Result<usize, Error> {
    T::SIZE_LEN.prefixed(len, what)
}

fn key_share_entries_len(entries: &[KeyShareEntry]) -> Result<usize, Error> {
    let mut len = 0;
    for entry in entries {
        len += NamedGroup::WIRE_LEN
            + ListLength::U16.prefixed(entry.payload.0.len(), "KeyShareEntry")?;
    }
    Ok(len)
}

/// Write `exts` as a u16-length block.
///
/// Check [`extensions_len`] first: an over-long block cannot be encoded.
pub fn encode_extensions(exts: &[Extension], bytes: &mut Vec<u8>) {
    let nested = LengthPrefixedBuffer::new(ListLength::U16, bytes);
    for ext in exts {
        ext.encode(nested.buf);
    }
}

/// Lookups over a message's extensions.
pub trait HasExtensions {
    fn extensions(&self) -> &[Extension];

    fn find_extension(&self, ext: ExtensionType) -> Option<&Extension> {
        self.extensions()
            .iter()
            .find(|x| x.ext_type() == ext)
    }

    fn supported_versions(&self) -> Option<&SupportedVersions> {
        match self.find_extension(ExtensionType::SupportedVersions)? {
            Extension::SupportedVersions(versions) => Some(versions),
            _ => None,
        }
    }

    fn key_share(&self) -> Option<&KeyShare> {
        match self.find_extension(ExtensionType::KeyShare)? {
            Extension::KeyShare(share) => Some(share),
            _ => None,
        }
    }

    fn psk_index(&self) -> Option<u16> {
        match self.find_extension(ExtensionType::PreSharedKey)? {
            Extension::PresharedKey(PreSharedKey::Selected(index)) => Some(*index),
            _ => None,
        }
    }

    fn cookie(&self) -> Option<&[u8]> {
        match self.find_extension(ExtensionType::Cookie)? {
            Extension::Cookie(cookie) => Some(&cookie.0),
            _ => None,
        }
    }

    fn signature_algorithms(&self) -> Option<&[SignatureScheme]> {
        match self.find_extension(ExtensionType::SignatureAlgorithms)? {
            Extension::SignatureAlgorithms(schemes) => Some(schemes),
            _ => None,
        }
    }

    fn alpn_protocols(&self) -> Option<&[ProtocolName]> {
        match self.find_extension(ExtensionType::ALProtocolNegotiation)? {
            Extension::Protocols(protocols) => Some(protocols),
            _ => None,
        }
    }
}

impl HasExtensions for Vec<Extension> {
    fn extensions(&self) -> &[Extension] {
        self
    }
}
