use std::error::Error as StdError;
use std::fmt;

use crate::crypto::GetRandomFailed;
use crate::msgs::alert::AlertMessagePayload;
use crate::msgs::codec::{Codec, Reader};

/// tlswire reports decoding and validation problems via this type.
///
/// Every variant is terminal for the handshake: nothing is retried or
/// resumed at this layer.
#[non_exhaustive]
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// A peer sent a message that could not be decoded, or that contained
    /// a structurally valid but illegal field.
    ///
    /// This maps to a fatal alert; see [`Error::alert`].
    InvalidMessage(InvalidMessage),

    /// A message decoded, but the peer's choices are ones a TLS 1.3
    /// handshake cannot continue with.
    ///
    /// There is no alert for these at this layer: the caller decides
    /// what to send.
    PeerIncompatible(PeerIncompatible),

    /// The injected random source failed.
    FailedToGetRandomBytes,

    /// A message we were asked to encode has a field too long for its
    /// length prefix.  The argument names the field.
    ///
    /// This is a local error: nothing was sent, so there is no alert.
    EncodingTooLong(&'static str),
}

impl Error {
    /// The fatal alert to send to the peer for this error, if this layer
    /// knows it.
    pub fn alert(&self) -> Option<AlertMessagePayload> {
        AlertDescription::try_from(self)
            .ok()
            .map(AlertMessagePayload::fatal)
    }
}

/// Determine which alert should be sent for a given error.
///
/// If this mapping fails, no alert is sent.
impl TryFrom<&Error> for AlertDescription {
    type Error = ();

    fn try_from(error: &Error) -> Result<Self, Self::Error> {
        Ok(match error {
            Error::InvalidMessage(e) => Self::from(*e),
            _ => return Err(()),
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMessage(typ) => {
                write!(f, "received corrupt message of type {:?}", typ)
            }
            Self::PeerIncompatible(why) => write!(f, "peer is incompatible: {:?}", why),
            Self::FailedToGetRandomBytes => write!(f, "failed to get random bytes"),
            Self::EncodingTooLong(what) => {
                write!(f, "cannot encode {}: too long for its length prefix", what)
            }
        }
    }
}

impl StdError for Error {}

impl From<InvalidMessage> for Error {
    #[inline]
    fn from(e: InvalidMessage) -> Self {
        Self::InvalidMessage(e)
    }
}

impl From<PeerIncompatible> for Error {
    #[inline]
    fn from(e: PeerIncompatible) -> Self {
        Self::PeerIncompatible(e)
    }
}

impl From<GetRandomFailed> for Error {
    fn from(_: GetRandomFailed) -> Self {
        Self::FailedToGetRandomBytes
    }
}

enum_builder! {
    /// The `AlertDescription` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum AlertDescription {
        CloseNotify => 0x00,
        UnexpectedMessage => 0x0a,
        BadRecordMac => 0x14,
        DecryptionFailed => 0x15,
        RecordOverflow => 0x16,
        DecompressionFailure => 0x1e,
        HandshakeFailure => 0x28,
        NoCertificate => 0x29,
        BadCertificate => 0x2a,
        UnsupportedCertificate => 0x2b,
        CertificateRevoked => 0x2c,
        CertificateExpired => 0x2d,
        CertificateUnknown => 0x2e,
        IllegalParameter => 0x2f,
        UnknownCa => 0x30,
        AccessDenied => 0x31,
        DecodeError => 0x32,
        DecryptError => 0x33,
        ExportRestriction => 0x3c,
        ProtocolVersion => 0x46,
        InsufficientSecurity => 0x47,
        InternalError => 0x50,
        InappropriateFallback => 0x56,
        UserCanceled => 0x5a,
        NoRenegotiation => 0x64,
        MissingExtension => 0x6d,
        UnsupportedExtension => 0x6e,
        CertificateUnobtainable => 0x6f,
        UnrecognizedName => 0x70,
        BadCertificateStatusResponse => 0x71,
        BadCertificateHashValue => 0x72,
        UnknownPskIdentity => 0x73,
        CertificateRequired => 0x74,
        NoApplicationProtocol => 0x78,
    }
}

impl fmt::Display for AlertDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // these should be:
        // - in past tense
        // - be syntactically correct if prefaced with 'the peer' to describe
        //   received alerts
        match self {
            // this is normal.
            Self::CloseNotify => write!(f, "cleanly closed the connection"),

            // these are abnormal.  they are usually symptomatic of an interop failure.
            Self::UnexpectedMessage => write!(f, "received an unexpected message"),
            Self::BadRecordMac => write!(f, "failed to verify a message"),
            Self::RecordOverflow => write!(f, "rejected an over-length message"),
            Self::IllegalParameter => write!(
                f,
                "rejected a message because a field was incorrect or inconsistent"
            ),
            Self::DecodeError => write!(f, "failed to decode a message"),
            Self::DecryptError => {
                write!(f, "failed to perform a handshake cryptographic operation")
            }
            Self::InappropriateFallback => {
                write!(f, "detected an attempted version downgrade")
            }
            Self::MissingExtension => {
                write!(f, "required a specific extension that was not provided")
            }
            Self::UnsupportedExtension => write!(f, "rejected an unsolicited extension"),

            // these are deprecated by TLS1.3 and should be very rare
            Self::DecryptionFailed => write!(f, "failed to decrypt a message"),
            Self::DecompressionFailure => write!(f, "failed to decompress a message"),
            Self::NoCertificate => write!(f, "found no certificate"),
            Self::ExportRestriction => write!(f, "refused due to export restrictions"),
            Self::NoRenegotiation => write!(f, "rejected an attempt at renegotiation"),
            Self::CertificateUnobtainable => {
                write!(f, "failed to retrieve its certificate")
            }
            Self::BadCertificateHashValue => {
                write!(f, "rejected the `certificate_hash` extension")
            }

            // this is fairly normal. it happens if a client doesn't trust
            // a server's certificate.
            Self::BadCertificate => write!(f, "rejected the certificate as corrupt"),
            Self::UnsupportedCertificate => {
                write!(f, "did not support the certificate")
            }
            Self::CertificateRevoked => write!(f, "found the certificate to be revoked"),
            Self::CertificateExpired => write!(f, "found the certificate to be expired"),
            Self::CertificateUnknown => {
                write!(f, "rejected the certificate for an unspecified reason")
            }
            Self::UnknownCa => write!(f, "found the certificate was not issued by a trusted CA"),
            Self::BadCertificateStatusResponse => {
                write!(f, "rejected the certificate status response")
            }
            Self::AccessDenied => write!(f, "denied access"),
            Self::CertificateRequired => write!(f, "required a client certificate"),

            Self::HandshakeFailure => write!(
                f,
                "failed to negotiate an acceptable set of security parameters"
            ),
            Self::ProtocolVersion => write!(f, "did not support a suitable TLS version"),
            Self::InsufficientSecurity => {
                write!(f, "required a higher security level than was offered")
            }
            Self::InternalError => {
                write!(
                    f,
                    "encountered an unexpected error unrelated to the handshake"
                )
            }
            Self::UserCanceled => write!(f, "canceled the handshake"),
            Self::UnrecognizedName => {
                write!(f, "did not recognize a name in the `server_name` extension")
            }
            Self::UnknownPskIdentity => {
                write!(f, "did not recognize any offered PSK identity")
            }
            Self::NoApplicationProtocol => write!(
                f,
                "did not support any of the offered application protocols"
            ),
            Self::Unknown(n) => write!(f, "sent an unknown alert (0x{:02x?})", n),
        }
    }
}

/// A corrupt TLS message payload that resulted in an error.
///
/// The `&'static str` arguments name the structure being decoded.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidMessage {
    /// Message is shorter than the expected length
    MessageTooShort,
    /// Missing data for the named handshake payload value
    MissingData(&'static str),
    /// Trailing data found for the named handshake payload value
    TrailingData(&'static str),
    /// A length prefix disagrees with the length of the structure around it.
    InconsistentLength(&'static str),
    /// A list of two-byte codes had an odd length.
    OddListLength(&'static str),
    /// A peer sent an empty list of items, but a non-empty list is required.
    ///
    /// The argument names the context.
    IllegalEmptyList(&'static str),
    /// A peer sent an empty value where one is required.
    IllegalEmptyValue(&'static str),
    /// A peer sent a value outside a closed set, in a field where unknown
    /// values are not tolerated.
    UnrecognizedValue(&'static str),
    /// A peer sent an unexpected message type.
    UnexpectedMessage(&'static str),
    /// A ServerHello or ClientHello carried a legacy version other than TLS 1.2.
    IllegalLegacyVersion,
    /// No cipher suite the peer sent is one we recognize.
    UnknownCipherSuite,
    /// A peer sent a non-null compression method.
    UnsupportedCompression,
    /// A ClientHello compression method list other than exactly `[null]`.
    InvalidCompressionList,
    /// A peer sent a message where a given extension type was repeated
    DuplicateExtension(u16),
    /// A peer sent a message with a PSK offer extension in wrong position
    PreSharedKeyIsNotFinalExtension,
}

impl From<InvalidMessage> for AlertDescription {
    fn from(e: InvalidMessage) -> Self {
        match e {
            InvalidMessage::IllegalLegacyVersion
            | InvalidMessage::InvalidCompressionList
            | InvalidMessage::PreSharedKeyIsNotFinalExtension
            | InvalidMessage::DuplicateExtension(_) => Self::IllegalParameter,
            _ => Self::DecodeError,
        }
    }
}

/// The set of cases where a well-formed message makes choices that a TLS 1.3
/// handshake cannot proceed with.
///
/// This is `non_exhaustive`: we might add or stop using items here in minor
/// versions.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PeerIncompatible {
    SupportedVersionsExtensionRequired,
    Tls13NotSelected,
    KeyShareExtensionRequired,
    ExpectedSingleKeyShare,
}
