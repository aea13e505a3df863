use super::base::Payload;
use super::codec::{Codec, Reader};
use super::enums::{Compression, NamedGroup};
use super::extensions::{
    Extension, HasExtensions, KeyShare, KeyShareEntry, PreSharedKey, PresharedKeyIdentity,
    PresharedKeyOffer, SupportedVersions,
};
use super::handshake::{
    ClientHelloPayload, HandshakeMessagePayload, HandshakePayload, Random, ServerHelloPayload,
    SessionId, HELLO_RETRY_REQUEST_RANDOM,
};
use crate::crypto::testing::{FailingRandom, FixedRandom};
use crate::crypto::GetRandomFailed;
use crate::enums::{CipherSuite, HandshakeType, ProtocolVersion, SignatureScheme};
use crate::error::{AlertDescription, Error, InvalidMessage, PeerIncompatible};

#[test]
fn rejects_short_random() {
    let bytes = [0x01; 31];
    let mut rd = Reader::init(&bytes);
    assert_eq!(
        Random::read(&mut rd),
        Err(InvalidMessage::MissingData("Random"))
    );
}

#[test]
fn reads_random() {
    let bytes = [0x01; 32];
    let mut rd = Reader::init(&bytes);
    let rnd = Random::read(&mut rd).unwrap();
    println!("{rnd:?}");

    assert!(!rd.any_left());
}

#[test]
fn debug_random() {
    assert_eq!(
        "0101010101010101010101010101010101010101010101010101010101010101",
        format!("{:?}", Random::from([1; 32]))
    );
}

#[test]
fn random_from_secure_random() {
    let rnd = Random::new(&FixedRandom).unwrap();
    assert_eq!(&rnd.0[..8], b"RandRand");
    assert_eq!(Random::new(&FailingRandom), Err(GetRandomFailed));
}

#[test]
fn rejects_truncated_session_id() {
    let bytes = [32; 32];
    let mut rd = Reader::init(&bytes);
    assert_eq!(
        SessionId::read(&mut rd),
        Err(InvalidMessage::MissingData("SessionID"))
    );
}

#[test]
fn rejects_session_id_with_bad_length() {
    let bytes = [33; 33];
    let mut rd = Reader::init(&bytes);
    assert!(SessionId::read(&mut rd).is_err());
}

#[test]
fn session_id_with_different_lengths_are_unequal() {
    let a = SessionId::read(&mut Reader::init(&[1u8, 1])).unwrap();
    let b = SessionId::read(&mut Reader::init(&[2u8, 1, 2])).unwrap();
    assert_ne!(a, b);
}

#[test]
fn accepts_short_session_id() {
    let bytes = [1; 2];
    let mut rd = Reader::init(&bytes);
    let sess = SessionId::read(&mut rd).unwrap();
    println!("{sess:?}");

    assert!(!sess.is_empty());
    assert_eq!(sess.len(), 1);
    assert!(!rd.any_left());
}

#[test]
fn accepts_empty_session_id() {
    let bytes = [0; 1];
    let mut rd = Reader::init(&bytes);
    let sess = SessionId::read(&mut rd).unwrap();
    println!("{sess:?}");

    assert!(sess.is_empty());
    assert_eq!(sess.len(), 0);
    assert_eq!(sess, SessionId::empty());
    assert!(!rd.any_left());
}

#[test]
fn debug_session_id() {
    let bytes = [
        32, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
        1, 1, 1,
    ];
    let mut rd = Reader::init(&bytes);
    let sess = SessionId::read(&mut rd).unwrap();
    assert_eq!(
        "0101010101010101010101010101010101010101010101010101010101010101",
        format!("{sess:?}")
    );
}

#[test]
fn session_id_constructors() {
    assert!(SessionId::new(&[0; 33]).is_none());
    let sess = SessionId::new(&[7; 3]).unwrap();
    assert_eq!(sess.as_ref(), &[7, 7, 7]);
    assert_eq!(sess.get_encoding(), vec![3, 7, 7, 7]);

    let sess = SessionId::random(&FixedRandom).unwrap();
    assert_eq!(sess.len(), 32);
    assert_eq!(SessionId::random(&FailingRandom), Err(GetRandomFailed));
}

fn sample_client_hello() -> ClientHelloPayload {
    ClientHelloPayload::new(
        &FixedRandom,
        vec![
            CipherSuite::TLS13_AES_128_GCM_SHA256,
            CipherSuite::TLS13_CHACHA20_POLY1305_SHA256,
        ],
        vec![
            Extension::SupportedVersions(SupportedVersions::Offered(vec![
                ProtocolVersion::TLSv1_3,
            ])),
            Extension::NamedGroups(vec![NamedGroup::X25519]),
            Extension::SignatureAlgorithms(vec![SignatureScheme::ED25519]),
            Extension::KeyShare(KeyShare::ClientShares(vec![KeyShareEntry::new(
                NamedGroup::X25519,
                &[0x42; 32],
            )])),
            Extension::PresharedKey(PreSharedKey::Offer(PresharedKeyOffer::new(
                PresharedKeyIdentity::new(vec![3, 4, 5], 123456),
                vec![1, 2, 3],
            ))),
        ],
    )
    .unwrap()
}

/// Hand-assemble a ClientHello body with the given cipher suite list,
/// compression list, and extension block bytes.
fn client_hello_body(suites: &[u16], compression: &[u8], extensions: &[u8]) -> Vec<u8> {
    let mut body = vec![0x03, 0x03];
    body.extend_from_slice(&[0x11; 32]);
    body.push(0);

    ((suites.len() * 2) as u16).encode(&mut body);
    for suite in suites {
        suite.encode(&mut body);
    }

    body.push(compression.len() as u8);
    body.extend_from_slice(compression);
    body.extend_from_slice(extensions);
    body
}

#[test]
fn client_hello_round_trips() {
    let ch = sample_client_hello();
    let bytes = ch.get_encoding();
    let back = ClientHelloPayload::read(&mut Reader::init(&bytes)).unwrap();

    assert_eq!(back, ch);
    assert_eq!(back.get_encoding(), bytes);
    assert_eq!(
        back.signature_algorithms(),
        Some(&[SignatureScheme::ED25519][..])
    );
}

#[test]
fn client_hello_construction_needs_randomness() {
    assert_eq!(
        ClientHelloPayload::new(&FailingRandom, vec![], vec![]),
        Err(GetRandomFailed)
    );
}

#[test]
fn client_hello_drops_unknown_cipher_suites() {
    let body = client_hello_body(&[0x0a0a, 0xfefe, 0x1301, 0x5a5a], &[0], &[0, 0]);
    let ch = ClientHelloPayload::read(&mut Reader::init(&body)).unwrap();
    assert_eq!(
        ch.cipher_suites,
        vec![CipherSuite::TLS13_AES_128_GCM_SHA256]
    );
}

#[test]
fn client_hello_refuses_only_unknown_cipher_suites() {
    let body = client_hello_body(&[0x0a0a, 0xfefe], &[0], &[0, 0]);
    let err = ClientHelloPayload::read(&mut Reader::init(&body)).unwrap_err();
    assert_eq!(err, InvalidMessage::UnknownCipherSuite);
    assert_eq!(AlertDescription::from(err), AlertDescription::DecodeError);
}

#[test]
fn client_hello_refuses_bad_cipher_suite_lists() {
    let body = client_hello_body(&[], &[0], &[0, 0]);
    assert_eq!(
        ClientHelloPayload::read(&mut Reader::init(&body)),
        Err(InvalidMessage::IllegalEmptyList("CipherSuites"))
    );

    let mut body = client_hello_body(&[0x1301], &[0], &[0, 0]);
    // make the suite list three bytes long
    body[35..37].copy_from_slice(&[0x00, 0x03]);
    body.insert(39, 0x13);
    assert_eq!(
        ClientHelloPayload::read(&mut Reader::init(&body)),
        Err(InvalidMessage::OddListLength("CipherSuites"))
    );
}

#[test]
fn client_hello_requires_null_compression_only() {
    let lists: [&[u8]; 4] = [&[], &[1], &[0, 1], &[1, 0]];
    for compression in lists {
        let body = client_hello_body(&[0x1301], compression, &[0, 0]);
        let err = ClientHelloPayload::read(&mut Reader::init(&body)).unwrap_err();
        assert_eq!(err, InvalidMessage::InvalidCompressionList);
        assert_eq!(
            AlertDescription::from(err),
            AlertDescription::IllegalParameter
        );
    }
}

#[test]
fn client_hello_psk_must_be_last() {
    let mut ch = sample_client_hello();
    let psk = ch.extensions.pop().unwrap();
    ch.extensions.insert(0, psk);

    let bytes = ch.get_encoding();
    let err = ClientHelloPayload::read(&mut Reader::init(&bytes)).unwrap_err();
    assert_eq!(err, InvalidMessage::PreSharedKeyIsNotFinalExtension);
    assert_eq!(
        AlertDescription::from(err),
        AlertDescription::IllegalParameter
    );
}

#[test]
fn client_hello_refuses_trailing_data() {
    let mut bytes = sample_client_hello().get_encoding();
    bytes.push(0);
    assert_eq!(
        ClientHelloPayload::read(&mut Reader::init(&bytes)),
        Err(InvalidMessage::TrailingData("ClientHelloPayload"))
    );
}

fn sample_server_hello() -> ServerHelloPayload {
    ServerHelloPayload::new(
        &FixedRandom,
        sample_client_hello().session_id,
        CipherSuite::TLS13_AES_256_GCM_SHA384,
        vec![
            Extension::KeyShare(KeyShare::ServerShares(vec![KeyShareEntry::new(
                NamedGroup::X25519,
                &[0x24; 32],
            )])),
            Extension::SupportedVersions(SupportedVersions::Selected(ProtocolVersion::TLSv1_3)),
        ],
    )
    .unwrap()
}

#[test]
fn server_hello_round_trips() {
    let shp = sample_server_hello();
    let bytes = shp.get_encoding();
    let back = ServerHelloPayload::read(&mut Reader::init(&bytes)).unwrap();

    assert_eq!(back, shp);
    assert!(!back.is_hello_retry_request());
    assert_eq!(back.context(), HandshakeType::ServerHello);
    assert_eq!(back.key_share_entry().unwrap().group, NamedGroup::X25519);
    assert_eq!(back.validate(), Ok(()));
}

#[test]
fn server_hello_echoes_client_session_id() {
    let ch = sample_client_hello();
    assert_eq!(ch.session_id.len(), 32);

    let shp = sample_server_hello();
    assert_eq!(shp.session_id, ch.session_id);

    let bytes = shp.get_encoding();
    assert_eq!(bytes[34], 32);
    assert_eq!(&bytes[35..67], ch.session_id.as_ref());
    let back = ServerHelloPayload::read(&mut Reader::init(&bytes)).unwrap();
    assert_eq!(back.session_id, ch.session_id);

    let hrr = ServerHelloPayload::new_retry_request(
        ch.session_id,
        CipherSuite::TLS13_AES_128_GCM_SHA256,
        vec![],
    );
    assert_eq!(hrr.session_id, ch.session_id);
}

#[test]
fn server_hello_refuses_other_legacy_versions() {
    let mut shp = sample_server_hello();
    shp.legacy_version = ProtocolVersion::TLSv1_3;

    let bytes = shp.get_encoding();
    let err = ServerHelloPayload::read(&mut Reader::init(&bytes)).unwrap_err();
    assert_eq!(err, InvalidMessage::IllegalLegacyVersion);
    assert_eq!(
        AlertDescription::from(err),
        AlertDescription::IllegalParameter
    );
}

#[test]
fn server_hello_refuses_compression() {
    let mut shp = sample_server_hello();
    shp.compression_method = Compression::Deflate;

    let bytes = shp.get_encoding();
    let err = ServerHelloPayload::read(&mut Reader::init(&bytes)).unwrap_err();
    assert_eq!(err, InvalidMessage::UnsupportedCompression);
    assert_eq!(AlertDescription::from(err), AlertDescription::DecodeError);
}

#[test]
fn server_hello_unknown_suite_is_reported_after_extensions() {
    let mut shp = sample_server_hello();
    shp.cipher_suite = CipherSuite::Unknown(0x00ff);

    let bytes = shp.get_encoding();
    assert_eq!(
        ServerHelloPayload::read(&mut Reader::init(&bytes)),
        Err(InvalidMessage::UnknownCipherSuite)
    );

    // a framing error later in the message wins
    let mut truncated = bytes.clone();
    truncated.pop();
    assert_eq!(
        ServerHelloPayload::read(&mut Reader::init(&truncated)),
        Err(InvalidMessage::MessageTooShort)
    );
}

#[test]
fn server_hello_validation() {
    let mut shp = sample_server_hello();
    shp.extensions.pop();
    assert_eq!(
        shp.validate(),
        Err(PeerIncompatible::SupportedVersionsExtensionRequired)
    );

    let mut shp = sample_server_hello();
    shp.extensions[1] =
        Extension::SupportedVersions(SupportedVersions::Selected(ProtocolVersion::TLSv1_2));
    assert_eq!(shp.validate(), Err(PeerIncompatible::Tls13NotSelected));

    let mut shp = sample_server_hello();
    shp.extensions.remove(0);
    assert_eq!(
        shp.validate(),
        Err(PeerIncompatible::KeyShareExtensionRequired)
    );

    let mut shp = sample_server_hello();
    shp.extensions[0] = Extension::KeyShare(KeyShare::ServerShares(vec![]));
    assert_eq!(shp.validate(), Err(PeerIncompatible::ExpectedSingleKeyShare));
    assert_eq!(shp.key_share_entry(), None);

    let mut shp = sample_server_hello();
    shp.extensions[0] = Extension::KeyShare(KeyShare::ServerShares(vec![
        KeyShareEntry::new(NamedGroup::X25519, &[1]),
        KeyShareEntry::new(NamedGroup::secp256r1, &[2]),
    ]));
    assert_eq!(shp.validate(), Err(PeerIncompatible::ExpectedSingleKeyShare));
}

#[test]
fn hello_retry_request_is_detected_by_random() {
    let hrr = ServerHelloPayload::new_retry_request(
        SessionId::empty(),
        CipherSuite::TLS13_AES_128_GCM_SHA256,
        vec![
            Extension::SupportedVersions(SupportedVersions::Selected(ProtocolVersion::TLSv1_3)),
            Extension::KeyShare(KeyShare::SelectedGroup(NamedGroup::secp256r1)),
        ],
    );
    assert_eq!(hrr.random, HELLO_RETRY_REQUEST_RANDOM);
    assert_eq!(hrr.validate(), Ok(()));

    let msg = HandshakeMessagePayload::server_hello(hrr.clone());
    assert_eq!(msg.typ, HandshakeType::HelloRetryRequest);

    let bytes = msg.get_encoding();
    assert_eq!(bytes[0], u8::from(HandshakeType::ServerHello));

    let back = HandshakeMessagePayload::read(&mut Reader::init(&bytes)).unwrap();
    assert_eq!(back.typ, HandshakeType::HelloRetryRequest);
    assert_eq!(back.payload, HandshakePayload::HelloRetryRequest(hrr));
}

#[test]
fn hello_retry_request_random_bytes() {
    assert_eq!(
        format!("{HELLO_RETRY_REQUEST_RANDOM:?}"),
        "cf21ad74e59a6111be1d8c021e65b891c2a211167abb8c5e079e09e2c8a8339c"
    );
}

#[test]
fn handshake_header_length_must_match() {
    let mut bytes = HandshakeMessagePayload::server_hello(sample_server_hello()).get_encoding();

    bytes.push(0);
    let msg = HandshakeMessagePayload::read(&mut Reader::init(&bytes)).unwrap();
    assert_eq!(
        msg.payload,
        HandshakePayload::ServerHello(sample_server_hello())
    );

    // claim one more byte than the body holds
    bytes[3] += 1;
    assert_eq!(
        HandshakeMessagePayload::read(&mut Reader::init(&bytes)),
        Err(InvalidMessage::TrailingData("ServerHelloPayload"))
    );

    bytes.truncate(bytes.len() - 2);
    bytes[3] -= 1;
    assert!(HandshakeMessagePayload::read(&mut Reader::init(&bytes)).is_err());
}

#[test]
fn short_server_hello_body_is_refused_early() {
    let mut bytes = vec![0x02, 0x00, 0x00, 0x27];
    bytes.extend_from_slice(&[0; 0x27]);
    assert_eq!(
        HandshakeMessagePayload::read(&mut Reader::init(&bytes)),
        Err(InvalidMessage::MessageTooShort)
    );
}

#[test]
fn wire_only_handshake_types() {
    for typ in [0xfe, 0x06] {
        let bytes = [typ, 0x00, 0x00, 0x00];
        let err = HandshakeMessagePayload::read(&mut Reader::init(&bytes)).unwrap_err();
        assert!(matches!(err, InvalidMessage::UnexpectedMessage(_)));
    }
}

#[test]
fn other_handshake_types_are_opaque() {
    let bytes = [0x0b, 0x00, 0x00, 0x02, 0xaa, 0xbb];
    let msg = HandshakeMessagePayload::read(&mut Reader::init(&bytes)).unwrap();
    assert_eq!(msg.typ, HandshakeType::Certificate);
    assert_eq!(
        msg.payload,
        HandshakePayload::Unknown(Payload::new([0xaa, 0xbb]))
    );
    assert_eq!(msg.get_encoding(), bytes.to_vec());
}

#[test]
fn encrypted_extensions_round_trip() {
    let msg = HandshakeMessagePayload::encrypted_extensions(vec![
        Extension::ServerNameAck,
        Extension::Protocols(vec![b"h2"[..].into()]),
    ]);
    let bytes = msg.get_encoding();
    assert_eq!(
        HandshakeMessagePayload::read(&mut Reader::init(&bytes)).unwrap(),
        msg
    );
}

#[test]
fn encoded_len_matches_encoding() {
    let hrr = ServerHelloPayload::new_retry_request(
        SessionId::empty(),
        CipherSuite::TLS13_AES_128_GCM_SHA256,
        vec![Extension::KeyShare(KeyShare::SelectedGroup(
            NamedGroup::secp256r1,
        ))],
    );

    for msg in [
        HandshakeMessagePayload::client_hello(sample_client_hello()),
        HandshakeMessagePayload::server_hello(sample_server_hello()),
        HandshakeMessagePayload::server_hello(hrr),
        HandshakeMessagePayload::encrypted_extensions(vec![Extension::ServerNameAck]),
        HandshakeMessagePayload {
            typ: HandshakeType::Certificate,
            payload: HandshakePayload::Unknown(Payload::new([0xaa; 10])),
        },
    ] {
        assert_eq!(msg.encoded_len(), Ok(msg.get_encoding().len()));
    }
}

#[test]
fn encoded_len_refuses_oversized_client_hello() {
    let mut ch = sample_client_hello();
    ch.cipher_suites = vec![CipherSuite::TLS13_AES_128_GCM_SHA256; 0x8000];
    assert_eq!(
        HandshakeMessagePayload::client_hello(ch).encoded_len(),
        Err(Error::EncodingTooLong("CipherSuites"))
    );

    let mut ch = sample_client_hello();
    ch.extensions[3] = Extension::KeyShare(KeyShare::ClientShares(vec![KeyShareEntry::new(
        NamedGroup::X25519,
        &[0x42; 0x1_0000],
    )]));
    assert_eq!(
        HandshakeMessagePayload::client_hello(ch).encoded_len(),
        Err(Error::EncodingTooLong("KeyShareEntry"))
    );
}
