use crate::enums::CipherSuite;
#[cfg(feature = "logging")]
use crate::log::trace;
use crate::msgs::extensions::KeyShareEntry;

/// What one handshake has negotiated so far.
///
/// This is owned by whatever drives the handshake and lent to
/// [`HandshakeMessage::read`][crate::HandshakeMessage::read], which only
/// writes to it once a whole message has decoded and validated.  Each field
/// is written at most once per handshake: a second write is a bug in the
/// caller, and is caught by a debug assertion rather than reported to the
/// peer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectionState {
    cipher_suite: Option<CipherSuite>,
    server_key_share: Option<KeyShareEntry>,
    server_hello: Option<Vec<u8>>,
    psk_selection: Option<u16>,
}

impl ConnectionState {
    /// Nothing negotiated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cipher suite the server chose.
    pub fn record_negotiated_cipher_suite(&mut self, suite: CipherSuite) {
        debug_assert!(
            self.cipher_suite.is_none(),
            "cipher suite recorded twice"
        );
        trace!("Negotiated cipher suite {:?}", suite);
        self.cipher_suite = Some(suite);
    }

    /// Record the server's ephemeral public key, and the exact bytes of the
    /// ServerHello that carried it (for the transcript).
    pub fn record_server_key_share(&mut self, raw_message: Vec<u8>, public_key: KeyShareEntry) {
        debug_assert!(
            self.server_key_share.is_none() && self.server_hello.is_none(),
            "server key share recorded twice"
        );
        trace!("Server key share in group {:?}", public_key.group);
        self.server_hello = Some(raw_message);
        self.server_key_share = Some(public_key);
    }

    /// Record which of the client's PSK identities the server selected.
    pub fn record_psk_selection(&mut self, index: u16) {
        debug_assert!(
            self.psk_selection.is_none(),
            "PSK selection recorded twice"
        );
        trace!("Server selected PSK identity {}", index);
        self.psk_selection = Some(index);
    }

    /// The cipher suite the server chose, once a ServerHello is accepted.
    pub fn negotiated_cipher_suite(&self) -> Option<CipherSuite> {
        self.cipher_suite
    }

    /// The server's ephemeral public key from its ServerHello.
    pub fn server_key_share(&self) -> Option<&KeyShareEntry> {
        self.server_key_share.as_ref()
    }

    /// The raw ServerHello, header included.
    pub fn server_hello_bytes(&self) -> Option<&[u8]> {
        self.server_hello.as_deref()
    }

    /// The index into the client's PSK identities that the server selected.
    ///
    /// `None` when the server did not accept a PSK.
    pub fn psk_selection(&self) -> Option<u16> {
        self.psk_selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::enums::NamedGroup;

    #[test]
    fn starts_empty() {
        let state = ConnectionState::new();
        assert_eq!(state.negotiated_cipher_suite(), None);
        assert_eq!(state.server_key_share(), None);
        assert_eq!(state.server_hello_bytes(), None);
        assert_eq!(state.psk_selection(), None);
    }

    #[test]
    fn records_once() {
        let mut state = ConnectionState::new();
        state.record_negotiated_cipher_suite(CipherSuite::TLS13_AES_128_GCM_SHA256);
        state.record_server_key_share(vec![2, 0, 0, 0], KeyShareEntry::new(NamedGroup::X25519, &[1]));
        state.record_psk_selection(1);

        assert_eq!(
            state.negotiated_cipher_suite(),
            Some(CipherSuite::TLS13_AES_128_GCM_SHA256)
        );
        assert_eq!(state.server_key_share().unwrap().group, NamedGroup::X25519);
        assert_eq!(state.server_hello_bytes(), Some(&[2u8, 0, 0, 0][..]));
        assert_eq!(state.psk_selection(), Some(1));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "PSK selection recorded twice")]
    fn second_write_is_caller_bug() {
        let mut state = ConnectionState::new();
        state.record_psk_selection(0);
        state.record_psk_selection(0);
    }
}
