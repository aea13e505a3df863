#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate tlswire;

use tlswire::msgs::codec::Codec;
use tlswire::msgs::handshake::HandshakePayload;
use tlswire::{ConnectionState, HandshakeMessage};

fuzz_target!(|data: &[u8]| {
    let mut state = ConnectionState::new();
    let msg = match HandshakeMessage::read(data, &mut state) {
        Ok(msg) => msg,
        Err(_) => {
            assert_eq!(state, ConnectionState::new());
            return;
        }
    };

    // other messages may have had unrecognised values dropped
    let enc = msg.parsed.get_encoding();
    match &msg.parsed.payload {
        HandshakePayload::ServerHello(_) | HandshakePayload::HelloRetryRequest(_) => {
            assert_eq!(enc, data)
        }
        _ => {
            let _ = HandshakeMessage::read(&enc, &mut ConnectionState::new());
        }
    }
});
