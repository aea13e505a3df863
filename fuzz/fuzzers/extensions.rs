#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate tlswire;

use tlswire::msgs::codec::Reader;
use tlswire::msgs::extensions::{encode_extensions, read_extensions};
use tlswire::HandshakeType;

const CONTEXTS: [HandshakeType; 4] = [
    HandshakeType::ClientHello,
    HandshakeType::ServerHello,
    HandshakeType::HelloRetryRequest,
    HandshakeType::EncryptedExtensions,
];

fuzz_target!(|data: &[u8]| {
    let (context, data) = match data.split_first() {
        Some((first, rest)) => (CONTEXTS[usize::from(*first) % CONTEXTS.len()], rest),
        None => return,
    };

    let mut rd = Reader::init(data);
    if let Ok(exts) = read_extensions(&mut rd, context) {
        let mut enc = Vec::new();
        encode_extensions(&exts, &mut enc);
        let _ = read_extensions(&mut Reader::init(&enc), context);
    }
});
