#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;

use ignite_core::protocol::{decode_handshake_response, FrameCodec};
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut codec = FrameCodec::with_max_frame_length(1 << 20);
    let mut buf = BytesMut::from(data);

    loop {
        match codec.decode(&mut buf) {
            Ok(Some(frame)) => {
                assert!(frame.len() >= 4);
                let _ = decode_handshake_response(&frame);
            }
            Ok(None) => break,
            Err(_) => break,
        }
    }
});
