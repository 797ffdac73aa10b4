#![no_main]

use libfuzzer_sys::fuzz_target;

use ignite_core::serialization::decode_any;

fuzz_target!(|data: &[u8]| {
    if let Ok((_, consumed)) = decode_any(data) {
        assert!(consumed <= data.len());
    }
});
