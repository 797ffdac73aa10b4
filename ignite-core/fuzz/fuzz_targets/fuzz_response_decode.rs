#![no_main]

use libfuzzer_sys::fuzz_target;

use ignite_core::cache_config::CACHE_CONFIG;
use ignite_core::protocol::{decode_response, encode_response, Schema};
use ignite_core::serialization::TypeDescriptor;

fuzz_target!(|data: &[u8]| {
    let schemas = [
        Schema::empty(),
        Schema::empty().with("value", TypeDescriptor::Any),
        Schema::empty().with("data", TypeDescriptor::Map),
        Schema::empty().with("cache_names", TypeDescriptor::StringArray),
        Schema::empty().with("cache_config", TypeDescriptor::Struct(CACHE_CONFIG)),
    ];

    for schema in &schemas {
        if let Ok(response) = decode_response(schema, data) {
            // Anything that decodes must re-encode to a decodable frame.
            let bytes = encode_response(schema, &response).expect("re-encode");
            let again = decode_response(schema, &bytes).expect("decode re-encoded");
            assert_eq!(again.query_id, response.query_id);
            assert_eq!(again.status, response.status);
        }
    }
});
