#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = dbor::decode(data) {
        // Every accepted input is a canonical encoding, so it must
        // survive a decode/encode cycle byte for byte.
        let encoded = dbor::encode(&value).expect("decoded value re-encodes");
        assert_eq!(encoded, data);
        _ = format!("{value:?}");
    }
});
