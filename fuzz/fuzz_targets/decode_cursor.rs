#![no_main]

use libfuzzer_sys::fuzz_target;
use reactable_core::pagination::cursor::CursorKey;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(key) = CursorKey::decode(token) {
        // Anything accepted must re-encode to a token that decodes the same.
        assert_eq!(CursorKey::decode(&key.encode()), Ok(key));
    }
});
