#![no_main]

use libfuzzer_sys::fuzz_target;
use reactable_core::classify::{ReactionSymbol, classify};

fuzz_target!(|data: &[u8]| {
    let Ok(key) = std::str::from_utf8(data) else {
        return;
    };
    match classify(key) {
        ReactionSymbol::CustomEmoji(id) => assert_eq!(id.to_string(), key.to_ascii_lowercase()),
        ReactionSymbol::Emoji(emoji) => assert_eq!(emoji, key),
    }
});
