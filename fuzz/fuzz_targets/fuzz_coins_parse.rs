#![no_main]

use libfuzzer_sys::fuzz_target;
use lien_types::Coins;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parsed coins print back to a string that parses to the same set.
    if let Ok(coins) = text.parse::<Coins>() {
        let printed = coins.to_string();
        assert_eq!(printed.parse::<Coins>().expect("printed coins parse"), coins);
    }
});
