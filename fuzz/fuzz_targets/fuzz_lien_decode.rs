#![no_main]

use libfuzzer_sys::fuzz_target;
use lien_store::lien::{decode_lien, encode_lien};

fuzz_target!(|data: &[u8]| {
    // Arbitrary record bytes must decode or report corruption, never panic.
    // Anything that does decode must be a normalised, non-empty lien that
    // re-encodes to the same bytes.
    if let Ok(lien) = decode_lien(data) {
        assert!(!lien.is_empty());
        let bytes = encode_lien(&lien).expect("decoded lien re-encodes");
        assert_eq!(decode_lien(&bytes).expect("re-encoded lien decodes"), lien);
    }
});
