#![no_main]

use libfuzzer_sys::fuzz_target;
use lien_nullables::NullLedger;
use lien_types::Timestamp;

fuzz_target!(|data: &[u8]| {
    // Arbitrary controller messages must be answered or rejected, never panic.
    let Ok(message) = std::str::from_utf8(data) else {
        return;
    };
    let mut ledger = NullLedger::new();
    let _ = ledger
        .handler
        .receive(&mut ledger.kv, Timestamp::new(1), message);
});
