#![no_main]

use libfuzzer_sys::fuzz_target;
use mime_registry::simplify;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string
    if let Ok(s) = std::str::from_utf8(data) {
        // Simplification must never panic and must be idempotent
        if let Some(simplified) = simplify(s) {
            assert_eq!(simplify(&simplified), Some(simplified.clone()));
        }
    }
});
