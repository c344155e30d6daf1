#![no_main]

use libfuzzer_sys::fuzz_target;
use mime_registry::parse_line;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string
    if let Ok(s) = std::str::from_utf8(data) {
        // Try to parse the line as a type definition
        let _ = parse_line("fuzz.types", 0, s);
    }
});
