#![no_main]

use libfuzzer_sys::fuzz_target;
use modelcore::TypeDescriptor;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(parsed) = TypeDescriptor::parse(input) {
            // Canonical form must parse back to the same descriptor
            let canonical = parsed.to_string();
            assert_eq!(TypeDescriptor::parse(&canonical).ok(), Some(parsed));
        }
    }
});
