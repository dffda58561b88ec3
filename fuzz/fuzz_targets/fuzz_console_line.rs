#![no_main]

use libfuzzer_sys::fuzz_target;
use stagetimer::controller::parse_command;

fuzz_target!(|data: &[u8]| {
    // Operator input is free text; parsing may fail but must not panic
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = parse_command(line);
    }
});
