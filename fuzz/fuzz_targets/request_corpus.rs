#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(requests) = ammocheck::fuzzing::parse_request_corpus(data) {
        for request in &requests {
            debug_assert!(!request.uri.is_empty());
            debug_assert!(request.line_no > 0);
            if request.is_get {
                debug_assert!(request.body.is_empty());
            }
        }
    }
});
