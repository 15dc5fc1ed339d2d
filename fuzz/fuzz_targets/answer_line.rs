#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Some((method, uri, status, body)) = ammocheck::fuzzing::split_answer_fields(data) {
        debug_assert!(method == b"GET" || method == b"POST");
        debug_assert!(!uri.is_empty());
        debug_assert!(status.iter().all(u8::is_ascii_digit));
        if let Some(body) = body {
            debug_assert!(!body.is_empty());
        }
    }
    if let Ok(responses) = ammocheck::fuzzing::parse_answer_corpus(data) {
        for response in &responses {
            if response.status == 200 {
                debug_assert!(!response.body.is_empty());
            }
        }
    }
});
