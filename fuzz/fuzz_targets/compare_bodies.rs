#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|byte| *byte == 0) else {
        return;
    };
    let (expected, actual) = data.split_at(split);
    let actual = actual.get(1..).unwrap_or_default();
    for allow_nulls in [false, true] {
        let (equal, explained) =
            ammocheck::fuzzing::compare_bodies(expected, actual, allow_nulls);
        debug_assert_eq!(equal, explained.is_none());
    }
});
