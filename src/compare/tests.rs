use super::*;
use crate::error::{AppError, AppResult};

const STRICT: CompareOptions = CompareOptions { allow_nulls: false };
const NULLS: CompareOptions = CompareOptions { allow_nulls: true };

fn check(expected: &str, actual: &str, options: CompareOptions, want: bool) -> AppResult<()> {
    let got = bodies_equal(expected.as_bytes(), actual.as_bytes(), options);
    if got != want {
        return Err(AppError::validation(format!(
            "compare({}, {}) with {:?} returned {}, expected {}",
            expected, actual, options, got, want
        )));
    }
    Ok(())
}

#[test]
fn extra_actual_keys_are_ignored() -> AppResult<()> {
    check(r#"{"a":1}"#, r#"{"a":1,"b":2}"#, STRICT, true)?;
    check(r#"{"a":1,"b":2}"#, r#"{"a":1}"#, STRICT, false)
}

#[test]
fn numbers_compare_within_epsilon() -> AppResult<()> {
    check(r#"{"x":1.000001}"#, r#"{"x":1.0000015}"#, STRICT, true)?;
    check(r#"{"x":1.0}"#, r#"{"x":1.1}"#, STRICT, false)?;
    check(r#"{"x":2}"#, r#"{"x":2.0}"#, STRICT, true)
}

#[test]
fn strings_compare_after_unescaping() -> AppResult<()> {
    check(r#"{"s":"café"}"#, r#"{"s":"caf\u00e9"}"#, STRICT, true)?;
    check(r#"{"s":"a\/b"}"#, r#"{"s":"a/b"}"#, STRICT, true)?;
    check(r#"{"s":"cafe"}"#, r#"{"s":"café"}"#, STRICT, false)
}

#[test]
fn nulls_require_the_allow_flag() -> AppResult<()> {
    check(r#"{"x":null}"#, r#"{"x":null}"#, STRICT, false)?;
    check(r#"{"x":null}"#, r#"{"x":null}"#, NULLS, true)?;
    check(r#"{"x":null}"#, r#"{"x":1}"#, STRICT, false)?;
    check(r#"{"x":null}"#, r#"{"x":1}"#, NULLS, false)
}

#[test]
fn arrays_require_equal_length_and_order() -> AppResult<()> {
    check(r#"{"a":[1,2]}"#, r#"{"a":[1,2]}"#, STRICT, true)?;
    check(r#"{"a":[1,2]}"#, r#"{"a":[1,2,3]}"#, STRICT, false)?;
    check(r#"{"a":[1,2]}"#, r#"{"a":[2,1]}"#, STRICT, false)?;
    check(r#"{"a":[{"id":1}]}"#, r#"{"a":[{"id":1,"extra":true}]}"#, STRICT, true)
}

#[test]
fn kind_mismatch_is_unequal() -> AppResult<()> {
    check(r#"{"x":"1"}"#, r#"{"x":1}"#, STRICT, false)?;
    check(r#"{"x":{}}"#, r#"{"x":[]}"#, STRICT, false)
}

#[test]
fn booleans_are_not_comparable() -> AppResult<()> {
    check(r#"{"x":true}"#, r#"{"x":true}"#, STRICT, false)?;
    check(r#"{"x":true}"#, r#"{"x":true}"#, NULLS, false)
}

#[test]
fn empty_expected_object_accepts_any_body() -> AppResult<()> {
    check("{}", "", STRICT, true)?;
    check("{}", "not json", STRICT, true)?;
    check("{}", r#"{"a":1}"#, STRICT, true)
}

#[test]
fn malformed_bodies_are_unequal() -> AppResult<()> {
    check("{", r#"{"a":1}"#, STRICT, false)?;
    check(r#"{"a":1}"#, "", STRICT, false)?;
    check(r#"{"a":1}"#, "[1]", STRICT, false)?;
    check("[1]", "[1]", STRICT, false)
}

#[test]
fn nested_objects_are_contained() -> AppResult<()> {
    check(
        r#"{"accounts":[{"id":1,"sname":"Ivanov"}]}"#,
        r#"{"accounts":[{"sname":"Ivanov","id":1,"email":"x@y"}]}"#,
        STRICT,
        true,
    )?;
    check(
        r#"{"accounts":[{"id":1,"sname":"Ivanov"}]}"#,
        r#"{"accounts":[{"id":1}]}"#,
        STRICT,
        false,
    )
}

#[test]
fn explain_reports_the_first_mismatch_path() -> AppResult<()> {
    let mismatch = explain_mismatch(
        br#"{"accounts":[{"id":1},{"id":2}]}"#,
        br#"{"accounts":[{"id":1},{"id":3}]}"#,
        STRICT,
    )
    .ok_or_else(|| AppError::validation("Expected a mismatch"))?;
    if mismatch.path_string() != "$.accounts[1].id" {
        return Err(AppError::validation(format!(
            "Unexpected path {}",
            mismatch.path_string()
        )));
    }
    if *mismatch.reason() != MismatchReason::ValueMismatch {
        return Err(AppError::validation(format!(
            "Unexpected reason {:?}",
            mismatch.reason()
        )));
    }
    Ok(())
}

#[test]
fn explain_reports_missing_keys_and_lengths() -> AppResult<()> {
    let missing = explain_mismatch(br#"{"a":{"b":1}}"#, br#"{"a":{}}"#, STRICT)
        .ok_or_else(|| AppError::validation("Expected a missing key"))?;
    if missing.to_string() != "$.a.b: key is missing" {
        return Err(AppError::validation(format!(
            "Unexpected rendering {}",
            missing
        )));
    }

    let length = explain_mismatch(br#"{"a":[1]}"#, br#"{"a":[1,2]}"#, STRICT)
        .ok_or_else(|| AppError::validation("Expected a length mismatch"))?;
    if *length.reason()
        != (MismatchReason::LengthMismatch {
            expected: 1,
            actual: 2,
        })
    {
        return Err(AppError::validation(format!(
            "Unexpected reason {:?}",
            length.reason()
        )));
    }
    Ok(())
}

#[test]
fn explain_agrees_with_bodies_equal() -> AppResult<()> {
    let cases: [(&str, &str); 6] = [
        (r#"{"a":1}"#, r#"{"a":1}"#),
        (r#"{"a":1}"#, r#"{"a":2}"#),
        (r#"{"a":null}"#, r#"{"a":null}"#),
        (r#"{"a":"x"}"#, r#"{"b":"x"}"#),
        ("{}", "garbage"),
        (r#"{"a":[true]}"#, r#"{"a":[true]}"#),
    ];
    for (expected, actual) in cases {
        for options in [STRICT, NULLS] {
            let equal = bodies_equal(expected.as_bytes(), actual.as_bytes(), options);
            let explained = explain_mismatch(expected.as_bytes(), actual.as_bytes(), options);
            if equal != explained.is_none() {
                return Err(AppError::validation(format!(
                    "Disagreement on {} / {}: equal={} explained={:?}",
                    expected, actual, equal, explained
                )));
            }
        }
    }
    Ok(())
}

#[test]
fn unrelated_actual_members_are_never_decoded() -> AppResult<()> {
    check(r#"{"a":1}"#, r#"{"a":1,"b":1e400}"#, STRICT, true)?;
    check(r#"{"a":1}"#, r#"{"a":1,"b":"\ud800"}"#, STRICT, true)?;
    check(r#"{"a":1}"#, "{\"a\":1,\"b\":\"x\ty\"}", STRICT, true)?;
    check(
        r#"{"a":[{"id":1}]}"#,
        "{\"a\":[{\"id\":1,\"note\":\"x\ty\"}],\"b\":1e400}",
        STRICT,
        true,
    )?;
    check(r#"{"a":2}"#, r#"{"a":1,"b":1e400}"#, STRICT, false)?;
    check(r#"{"c":1}"#, r#"{"a":1,"b":1e400}"#, STRICT, false)
}

#[test]
fn requested_members_must_still_decode() -> AppResult<()> {
    let mismatch = explain_mismatch(br#"{"b":1}"#, br#"{"a":1,"b":1e400}"#, STRICT)
        .ok_or_else(|| AppError::validation("Expected a mismatch on b"))?;
    if mismatch.to_string() != "$.b: actual body is not valid JSON" {
        return Err(AppError::validation(format!(
            "Unexpected rendering {}",
            mismatch
        )));
    }

    let kind = explain_mismatch(br#"{"b":{"c":1}}"#, br#"{"b":[1e400]}"#, STRICT)
        .ok_or_else(|| AppError::validation("Expected a kind mismatch"))?;
    if *kind.reason()
        != (MismatchReason::KindMismatch {
            expected: JsonKind::Object,
            actual: JsonKind::Array,
        })
    {
        return Err(AppError::validation(format!(
            "Unexpected reason {:?}",
            kind.reason()
        )));
    }

    match explain_mismatch(br#"{"a":1}"#, b"{\"a\":1,\"b\":", STRICT) {
        Some(truncated)
            if *truncated.reason() == (MismatchReason::Malformed { side: Side::Actual }) =>
        {
            Ok(())
        }
        other => Err(AppError::validation(format!(
            "Expected truncated body to be malformed, got {:?}",
            other
        ))),
    }
}
