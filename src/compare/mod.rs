//! Semantic JSON comparison of an expected answer body against the body the
//! server actually returned.
//!
//! The comparison is asymmetric for objects: every key of the expected
//! object must be present in the actual one with an equal value, while extra
//! actual keys are ignored. Arrays must match positionally, numbers within
//! [`NUMBER_EPSILON`], strings after escape decoding. Nulls only match when
//! [`CompareOptions::allow_nulls`] is set; booleans are never accepted.
//!
//! Only the parts of the actual body named by the expected one must decode.
//! When the strict parser rejects the actual body, members are located
//! structurally and just the ones the expected object asks for are parsed.
mod lenient;
mod mismatch;

#[cfg(test)]
mod tests;

use serde_json::{Map, Number, Value};

pub use mismatch::{JsonKind, Mismatch, MismatchReason, PathSegment, Side};

/// Absolute tolerance for number equality, independent of magnitude.
pub const NUMBER_EPSILON: f64 = 1e-5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    pub allow_nulls: bool,
}

/// Returns `true` when `actual` satisfies the expected body.
#[must_use]
pub fn bodies_equal(expected: &[u8], actual: &[u8], options: CompareOptions) -> bool {
    explain_mismatch(expected, actual, options).is_none()
}

/// Walks the same rules as [`bodies_equal`] and reports the first
/// disagreement, or `None` when the bodies are equal.
#[must_use]
pub fn explain_mismatch(
    expected: &[u8],
    actual: &[u8],
    options: CompareOptions,
) -> Option<Mismatch> {
    let expected = match parse_object(expected, Side::Expected) {
        Ok(object) => object,
        Err(mismatch) => return Some(mismatch),
    };
    // Nothing to check: the actual body is never inspected.
    if expected.is_empty() {
        return None;
    }
    let result = match serde_json::from_slice::<Value>(actual) {
        Ok(Value::Object(actual)) => compare_objects(&expected, &actual, options),
        Ok(other) => Err(Mismatch::new(MismatchReason::NotAnObject {
            side: Side::Actual,
            kind: JsonKind::of(&other),
        })),
        Err(_) => match lenient::kind_of(actual) {
            Some(JsonKind::Object) => lenient::split_object(actual).map_or_else(
                || Err(malformed_actual()),
                |members| compare_members(&expected, &members, options),
            ),
            Some(kind) => Err(Mismatch::new(MismatchReason::NotAnObject {
                side: Side::Actual,
                kind,
            })),
            None => Err(malformed_actual()),
        },
    };
    result.err().map(Mismatch::finish)
}

const fn malformed_actual() -> Mismatch {
    Mismatch::new(MismatchReason::Malformed { side: Side::Actual })
}

fn parse_object(body: &[u8], side: Side) -> Result<Map<String, Value>, Mismatch> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(Mismatch::new(MismatchReason::NotAnObject {
            side,
            kind: JsonKind::of(&other),
        })),
        Err(_) => Err(Mismatch::new(MismatchReason::Malformed { side })),
    }
}

fn compare_objects(
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
    options: CompareOptions,
) -> Result<(), Mismatch> {
    for (key, expected_value) in expected {
        let Some(actual_value) = actual.get(key) else {
            return Err(Mismatch::new(MismatchReason::MissingKey)
                .within(PathSegment::Key(key.clone())));
        };
        compare_values(expected_value, actual_value, options)
            .map_err(|mismatch| mismatch.within(PathSegment::Key(key.clone())))?;
    }
    Ok(())
}

/// Object containment against members split out of a body the strict parser
/// rejected. Duplicate keys resolve to the last occurrence.
fn compare_members(
    expected: &Map<String, Value>,
    actual: &[(&[u8], &[u8])],
    options: CompareOptions,
) -> Result<(), Mismatch> {
    for (key, expected_value) in expected {
        let found = actual.iter().rev().find(|(raw_key, _)| {
            serde_json::from_slice::<String>(raw_key).is_ok_and(|decoded| decoded == *key)
        });
        let Some((_, raw_value)) = found else {
            return Err(Mismatch::new(MismatchReason::MissingKey)
                .within(PathSegment::Key(key.clone())));
        };
        compare_raw(expected_value, raw_value, options)
            .map_err(|mismatch| mismatch.within(PathSegment::Key(key.clone())))?;
    }
    Ok(())
}

fn compare_raw(expected: &Value, actual: &[u8], options: CompareOptions) -> Result<(), Mismatch> {
    if let Ok(actual) = serde_json::from_slice::<Value>(actual) {
        return compare_values(expected, &actual, options);
    }
    let expected_kind = JsonKind::of(expected);
    match lenient::kind_of(actual) {
        Some(actual_kind) if actual_kind != expected_kind => {
            return Err(Mismatch::new(MismatchReason::KindMismatch {
                expected: expected_kind,
                actual: actual_kind,
            }));
        }
        Some(_) => {}
        None => return Err(malformed_actual()),
    }

    match expected {
        Value::Object(expected) => lenient::split_object(actual).map_or_else(
            || Err(malformed_actual()),
            |members| compare_members(expected, &members, options),
        ),
        Value::Array(expected) => {
            let items = lenient::split_array(actual).ok_or_else(malformed_actual)?;
            if expected.len() != items.len() {
                return Err(Mismatch::new(MismatchReason::LengthMismatch {
                    expected: expected.len(),
                    actual: items.len(),
                }));
            }
            for (index, (expected, actual)) in expected.iter().zip(items).enumerate() {
                compare_raw(expected, actual, options)
                    .map_err(|mismatch| mismatch.within(PathSegment::Index(index)))?;
            }
            Ok(())
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Err(malformed_actual())
        }
    }
}

fn compare_values(expected: &Value, actual: &Value, options: CompareOptions) -> Result<(), Mismatch> {
    let expected_kind = JsonKind::of(expected);
    let actual_kind = JsonKind::of(actual);
    if expected_kind != actual_kind {
        return Err(Mismatch::new(MismatchReason::KindMismatch {
            expected: expected_kind,
            actual: actual_kind,
        }));
    }

    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            compare_objects(expected, actual, options)
        }
        (Value::Array(expected), Value::Array(actual)) => {
            compare_arrays(expected, actual, options)
        }
        (Value::Number(expected), Value::Number(actual)) => {
            if numbers_equal(expected, actual) {
                Ok(())
            } else {
                Err(Mismatch::new(MismatchReason::ValueMismatch))
            }
        }
        (Value::String(expected), Value::String(actual)) => {
            if expected == actual {
                Ok(())
            } else {
                Err(Mismatch::new(MismatchReason::ValueMismatch))
            }
        }
        (Value::Null, Value::Null) => {
            if options.allow_nulls {
                Ok(())
            } else {
                Err(Mismatch::new(MismatchReason::NullNotAllowed))
            }
        }
        _ => Err(Mismatch::new(MismatchReason::Unsupported {
            kind: expected_kind,
        })),
    }
}

fn compare_arrays(expected: &[Value], actual: &[Value], options: CompareOptions) -> Result<(), Mismatch> {
    if expected.len() != actual.len() {
        return Err(Mismatch::new(MismatchReason::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        }));
    }
    for (index, (expected, actual)) in expected.iter().zip(actual).enumerate() {
        compare_values(expected, actual, options)
            .map_err(|mismatch| mismatch.within(PathSegment::Index(index)))?;
    }
    Ok(())
}

#[expect(
    clippy::float_arithmetic,
    reason = "numbers are compared with an absolute epsilon"
)]
fn numbers_equal(expected: &Number, actual: &Number) -> bool {
    match (expected.as_f64(), actual.as_f64()) {
        (Some(expected), Some(actual)) => (expected - actual).abs() < NUMBER_EPSILON,
        _ => false,
    }
}
