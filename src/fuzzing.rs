use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use crate::args::parsers::parse_duration_value;
use crate::compare::{CompareOptions, bodies_equal, explain_mismatch};
use crate::corpus::{AnswerReader, Request, RequestFilters, RequestReader, Response};
use crate::error::{CorpusError, ValidationError};

const FUZZ_PATH: &str = "<fuzz>";

/// Runs the request corpus parser over an in-memory buffer.
///
/// # Errors
///
/// Returns the first format error the parser reports.
pub fn parse_request_corpus(input: &[u8]) -> Result<Vec<Request>, CorpusError> {
    RequestReader::new(Cursor::new(input), Path::new(FUZZ_PATH), RequestFilters::default())
        .collect()
}

/// Runs the answer corpus parser over an in-memory buffer.
///
/// # Errors
///
/// Returns the first format error the parser reports.
pub fn parse_answer_corpus(input: &[u8]) -> Result<Vec<Response>, CorpusError> {
    AnswerReader::new(Cursor::new(input), Path::new(FUZZ_PATH)).collect()
}

/// Splits a single answer line into method, URI, status and optional body.
#[must_use]
pub fn split_answer_fields(line: &[u8]) -> Option<(&[u8], &[u8], &[u8], Option<&[u8]>)> {
    crate::corpus::split_answer_line(line.trim_ascii())
        .map(|answer| (answer.method, answer.uri, answer.status, answer.body))
}

/// Compares two bodies, returning the verdict and the rendered mismatch.
#[must_use]
pub fn compare_bodies(expected: &[u8], actual: &[u8], allow_nulls: bool) -> (bool, Option<String>) {
    let options = CompareOptions { allow_nulls };
    let equal = bodies_equal(expected, actual, options);
    let explained = explain_mismatch(expected, actual, options).map(|mismatch| mismatch.to_string());
    (equal, explained)
}

/// Parses a duration value the way CLI and config inputs do.
///
/// # Errors
///
/// Returns an error when the value is not a positive duration.
pub fn parse_duration_value_input(input: &str) -> Result<Duration, ValidationError> {
    parse_duration_value(input)
}
