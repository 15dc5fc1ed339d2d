use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to open corpus file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read '{path}' line#{line_no}: {source}")]
    Read {
        path: PathBuf,
        line_no: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("Wrong block header in '{path}' line#{line_no}: [{line}]")]
    BlockHeader {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
    #[error("Wrong query in '{path}' line#{line_no}: {line}")]
    Query {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
    #[error("Wrong header in '{path}' line#{line_no}: {line}")]
    Header {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
    #[error("Wrong answer format in '{path}' line#{line_no}: {line}")]
    Answer {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
    #[error("Wrong status in '{path}' line#{line_no}: {line}")]
    Status {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
    #[error("Answers are not enough: answer stream ended after {requests} requests.")]
    InsufficientAnswers { requests: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
