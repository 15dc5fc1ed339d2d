use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use regex::bytes::Regex;

use crate::error::CorpusError;

use super::LinePattern;
use super::types::Response;

static ANSWER_LINE: LinePattern = LinePattern::new(|| {
    Regex::new(r"(?-u)^(GET|POST)[\t\n\f\r ]+([^\t\n\f\r ]+)[\t\n\f\r ]+([0-9]+)(?:[\t\n\f\r ]+(.+))?$")
});

/// Fields of one answer line, borrowed from the line buffer.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct AnswerLine<'line> {
    pub(crate) method: &'line [u8],
    pub(crate) uri: &'line [u8],
    pub(crate) status: &'line [u8],
    pub(crate) body: Option<&'line [u8]>,
}

/// Pull parser over an answer corpus: one [`Response`] per line.
pub struct AnswerReader<R> {
    reader: R,
    path: PathBuf,
    line_no: usize,
    line: Vec<u8>,
    finished: bool,
}

impl AnswerReader<BufReader<File>> {
    /// # Errors
    ///
    /// Returns an error when the answer file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, CorpusError> {
        let file = File::open(path).map_err(|err| CorpusError::Open {
            path: path.to_path_buf(),
            source: err,
        })?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> AnswerReader<R> {
    pub fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            line_no: 0,
            line: Vec::with_capacity(256),
            finished: false,
        }
    }

    fn advance(&mut self) -> Result<Option<Response>, CorpusError> {
        self.line.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.line)
            .map_err(|err| CorpusError::Read {
                path: self.path.clone(),
                line_no: self.line_no.saturating_add(1),
                source: err,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_no = self.line_no.saturating_add(1);

        let line = self.line.trim_ascii();
        let Some(answer) = split_answer_line(line) else {
            return Err(CorpusError::Answer {
                path: self.path.clone(),
                line_no: self.line_no,
                line: String::from_utf8_lossy(line).into_owned(),
            });
        };
        let status = std::str::from_utf8(answer.status)
            .ok()
            .and_then(|text| text.parse::<i32>().ok())
            .ok_or_else(|| CorpusError::Status {
                path: self.path.clone(),
                line_no: self.line_no,
                line: String::from_utf8_lossy(line).into_owned(),
            })?;

        Ok(Some(Response::new(status, answer.body)))
    }
}

impl<R: BufRead> Iterator for AnswerReader<R> {
    type Item = Result<Response, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(response)) => Some(Ok(response)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Splits an already trimmed answer line into its fields.
pub(crate) fn split_answer_line(line: &[u8]) -> Option<AnswerLine<'_>> {
    let captures = ANSWER_LINE.as_ref().ok()?.captures(line)?;
    Some(AnswerLine {
        method: captures.get(1)?.as_bytes(),
        uri: captures.get(2)?.as_bytes(),
        status: captures.get(3)?.as_bytes(),
        body: captures.get(4).map(|body| body.as_bytes()),
    })
}

#[cfg(test)]
pub(super) fn line_patterns() -> [(&'static str, &'static LinePattern); 1] {
    [("answer line", &ANSWER_LINE)]
}
