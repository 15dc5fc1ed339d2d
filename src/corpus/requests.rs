use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use regex::bytes::Regex;

use crate::error::CorpusError;

use super::LinePattern;
use super::types::{Header, Request};

const HEADER_CONTENT_LENGTH: &[u8] = b"Content-Length";

static BLOCK_HEADER: LinePattern =
    LinePattern::new(|| Regex::new(r"(?-u)^[0-9]+(?: (?:GET|POST):|$)"));
static QUERY_LINE: LinePattern =
    LinePattern::new(|| Regex::new(r"(?-u)^(GET|POST) ([^\t\n\f\r ]+) HTTP/"));

/// Optional filters deciding which requests are replayed.
#[derive(Debug, Clone, Default)]
pub struct RequestFilters {
    /// Matched against the block header line (`<size> <METHOD>:<tag>`).
    pub request_line: Option<Regex>,
    /// Substring the request URI must contain. Takes precedence over
    /// `request_line` when both are set.
    pub uri: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BlockHeader,
    Query,
    Headers,
    Body,
}

/// Pull parser over a request corpus, yielding one [`Request`] per block.
///
/// The first format or read error is yielded once and ends the stream.
pub struct RequestReader<R> {
    reader: R,
    path: PathBuf,
    filters: RequestFilters,
    state: State,
    current: Request,
    with_body: bool,
    line_no: usize,
    line: Vec<u8>,
    finished: bool,
}

impl RequestReader<BufReader<File>> {
    /// # Errors
    ///
    /// Returns an error when the corpus file cannot be opened.
    pub fn open(path: &Path, filters: RequestFilters) -> Result<Self, CorpusError> {
        let file = File::open(path).map_err(|err| CorpusError::Open {
            path: path.to_path_buf(),
            source: err,
        })?;
        Ok(Self::new(BufReader::new(file), path, filters))
    }
}

impl<R: BufRead> RequestReader<R> {
    pub fn new(reader: R, path: &Path, filters: RequestFilters) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            filters,
            state: State::BlockHeader,
            current: Request::default(),
            with_body: false,
            line_no: 0,
            line: Vec::with_capacity(256),
            finished: false,
        }
    }

    fn advance(&mut self) -> Result<Option<Request>, CorpusError> {
        loop {
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

            if let Some(request) = self.consume_line()? {
                return Ok(Some(request));
            }
        }
    }

    fn consume_line(&mut self) -> Result<Option<Request>, CorpusError> {
        let line = self.line.trim_ascii();
        match self.state {
            State::BlockHeader => {
                if !is_block_header(line) {
                    return Err(CorpusError::BlockHeader {
                        path: self.path.clone(),
                        line_no: self.line_no,
                        line: String::from_utf8_lossy(line).into_owned(),
                    });
                }
                self.with_body = false;
                self.current = Request {
                    line_no: self.line_no,
                    ..Request::default()
                };
                if let Some(filter) = self.filters.request_line.as_ref() {
                    self.current.skip = !filter.is_match(line);
                }
                self.state = State::Query;
                Ok(None)
            }
            State::Query => {
                let Some((is_get, uri)) = parse_query(line) else {
                    return Err(CorpusError::Query {
                        path: self.path.clone(),
                        line_no: self.line_no,
                        line: String::from_utf8_lossy(line).into_owned(),
                    });
                };
                self.current.is_get = is_get;
                self.current.uri = uri.to_vec();
                if let Some(filter) = self.filters.uri.as_deref() {
                    self.current.skip = !contains(uri, filter);
                }
                self.state = State::Headers;
                Ok(None)
            }
            State::Headers => {
                if line.is_empty() {
                    if self.current.is_get || !self.with_body {
                        self.state = State::BlockHeader;
                        return Ok(Some(std::mem::take(&mut self.current)));
                    }
                    self.state = State::Body;
                    return Ok(None);
                }
                let Some((key, value)) = split_header(line) else {
                    return Err(CorpusError::Header {
                        path: self.path.clone(),
                        line_no: self.line_no,
                        line: String::from_utf8_lossy(line).into_owned(),
                    });
                };
                // "Content-Length: 0" is sent without a body line.
                if key.eq_ignore_ascii_case(HEADER_CONTENT_LENGTH) && !is_zero_length(value) {
                    self.with_body = true;
                }
                self.current.headers.push(Header {
                    key: key.to_vec(),
                    value: value.to_vec(),
                });
                Ok(None)
            }
            State::Body => {
                self.current.body = line.to_vec();
                self.state = State::BlockHeader;
                Ok(Some(std::mem::take(&mut self.current)))
            }
        }
    }
}

impl<R: BufRead> Iterator for RequestReader<R> {
    type Item = Result<Request, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(request)) => Some(Ok(request)),
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

fn is_block_header(line: &[u8]) -> bool {
    BLOCK_HEADER
        .as_ref()
        .is_ok_and(|pattern| pattern.is_match(line))
}

/// Returns the method flag and the URI of a query line.
fn parse_query(line: &[u8]) -> Option<(bool, &[u8])> {
    let captures = QUERY_LINE.as_ref().ok()?.captures(line)?;
    let method = captures.get(1)?.as_bytes();
    let uri = captures.get(2)?.as_bytes();
    Some((method == b"GET", uri))
}

fn split_header(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = line.iter().position(|byte| *byte == b':')?;
    let key = line.get(..pos)?;
    let value = line.get(pos.saturating_add(1)..)?.trim_ascii();
    Some((key, value))
}

fn is_zero_length(value: &[u8]) -> bool {
    std::str::from_utf8(value)
        .ok()
        .and_then(|text| text.parse::<u64>().ok())
        == Some(0)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty()
        || haystack
            .windows(needle.len())
            .any(|window| window == needle)
}

#[cfg(test)]
pub(super) fn line_patterns() -> [(&'static str, &'static LinePattern); 2] {
    [("block header", &BLOCK_HEADER), ("query line", &QUERY_LINE)]
}
