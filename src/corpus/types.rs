use std::borrow::Cow;

/// Body recorded for a 200 answer that has no body in the corpus.
pub const EMPTY_OBJECT_BODY: &[u8] = b"{}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Line of the block header that opened this request.
    pub line_no: usize,
    pub is_get: bool,
    pub uri: Vec<u8>,
    pub headers: Vec<Header>,
    pub body: Vec<u8>,
    /// Excluded from replay; still consumes its answer during pairing.
    pub skip: bool,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            line_no: 0,
            is_get: true,
            uri: Vec::new(),
            headers: Vec::new(),
            body: Vec::new(),
            skip: false,
        }
    }
}

impl Request {
    #[must_use]
    pub const fn method(&self) -> &'static str {
        if self.is_get { "GET" } else { "POST" }
    }

    #[must_use]
    pub fn uri_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.uri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: i32,
    pub body: Vec<u8>,
}

impl Response {
    /// Builds an answer record, applying the `{}` default for bodiless 200s.
    #[must_use]
    pub fn new(status: i32, body: Option<&[u8]>) -> Self {
        let body = match body {
            Some(body) if !body.is_empty() => body.to_vec(),
            _ if status == 200 => EMPTY_OBJECT_BODY.to_vec(),
            _ => Vec::new(),
        };
        Self { status, body }
    }
}

/// One replay unit: a request and the answer it is expected to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bullet {
    pub request: Request,
    pub response: Response,
}
