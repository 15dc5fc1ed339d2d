use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{
    Client, Method,
    header::{HeaderName, HeaderValue},
    redirect,
};

use crate::corpus::{Header, Request};
use crate::error::{HttpError, TransportError};

use super::EngineConfig;

const HEADER_CONTENT_LENGTH: &[u8] = b"Content-Length";

/// Borrowed view of a bullet request with its fully built target URI.
#[derive(Debug, Clone, Copy)]
pub struct OutgoingRequest<'req> {
    pub is_get: bool,
    pub uri: &'req [u8],
    pub headers: &'req [Header],
    pub body: &'req [u8],
}

impl<'req> OutgoingRequest<'req> {
    #[must_use]
    pub fn new(request: &'req Request, uri: &'req [u8]) -> Self {
        Self {
            is_get: request.is_get,
            uri,
            headers: &request.headers,
            body: &request.body,
        }
    }

    #[must_use]
    pub const fn method(&self) -> &'static str {
        if self.is_get { "GET" } else { "POST" }
    }
}

/// Issues one request and fills `body` with the response payload.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the request cannot be built or sent, when the
    /// response body cannot be read, or when `timeout` elapses.
    async fn send(
        &self,
        request: &OutgoingRequest<'_>,
        timeout: Duration,
        body: &mut Vec<u8>,
    ) -> Result<u16, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: &EngineConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &OutgoingRequest<'_>,
        timeout: Duration,
        body: &mut Vec<u8>,
    ) -> Result<u16, TransportError> {
        let uri = std::str::from_utf8(request.uri).map_err(|err| TransportError::Rejected {
            reason: format!("URI is not valid UTF-8: {}", err),
        })?;
        let method = if request.is_get {
            Method::GET
        } else {
            Method::POST
        };

        let mut builder = self.client.request(method, uri).timeout(timeout);
        for header in request.headers {
            // The client derives it from the body that is actually sent.
            if header.key.eq_ignore_ascii_case(HEADER_CONTENT_LENGTH) {
                continue;
            }
            let name = HeaderName::from_bytes(&header.key).map_err(|_err| {
                TransportError::InvalidHeader {
                    name: String::from_utf8_lossy(&header.key).into_owned(),
                }
            })?;
            let value = HeaderValue::from_bytes(&header.value).map_err(|_err| {
                TransportError::InvalidHeader {
                    name: String::from_utf8_lossy(&header.key).into_owned(),
                }
            })?;
            builder = builder.header(name, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.to_vec());
        }

        let response = builder.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status().as_u16();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(TransportError::from_reqwest)?;
            body.extend_from_slice(&bytes);
        }
        Ok(status)
    }
}
