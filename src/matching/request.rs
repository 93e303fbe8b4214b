//! The request view the evaluator consumes.
//!
//! Only the method token and the URL path are read. Scheme, host, query and
//! fragment never reach the matcher.

use axum::http::Request;
use url::Url;

/// What the evaluator needs to know about a request.
pub trait RequestView {
    /// The HTTP method token, in whatever case the client sent it.
    fn method(&self) -> &str;

    /// The URL path, without query or fragment.
    fn path(&self) -> &str;
}

impl<B> RequestView for Request<B> {
    fn method(&self) -> &str {
        Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }
}

/// A request described by a method and an absolute URL string.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    method: String,
    url: Url,
}

impl IncomingRequest {
    /// Parse an absolute URL. Relative URLs are rejected by the parser.
    pub fn new(method: impl Into<String>, url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            method: method.into(),
            url: Url::parse(url)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl RequestView for IncomingRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        self.url.path()
    }
}
