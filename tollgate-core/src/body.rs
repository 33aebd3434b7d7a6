use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response};
use std::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error carried by request and response bodies flowing through tollgate.
pub struct TollgateError(pub BoxError);

impl TollgateError {
    pub fn msg(message: impl Into<String>) -> Self {
        TollgateError(message.into().into())
    }
}

impl fmt::Debug for TollgateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for TollgateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for TollgateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<BoxError> for TollgateError {
    fn from(err: BoxError) -> Self {
        TollgateError(err)
    }
}

impl From<std::convert::Infallible> for TollgateError {
    fn from(err: std::convert::Infallible) -> Self {
        match err {}
    }
}

impl From<hyper::Error> for TollgateError {
    fn from(err: hyper::Error) -> Self {
        TollgateError(Box::new(err))
    }
}

impl From<std::io::Error> for TollgateError {
    fn from(err: std::io::Error) -> Self {
        TollgateError(Box::new(err))
    }
}

pub type Body = BoxBody<Bytes, TollgateError>;
pub type Req = Request<Body>;
pub type Resp = Response<Body>;

/// Boxed body holding `bytes` in a single frame.
pub fn full_body(bytes: impl Into<Bytes>) -> Body {
    Full::new(bytes.into()).map_err(Into::into).boxed()
}

pub fn empty_body() -> Body {
    full_body(Bytes::new())
}
