//! Per-request state shared by the validation steps and the final handler.

use crate::source::Source;
use hyper::http::request::Parts;
use hyper::http::{Extensions, HeaderMap, Method, Request, StatusCode, Uri};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Side-channel holding decoded values next to the response.
///
/// Query data only ever lands here; params and body land here in addition to
/// the request when they go through the combined composer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Locals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed_query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed_params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed_body: Option<Value>,
}

impl Locals {
    pub fn get(&self, source: Source) -> Option<&Value> {
        match source {
            Source::Query => self.typed_query.as_ref(),
            Source::Params => self.typed_params.as_ref(),
            Source::Body => self.typed_body.as_ref(),
        }
    }

    pub fn set(&mut self, source: Source, value: Value) {
        let slot = match source {
            Source::Query => &mut self.typed_query,
            Source::Params => &mut self.typed_params,
            Source::Body => &mut self.typed_body,
        };
        *slot = Some(value);
    }

    /// Deserializes the decoded value of `source`, if one was stored.
    pub fn get_as<T: DeserializeOwned>(&self, source: Source) -> Option<Result<T, serde_json::Error>> {
        self.get(source).map(T::deserialize)
    }
}

/// Request data as seen by validation steps and handlers.
///
/// `body` and `params` are overwritten in place by successful validation.
/// `query` is read-only; decoded query data is published through
/// [`Locals::typed_query`] instead.
#[derive(Debug)]
pub struct RequestContext {
    head: Parts,
    query: Value,
    pub params: Value,
    pub body: Value,
}

impl RequestContext {
    pub fn new(head: Parts, query: Value, params: Value, body: Value) -> Self {
        Self {
            head,
            query,
            params,
            body,
        }
    }

    /// Context with an empty `GET /` head, mostly useful outside a server.
    pub fn from_values(query: Value, params: Value, body: Value) -> Self {
        let (head, ()) = Request::new(()).into_parts();
        Self::new(head, query, params, body)
    }

    pub fn head(&self) -> &Parts {
        &self.head
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    pub fn extensions(&self) -> &Extensions {
        &self.head.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.head.extensions
    }

    pub fn query(&self) -> &Value {
        &self.query
    }

    pub fn get(&self, source: Source) -> &Value {
        match source {
            Source::Body => &self.body,
            Source::Query => &self.query,
            Source::Params => &self.params,
        }
    }

    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }

    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.params)
    }
}

/// Response under construction.
///
/// A validation step that rejects its input writes status and payload here
/// and stops the chain; a successful step only touches [`Locals`].
#[derive(Debug, Default)]
pub struct ResponseContext {
    status: Option<StatusCode>,
    body: Option<Value>,
    headers: HeaderMap,
    pub locals: Locals,
}

impl ResponseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = Some(status);
        self
    }

    pub fn json(&mut self, payload: Value) -> &mut Self {
        self.body = Some(payload);
        self
    }

    /// Status to send, `200 OK` unless one was set.
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Whether a status or payload has been written.
    pub fn is_sent(&self) -> bool {
        self.status.is_some() || self.body.is_some()
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Option<Value>, Locals) {
        (self.status_code(), self.headers, self.body, self.locals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Page {
        page: u32,
    }

    #[test]
    fn locals_round_trip_by_source() {
        let mut locals = Locals::default();
        assert!(locals.get(Source::Query).is_none());
        locals.set(Source::Query, json!({ "page": 2 }));
        let page: Page = locals.get_as(Source::Query).unwrap().unwrap();
        assert_eq!(page, Page { page: 2 });
        assert!(locals.get_as::<Page>(Source::Body).is_none());
        assert_eq!(
            serde_json::to_value(&locals).unwrap(),
            json!({ "typedQuery": { "page": 2 } })
        );
    }

    #[test]
    fn response_defaults_to_ok_and_unsent() {
        let mut res = ResponseContext::new();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert!(!res.is_sent());
        res.status(StatusCode::BAD_REQUEST).json(json!({ "errors": [] }));
        assert!(res.is_sent());
        let (status, _, body, _) = res.into_parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, Some(json!({ "errors": [] })));
    }

    #[test]
    fn request_exposes_sources() {
        let req = RequestContext::from_values(json!({ "q": "a" }), json!({ "id": "1" }), json!(null));
        assert_eq!(req.get(Source::Query), &json!({ "q": "a" }));
        assert_eq!(req.get(Source::Params), &json!({ "id": "1" }));
        assert_eq!(req.method(), Method::GET);
        assert!(req.body_as::<Page>().is_err());
    }
}
