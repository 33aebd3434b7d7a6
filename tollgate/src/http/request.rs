//! Turns an incoming request into a [`RequestContext`].

use crate::error::{AppError, AppResult};
use crate::router::params::PathParams;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use tollgate_core::{Req, RequestContext};

/// Reads the whole request into a context.
///
/// * query: object of strings, repeated keys collect into arrays
/// * params: [`PathParams`] stored by the router, `{}` when absent
/// * body: an object of strings for url-encoded forms, JSON for
///   `application/json` and `+json` media types, `null` when empty or of any
///   other content type
pub async fn load(req: Req, limit: usize) -> AppResult<RequestContext> {
    let (mut head, body) = req.into_parts();
    let query = parse_query(head.uri.query())?;
    let params = head
        .extensions
        .remove::<PathParams>()
        .map(|p| p.to_value())
        .unwrap_or_else(|| Value::Object(Map::new()));

    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return Err(AppError::PayloadTooLarge(format!(
                "Request body exceeds {} bytes",
                limit
            )));
        }
        Err(e) => {
            return Err(AppError::BadRequest(format!(
                "Failed to read request body: {}",
                e
            )));
        }
    };

    let format = BodyFormat::from_content_type(
        head.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
    );
    let body = parse_body(&bytes, format)?;

    Ok(RequestContext::new(head, query, params, body))
}

pub fn parse_query(query: Option<&str>) -> AppResult<Value> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.unwrap_or(""))?;
    Ok(collect_pairs(pairs))
}

/// How a request body is read, picked from its media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Form,
    /// Not decoded; the body is seen as `null`.
    Other,
}

impl BodyFormat {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return Self::Other;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else if essence == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Other
        }
    }
}

pub fn parse_body(bytes: &[u8], format: BodyFormat) -> AppResult<Value> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    match format {
        BodyFormat::Json => Ok(serde_json::from_slice(bytes)?),
        BodyFormat::Form => {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes)?;
            Ok(collect_pairs(pairs))
        }
        BodyFormat::Other => Ok(Value::Null),
    }
}

fn collect_pairs(pairs: Vec<(String, String)>) -> Value {
    let mut map = Map::new();
    for (key, value) in pairs {
        let value = Value::String(value);
        match map.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::{Request, StatusCode};
    use serde_json::json;
    use tollgate_core::full_body;

    fn request(uri: &str, content_type: Option<&str>, body: &'static str) -> Req {
        let mut builder = Request::builder().uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(full_body(body)).unwrap()
    }

    #[test]
    fn repeated_query_keys_become_arrays() {
        let value = parse_query(Some("tag=a&tag=b&tag=c&page=2")).unwrap();
        assert_eq!(value, json!({ "tag": ["a", "b", "c"], "page": "2" }));
        assert_eq!(parse_query(None).unwrap(), json!({}));
    }

    #[test]
    fn body_parsing_by_format() {
        assert_eq!(parse_body(b"", BodyFormat::Json).unwrap(), Value::Null);
        assert_eq!(
            parse_body(b"a=1&b=x%20y", BodyFormat::Form).unwrap(),
            json!({ "a": "1", "b": "x y" })
        );
        assert_eq!(parse_body(b"[1,2]", BodyFormat::Json).unwrap(), json!([1, 2]));
        assert_eq!(parse_body(b"hello world", BodyFormat::Other).unwrap(), Value::Null);
        let err = parse_body(b"{oops", BodyFormat::Json).unwrap_err();
        assert_eq!(err.error_code(), "JSON_PARSE_ERROR");
    }

    #[test]
    fn media_type_matching_ignores_case_and_parameters() {
        let cases = [
            (Some("application/json"), BodyFormat::Json),
            (Some("Application/JSON; charset=utf-8"), BodyFormat::Json),
            (Some("application/merge-patch+json"), BodyFormat::Json),
            (Some("APPLICATION/X-WWW-FORM-URLENCODED"), BodyFormat::Form),
            (Some("text/plain"), BodyFormat::Other),
            (Some("application/jsonx"), BodyFormat::Other),
            (None, BodyFormat::Other),
        ];
        for (content_type, expected) in cases {
            assert_eq!(BodyFormat::from_content_type(content_type), expected, "{content_type:?}");
        }
    }

    #[tokio::test]
    async fn plain_text_body_loads_as_null() {
        let req = request("/", Some("text/plain"), "hello world");
        let ctx = load(req, 1024).await.unwrap();
        assert_eq!(ctx.body, Value::Null);
    }

    #[tokio::test]
    async fn loads_all_sources() {
        let mut req = request("/u/1?q=x", Some("application/json"), r#"{"name":"n"}"#);
        req.extensions_mut()
            .insert(PathParams(vec![("id".into(), "1".into())]));
        let ctx = load(req, 1024).await.unwrap();
        assert_eq!(ctx.query(), &json!({ "q": "x" }));
        assert_eq!(ctx.params, json!({ "id": "1" }));
        assert_eq!(ctx.body, json!({ "name": "n" }));
        assert_eq!(ctx.uri().path(), "/u/1");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let req = request("/", None, "[1,2,3,4,5,6,7,8,9]");
        let err = load(req, 4).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
