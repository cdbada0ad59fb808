//! Built-in output formats.
//!
//! A handler picks its output format by wrapping its return value:
//! [`Json`] is the default API format, [`PrettyJson`] indents it, and
//! [`CamelcaseJson`] additionally rewrites every map key to camelCase
//! for clients that prefer JavaScript naming. Plain `String` returns
//! render as `text/plain` through [`crate::Responder`] directly.

use crate::body::ResponseBody;
use crate::request::RequestContext;
use crate::responder::Responder;
use bytes::Bytes;
use http::{Response, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// JSON (Javascript Serialized Object Notation)
pub struct Json<T>(pub T);

/// JSON pretty printed and indented
pub struct PrettyJson<T>(pub T);

/// JSON with all keys camelCased
pub struct CamelcaseJson<T>(pub T);

fn json_response(req: &RequestContext, result: Result<Vec<u8>, serde_json::Error>) -> Response<ResponseBody> {
    match result {
        Ok(buf) => {
            let mut builder = Response::builder();
            let headers = builder.headers_mut().unwrap();
            headers.reserve(8);
            headers.insert(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref().parse().unwrap());
            builder.status(StatusCode::OK).body(ResponseBody::once(Bytes::from(buf))).unwrap()
        }
        Err(e) => {
            tracing::error!(cause = %e, "response serialization failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "response serialization failed").response_to(req)
        }
    }
}

impl<T: Serialize> Responder for Json<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        json_response(req, serde_json::to_vec(&self.0))
    }
}

impl<T: Serialize> Responder for PrettyJson<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        json_response(req, serde_json::to_vec_pretty(&self.0))
    }
}

impl<T: Serialize> Responder for CamelcaseJson<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let result = serde_json::to_value(&self.0).map(camelcase_keys).and_then(|v| serde_json::to_vec(&v));
        json_response(req, result)
    }
}

/// Rewrites one `snake_case` key as camelCase.
///
/// The first character is kept verbatim, the remaining underscore-separated
/// words are title-cased and joined. Keys without underscores keep their
/// shape apart from per-word lowering, matching what clients get from the
/// classic camelize transform.
fn camelcase_key(key: &str) -> String {
    let mut joined = String::with_capacity(key.len());
    for word in key.split('_') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            joined.extend(first.to_uppercase());
            joined.extend(chars.flat_map(char::to_lowercase));
        }
    }

    match key.chars().next() {
        None => String::new(),
        Some(first) => {
            let mut out = String::with_capacity(joined.len());
            out.push(first);
            out.extend(joined.chars().skip(1));
            out
        }
    }
}

/// Recursively camelCases the keys of every JSON object. Arrays and
/// scalars pass through untouched.
pub fn camelcase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (camelcase_key(&k), camelcase_keys(v))).collect())
        }
        other => other,
    }
}
