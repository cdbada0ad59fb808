//! Extraction failures and the wire shape they render to.
//!
//! Every failure to turn a raw request into handler arguments ends up
//! here, and every variant renders as a JSON object keyed by the part of
//! the request that was at fault:
//!
//! ```json
//! {"errors": {"age": "invalid digit found in string"}}
//! ```
//!
//! Coercion and missing-parameter failures are a 400; a body arriving
//! under the wrong `Content-Type` is a 415.

use crate::body::ResponseBody;
use crate::request::RequestContext;
use crate::responder::Responder;
use http::{Response, StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Required parameter not supplied")]
    MissingParameter { name: String },

    #[error("{reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("{0}")]
    InvalidQuery(String),

    #[error("request content type is not {expected}")]
    UnsupportedMediaType { expected: &'static str },

    #[error("{0}")]
    InvalidBody(String),

    #[error("request body has already been consumed")]
    BodyConsumed,
}

impl ExtractError {
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        ExtractError::MissingParameter { name: name.into() }
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl ToString) -> Self {
        ExtractError::InvalidParameter { name: name.into(), reason: reason.to_string() }
    }

    pub fn invalid_query(reason: impl ToString) -> Self {
        ExtractError::InvalidQuery(reason.to_string())
    }

    pub fn invalid_body(reason: impl ToString) -> Self {
        ExtractError::InvalidBody(reason.to_string())
    }

    /// The key this error is filed under in the rendered `errors` map.
    fn field(&self) -> &str {
        match self {
            ExtractError::MissingParameter { name } | ExtractError::InvalidParameter { name, .. } => name,
            ExtractError::InvalidQuery(_) => "query",
            ExtractError::UnsupportedMediaType { .. } | ExtractError::InvalidBody(_) | ExtractError::BodyConsumed => {
                "body"
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ExtractError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl Responder for ExtractError {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let status = self.status();
        let mut errors = serde_json::Map::new();
        errors.insert(self.field().to_owned(), serde_json::Value::String(self.to_string()));
        let data = json!({ "errors": errors });
        (status, crate::output::Json(data)).response_to(req)
    }
}
