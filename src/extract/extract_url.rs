//! Query string extraction.
//!
//! Implements [`FromRequest`] for [`Query<T>`] so handlers receive
//! strongly typed query parameters: the raw string values are coerced by
//! deserialization into whatever the target struct declares.
//!
//! # Example
//! ```no_run
//! # use serde::Deserialize;
//! # use embrace::extract::Query;
//!
//! #[derive(Deserialize)]
//! struct Params {
//!     name: String,
//!     age: u32,
//! }
//!
//! async fn handler(Query(params): Query<Params>) {
//!     println!("Name: {}, Age: {}", params.name, params.age);
//! }
//! ```

use crate::body::OptionReqBody;
use crate::error::ExtractError;
use crate::extract::{FromRequest, Query, coercion_error};
use crate::request::RequestContext;
use async_trait::async_trait;
use serde::Deserialize;

#[async_trait]
impl<T> FromRequest for Query<T>
where
    T: for<'de> Deserialize<'de> + Send,
{
    type Output<'r> = Query<T>;
    type Error = ExtractError;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        // An absent query string still deserializes: every field missing.
        let query = req.uri().query().unwrap_or("");
        serde_qs::from_str(query).map(Query).map_err(|e| coercion_error(e.to_string(), ExtractError::InvalidQuery))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PathParams;
    use http::Request;

    #[derive(Deserialize, Debug)]
    struct Params {
        name: String,
        age: u32,
    }

    async fn extract(uri: &str) -> Result<Query<Params>, ExtractError> {
        let (parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        let ctx = RequestContext::new(&parts, PathParams::empty());
        Query::<Params>::from_request(&ctx, OptionReqBody::empty()).await
    }

    #[tokio::test]
    async fn coerces_typed_fields() {
        let Query(params) = extract("/hello?name=ann&age=42").await.unwrap();
        assert_eq!(params.name, "ann");
        assert_eq!(params.age, 42);
    }

    #[tokio::test]
    async fn bad_number_is_a_coercion_error() {
        let err = extract("/hello?name=ann&age=nope").await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn missing_field_reports_required_parameter() {
        let err = extract("/hello?name=ann").await.unwrap_err();
        assert!(matches!(err, ExtractError::MissingParameter { ref name } if name == "age"));
    }
}
