//! Body extraction: raw bytes, text, and the structured input formats.
//!
//! The structured extractors enforce the content type they are declared
//! for: a body arriving under a different `Content-Type` is rejected
//! with a 415 before any parsing happens. A request without a
//! `Content-Type` header is given the benefit of the doubt and parsed
//! as the declared format.

use crate::body::OptionReqBody;
use crate::error::ExtractError;
use crate::extract::{Form, FromRequest, Json, coercion_error};
use crate::request::RequestContext;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

fn check_content_type(req: &RequestContext, expected: &'static str) -> Result<(), ExtractError> {
    let Some(value) = req.headers().get(http::header::CONTENT_TYPE) else {
        return Ok(());
    };

    let mime: mime::Mime = value
        .to_str()
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(ExtractError::UnsupportedMediaType { expected })?;

    if mime.essence_str() == expected {
        Ok(())
    } else {
        Err(ExtractError::UnsupportedMediaType { expected })
    }
}

async fn collect_bytes(body: OptionReqBody) -> Result<Bytes, ExtractError> {
    body.apply(|b| async {
        b.collect().await.map(|collected| collected.to_bytes()).map_err(ExtractError::invalid_body)
    })
    .await
}

#[async_trait]
impl FromRequest for Bytes {
    type Output<'r> = Bytes;
    type Error = ExtractError;

    async fn from_request<'r>(_req: &'r RequestContext<'_, '_>, body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        collect_bytes(body).await
    }
}

#[async_trait]
impl FromRequest for String {
    type Output<'r> = String;
    type Error = ExtractError;

    async fn from_request<'r>(_req: &'r RequestContext<'_, '_>, body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        let bytes = collect_bytes(body).await?;
        String::from_utf8(bytes.into()).map_err(|_| ExtractError::invalid_body("request body is not utf8"))
    }
}

#[async_trait]
impl<T> FromRequest for Json<T>
where
    T: DeserializeOwned + Send,
{
    type Output<'r> = Json<T>;
    type Error = ExtractError;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        check_content_type(req, "application/json")?;
        let bytes = collect_bytes(body).await?;
        serde_json::from_slice(&bytes).map(Json).map_err(|e| coercion_error(e.to_string(), ExtractError::InvalidBody))
    }
}

#[async_trait]
impl<T> FromRequest for Form<T>
where
    T: DeserializeOwned + Send,
{
    type Output<'r> = Form<T>;
    type Error = ExtractError;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        check_content_type(req, "application/x-www-form-urlencoded")?;
        let bytes = collect_bytes(body).await?;
        serde_urlencoded::from_bytes(&bytes)
            .map(Form)
            .map_err(|e| coercion_error(e.to_string(), ExtractError::InvalidBody))
    }
}
