//! Typed extraction of handler arguments from the request.
//!
//! The wrapper type a handler asks for decides where the value comes
//! from and how the raw text is coerced; deserialization does the
//! coercion, so `age: u32` in the target struct turns `"42"` into `42`
//! and rejects `"nope"` with a 400.

mod extract_body;
mod extract_header;
mod extract_path;
mod extract_tuple;
mod extract_url;
mod from_request;

pub use from_request::FromRequest;

use crate::error::ExtractError;

/// Form data from an `application/x-www-form-urlencoded` body.
///
/// The target type must implement [`serde::Deserialize`] and [`Send`].
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use embrace::extract::Form;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     name: String,
///     zip: String,
/// }
///
/// pub async fn handle(Form(params): Form<Params>) -> String {
///     format!("received params: {:?}", params)
/// }
/// ```
#[derive(Debug)]
pub struct Form<T>(pub T);

/// JSON data from an `application/json` body.
///
/// The target type must implement [`serde::Deserialize`] and [`Send`].
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use embrace::extract::Json;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     name: String,
///     zip: String,
/// }
///
/// pub async fn handle(Json(params): Json<Params>) -> String {
///     format!("received params: {:?}", params)
/// }
/// ```
#[derive(Debug)]
pub struct Json<T>(pub T);

/// Typed data from the url query string.
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use embrace::extract::Query;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     name: String,
///     age: u32,
/// }
///
/// pub async fn handle(Query(params): Query<Params>) -> String {
///     format!("received params: {:?}", params)
/// }
/// ```
#[derive(Debug)]
pub struct Query<T>(pub T);

/// Typed data from named path segments.
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use embrace::extract::Path;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     id: u64,
/// }
///
/// // for a route registered at "/users/{id}"
/// pub async fn handle(Path(params): Path<Params>) -> String {
///     format!("user {}", params.id)
/// }
/// ```
#[derive(Debug)]
pub struct Path<T>(pub T);

/// Maps a serde error message onto the wire error vocabulary:
/// "missing field" failures report the field with the canonical
/// required-parameter message, everything else keeps serde's reason.
pub(crate) fn coercion_error(message: String, fallback: fn(String) -> ExtractError) -> ExtractError {
    if let Some(rest) = message.strip_prefix("missing field `")
        && let Some(name) = rest.split('`').next()
    {
        return ExtractError::missing_parameter(name);
    }
    fallback(message)
}
