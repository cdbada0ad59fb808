//! Typed path segment extraction.
//!
//! Captured segments are re-encoded as a urlencoded pair list and pushed
//! through the same deserialization machinery the query extractor uses,
//! so `/users/{id}` with `id: u64` in the target struct coerces and
//! validates exactly like a query parameter would.

use crate::body::OptionReqBody;
use crate::error::ExtractError;
use crate::extract::{FromRequest, Path, coercion_error};
use crate::request::RequestContext;
use async_trait::async_trait;
use serde::Deserialize;

#[async_trait]
impl<T> FromRequest for Path<T>
where
    T: for<'de> Deserialize<'de> + Send,
{
    type Output<'r> = Path<T>;
    type Error = ExtractError;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        let pairs: Vec<(&str, &str)> = req.path_params().iter().collect();
        let encoded = serde_urlencoded::to_string(&pairs)
            .map_err(|e| ExtractError::invalid_parameter("path", e))?;

        serde_qs::from_str(&encoded)
            .map(Path)
            .map_err(|e| coercion_error(e.to_string(), |reason| ExtractError::invalid_parameter("path", reason)))
    }
}
