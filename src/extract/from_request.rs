use crate::body::OptionReqBody;
use crate::request::RequestContext;
use crate::responder::Responder;
use async_trait::async_trait;
use std::convert::Infallible;

/// Builds a handler argument from the request.
///
/// `Output` is generic over the request lifetime so implementations may
/// either borrow from the context or produce owned values. `Error` must
/// itself be a [`Responder`]: a failed extraction renders directly as the
/// response (a 400 for coercion failures) without the handler running.
#[async_trait]
pub trait FromRequest {
    type Output<'r>: Send;
    type Error: Responder + Send;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error>;
}

/// `Option<T>` turns an extraction failure into `None` instead of an
/// error response, making any extractor optional.
#[async_trait]
impl<T> FromRequest for Option<T>
where
    T: FromRequest,
{
    type Output<'r> = Option<T::Output<'r>>;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        match T::from_request(req, body.clone()).await {
            Ok(t) => Ok(Some(t)),
            Err(_) => Ok(None),
        }
    }
}

/// `Result<T, T::Error>` hands the extraction outcome to the handler to
/// deal with, instead of short-circuiting.
#[async_trait]
impl<T> FromRequest for Result<T, T::Error>
where
    T: FromRequest,
{
    type Output<'r> = Result<T::Output<'r>, T::Error>;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        Ok(T::from_request(req, body).await)
    }
}

#[async_trait]
impl FromRequest for () {
    type Output<'r> = ();
    type Error = Infallible;

    async fn from_request(_req: &RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'static>, Self::Error> {
        Ok(())
    }
}
