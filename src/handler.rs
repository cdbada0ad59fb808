use crate::body::{OptionReqBody, ResponseBody};
use crate::extract::FromRequest;
use crate::fn_trait::FnTrait;
use crate::request::RequestContext;
use crate::responder::Responder;
use async_trait::async_trait;
use http::Response;
use std::marker::PhantomData;

/// The type-erased form every route handler is stored as.
///
/// Extraction failures never surface here: they are rendered into the
/// response by the error's own [`Responder`] implementation, so invoking
/// a handler always yields a response.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: &mut RequestContext<'_, '_>, req_body: OptionReqBody) -> Response<ResponseBody>;
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Box<H> {
    async fn invoke(&self, req: &mut RequestContext<'_, '_>, req_body: OptionReqBody) -> Response<ResponseBody> {
        self.as_ref().invoke(req, req_body).await
    }
}

/// A `FnTrait` holder which represents any async fn as a handler.
pub struct FnHandler<F, Args> {
    f: F,
    _phantom: PhantomData<fn(Args)>,
}

impl<F, Args> FnHandler<F, Args>
where
    F: FnTrait<Args>,
{
    fn new(f: F) -> Self {
        Self { f, _phantom: PhantomData }
    }
}

/// Wraps an async fn into a [`FnHandler`], decoupling registration from
/// the function itself: the fn stays directly callable.
pub fn handler_fn<F, Args>(f: F) -> FnHandler<F, Args>
where
    F: FnTrait<Args>,
{
    FnHandler::new(f)
}

#[async_trait]
impl<F, Args> RequestHandler for FnHandler<F, Args>
where
    F: for<'r> FnTrait<Args::Output<'r>> + Send + Sync,
    for<'r> <F as FnTrait<Args::Output<'r>>>::Output: Responder,
    Args: FromRequest + Send + Sync,
{
    async fn invoke(&self, req: &mut RequestContext<'_, '_>, req_body: OptionReqBody) -> Response<ResponseBody> {
        match Args::from_request(req, req_body.clone()).await {
            Ok(args) => {
                let responder = self.f.call(args).await;
                responder.response_to(req)
            }
            Err(e) => e.response_to(req),
        }
    }
}
