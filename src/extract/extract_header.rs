use crate::body::OptionReqBody;
use crate::extract::from_request::FromRequest;
use crate::request::RequestContext;
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::convert::Infallible;

#[async_trait]
impl FromRequest for Method {
    type Output<'r> = Method;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        Ok(req.method().clone())
    }
}

#[async_trait]
impl FromRequest for &Method {
    type Output<'r> = &'r Method;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        Ok(req.method())
    }
}

#[async_trait]
impl FromRequest for HeaderMap {
    type Output<'r> = HeaderMap;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        Ok(req.headers().clone())
    }
}

#[async_trait]
impl FromRequest for &HeaderMap {
    type Output<'r> = &'r HeaderMap;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        Ok(req.headers())
    }
}
