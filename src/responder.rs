//! Conversion of handler return values into HTTP responses.
//!
//! Anything a handler returns must implement [`Responder`]. Implementations
//! exist for the common carrier types (`Result`, `Option`, status tuples,
//! pre-built responses) and for plain text; structured output formats live
//! in [`crate::output`].

use crate::body::ResponseBody;
use crate::request::RequestContext;
use http::{Response, StatusCode};
use std::convert::Infallible;

/// A value that can be rendered as an HTTP response.
pub trait Responder {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody>;
}

/// `Result` renders whichever side it holds; both must be responders.
impl<T: Responder, E: Responder> Responder for Result<T, E> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Ok(t) => t.response_to(req),
            Err(e) => e.response_to(req),
        }
    }
}

/// `None` renders as an empty response.
impl<T: Responder> Responder for Option<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Some(t) => t.response_to(req),
            None => Response::new(ResponseBody::empty()),
        }
    }
}

/// Pre-built responses pass through unchanged.
impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

/// `(StatusCode, T)` overrides the status of the inner responder.
impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to(req);
        *response.status_mut() = status;
        response
    }
}

/// `(T, StatusCode)` works the same with the order reversed.
impl<T: Responder> Responder for (T, StatusCode) {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let (responder, status) = self;
        (status, responder).response_to(req)
    }
}

impl<T: Responder> Responder for Box<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        (*self).response_to(req)
    }
}

impl Responder for () {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for &'static str {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        let mut builder = Response::builder();
        let headers = builder.headers_mut().unwrap();
        headers.reserve(8);
        headers.insert(http::header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref().parse().unwrap());

        builder.status(StatusCode::OK).body(ResponseBody::from(self)).unwrap()
    }
}

impl Responder for String {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        let mut builder = Response::builder();
        let headers = builder.headers_mut().unwrap();
        headers.reserve(8);
        headers.insert(http::header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref().parse().unwrap());

        builder.status(StatusCode::OK).body(ResponseBody::from(self)).unwrap()
    }
}

impl Responder for Infallible {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    use super::Responder;
    use crate::request::{PathParams, RequestContext};
    use http::{Method, Request, StatusCode};

    fn with_request_context<F: FnOnce(&RequestContext)>(f: F) {
        let (parts, ()) = Request::builder().method(Method::GET).uri("/").body(()).unwrap().into_parts();
        let ctx = RequestContext::new(&parts, PathParams::empty());
        f(&ctx);
    }

    #[test]
    fn string_is_plain_text_ok() {
        with_request_context(|ctx| {
            let resp = "hello".response_to(ctx);
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.headers().get(http::header::CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
        });
    }

    #[test]
    fn status_tuple_overrides_status() {
        with_request_context(|ctx| {
            let resp = (StatusCode::CREATED, "made".to_string()).response_to(ctx);
            assert_eq!(resp.status(), StatusCode::CREATED);

            let resp = ("gone".to_string(), StatusCode::GONE).response_to(ctx);
            assert_eq!(resp.status(), StatusCode::GONE);
        });
    }

    #[test]
    fn option_none_is_empty_ok() {
        with_request_context(|ctx| {
            let resp = Option::<String>::None.response_to(ctx);
            assert_eq!(resp.status(), StatusCode::OK);
        });
    }
}
