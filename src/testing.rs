//! Round-trip request simulation against an [`App`], no sockets involved.
//!
//! ```no_run
//! # async fn demo(app: embrace::App) {
//! use embrace::testing;
//!
//! let response = testing::get("/hello?name=world").send(&app).await;
//! assert_eq!(response.status(), http::StatusCode::OK);
//! assert_eq!(response.json()["message"], "hello world");
//! # }
//! ```

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use serde::Serialize;

use crate::body::{BoxError, ReqBody};
use crate::server::App;
use crate::version::VERSION_HEADER;

/// A simulated request under construction.
///
/// The builder panics on invalid input when sent; it exists for tests,
/// where a malformed simulation is a bug in the test itself.
pub struct TestRequest {
    method: Method,
    path_and_query: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Option<Bytes>,
}

macro_rules! test_request_method {
    ($name:ident, $method:ident) => {
        pub fn $name(path_and_query: impl Into<String>) -> TestRequest {
            TestRequest::new(Method::$method, path_and_query)
        }
    };
}

test_request_method!(get, GET);
test_request_method!(post, POST);
test_request_method!(put, PUT);
test_request_method!(delete, DELETE);
test_request_method!(head, HEAD);
test_request_method!(options, OPTIONS);
test_request_method!(connect, CONNECT);
test_request_method!(patch, PATCH);
test_request_method!(trace, TRACE);

impl TestRequest {
    fn new(method: Method, path_and_query: impl Into<String>) -> Self {
        Self { method, path_and_query: path_and_query.into(), headers: Vec::new(), body: None }
    }

    pub fn header(mut self, name: impl TryInto<HeaderName>, value: impl TryInto<HeaderValue>) -> Self {
        let name = name.try_into().unwrap_or_else(|_| panic!("invalid header name"));
        let value = value.try_into().unwrap_or_else(|_| panic!("invalid header value"));
        self.headers.push((name, value));
        self
    }

    /// Carries the API version in the `X-Api-Version` header.
    pub fn api_version(self, version: u32) -> Self {
        self.header(VERSION_HEADER, version.to_string())
    }

    /// Attaches a JSON body with the matching content type.
    pub fn json(mut self, value: &impl Serialize) -> Self {
        let bytes = serde_json::to_vec(value).expect("value serializes to JSON");
        self.body = Some(Bytes::from(bytes));
        self.header(CONTENT_TYPE, "application/json")
    }

    /// Attaches an urlencoded form body with the matching content type.
    pub fn form(mut self, value: &impl Serialize) -> Self {
        let encoded = serde_urlencoded::to_string(value).expect("value serializes to a form");
        self.body = Some(Bytes::from(encoded));
        self.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
    }

    /// Attaches a raw body with an explicit content type.
    pub fn body(mut self, content_type: &'static str, bytes: impl Into<Bytes>) -> Self {
        self.body = Some(bytes.into());
        self.header(CONTENT_TYPE, content_type)
    }

    /// Runs the request through `App::handle` and collects the response.
    pub async fn send(self, app: &App) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.path_and_query);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        let body: ReqBody = Full::new(self.body.unwrap_or_default())
            .map_err(|never: std::convert::Infallible| -> BoxError { match never {} })
            .boxed_unsync();
        let request = builder.body(body).expect("request is well formed");

        let response = app.handle(request, None).await;
        let (parts, body) = response.into_parts();
        let body = body.collect().await.expect("response body collects").to_bytes();
        TestResponse { status: parts.status, headers: parts.headers, body }
    }
}

/// A fully collected response.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON, panicking when it is not.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}
