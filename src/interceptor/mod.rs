//! Request/response middleware hooks.
//!
//! Interceptors run around the matched handler in registration order:
//! `on_request` before extraction, `on_response` over the final response
//! (including error and not-found responses).

mod access_log;

pub use access_log::AccessLogInterceptor;

use async_trait::async_trait;
use http::Response;

use crate::{OptionReqBody, RequestContext, ResponseBody};

#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn on_request(&self, _req: &mut RequestContext, _body: &mut OptionReqBody) {}

    async fn on_response(&self, _req: &RequestContext, _resp: &mut Response<ResponseBody>) {}
}

/// An ordered interceptor chain, itself usable as one interceptor.
pub struct Interceptors {
    inner: Vec<Box<dyn Interceptor>>,
}

#[async_trait]
impl Interceptor for Interceptors {
    async fn on_request(&self, req: &mut RequestContext, body: &mut OptionReqBody) {
        for interceptor in self.inner.iter() {
            interceptor.on_request(req, body).await;
        }
    }

    async fn on_response(&self, req: &RequestContext, resp: &mut Response<ResponseBody>) {
        for interceptor in self.inner.iter() {
            interceptor.on_response(req, resp).await;
        }
    }
}

impl Interceptors {
    pub fn builder() -> InterceptorsBuilder {
        InterceptorsBuilder::new()
    }
}

pub struct InterceptorsBuilder {
    inner: Vec<Box<dyn Interceptor>>,
}

impl InterceptorsBuilder {
    fn new() -> Self {
        Self { inner: vec![] }
    }

    pub fn add_last<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.inner.push(Box::new(interceptor));
        self
    }

    pub fn add_first<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.inner.insert(0, Box::new(interceptor));
        self
    }

    pub fn build(self) -> Interceptors {
        Interceptors { inner: self.inner }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use http::{Request, Response};

    use super::{Interceptor, Interceptors};
    use crate::{OptionReqBody, PathParams, RequestContext, ResponseBody};

    struct Recorder {
        name: &'static str,
        log: &'static Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl Interceptor for Recorder {
        async fn on_request(&self, _req: &mut RequestContext, _body: &mut OptionReqBody) {
            self.log.lock().unwrap().push(self.name);
        }

        async fn on_response(&self, _req: &RequestContext, _resp: &mut Response<ResponseBody>) {
            self.log.lock().unwrap().push(self.name);
        }
    }

    #[tokio::test]
    async fn chain_runs_in_registration_order() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        let interceptors = Interceptors::builder()
            .add_last(Recorder { name: "second", log: &LOG })
            .add_last(Recorder { name: "third", log: &LOG })
            .add_first(Recorder { name: "first", log: &LOG })
            .build();

        let head = Request::builder().body(()).unwrap().into_parts().0;
        let mut req = RequestContext::new(&head, PathParams::empty());
        let mut body = OptionReqBody::empty();
        interceptors.on_request(&mut req, &mut body).await;

        let mut resp = Response::new(ResponseBody::empty());
        interceptors.on_response(&req, &mut resp).await;

        assert_eq!(*LOG.lock().unwrap(), vec!["first", "second", "third", "first", "second", "third"]);
    }
}
