//! Directives: values the framework resolves from request context and
//! injects into handlers.
//!
//! A directive is just an extractor whose value comes from the machinery
//! around the request rather than its payload. Asking for one is as
//! simple as naming it in the signature:
//!
//! ```no_run
//! # use embrace::directive::{ApiVersion, Timer};
//! async fn status(timer: Timer, ApiVersion(version): ApiVersion) -> String {
//!     format!("v{:?} answered in {:?}", version, timer.elapsed())
//! }
//! ```

use crate::body::OptionReqBody;
use crate::extract::FromRequest;
use crate::request::RequestContext;
use async_trait::async_trait;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Tracks time surpassed since the request was accepted.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn started_at(&self) -> Instant {
        self.start
    }
}

#[async_trait]
impl FromRequest for Timer {
    type Output<'r> = Timer;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        Ok(Timer { start: req.received_at() })
    }
}

/// The API version the request was dispatched under, `None` when the
/// request named no version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion(pub Option<u32>);

#[async_trait]
impl FromRequest for ApiVersion {
    type Output<'r> = ApiVersion;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        Ok(ApiVersion(req.api_version()))
    }
}

/// The peer address of the connection the request arrived on. `None` for
/// simulated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAddr(pub Option<SocketAddr>);

#[async_trait]
impl FromRequest for RemoteAddr {
    type Output<'r> = RemoteAddr;
    type Error = Infallible;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
        Ok(RemoteAddr(req.remote_addr()))
    }
}
