//! HTTP `Date` header value management.
//!
//! Formatting an RFC 9110 date on every response is wasteful under load,
//! so a background task refreshes a shared preformatted value and
//! responses copy it. [`DateDecorator`] attaches the header to every
//! handler's response when installed as a global decorator.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderValue, Response};
use once_cell::sync::Lazy;

use crate::decorator::Decorator;
use crate::handler::RequestHandler;
use crate::{OptionReqBody, RequestContext, ResponseBody};

/// A service that maintains a periodically refreshed HTTP date string.
pub struct DateService {
    current: Arc<ArcSwap<Bytes>>,
    handle: tokio::task::JoinHandle<()>,
}

static DATE_SERVICE: Lazy<DateService> = Lazy::new(|| DateService::new_with_update_interval(Duration::from_millis(800)));

impl DateService {
    /// Returns the process-wide shared instance.
    ///
    /// Must be first called from within a tokio runtime; the refresh task
    /// is spawned lazily.
    pub fn get_global_instance() -> &'static DateService {
        &DATE_SERVICE
    }

    fn new_with_update_interval(update_interval: Duration) -> Self {
        let current = Arc::new(ArcSwap::from_pointee(format_now()));
        let current_arc = Arc::clone(&current);

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(update_interval).await;
                current_arc.store(Arc::new(format_now()));
            }
        });

        DateService { current, handle }
    }

    /// Provides the current date as a ready-made header value.
    pub(crate) fn with_http_date<F>(&self, mut f: F)
    where
        F: FnMut(HeaderValue),
    {
        let date = self.current.load().as_ref().clone();
        // SAFE: the bytes come from faf_http_date and are valid ASCII
        let header_value = unsafe { HeaderValue::from_maybe_shared_unchecked(date) };
        f(header_value)
    }
}

fn format_now() -> Bytes {
    let mut buf = faf_http_date::get_date_buff_no_key();
    faf_http_date::get_date_no_key(&mut buf);
    Bytes::from_owner(buf)
}

impl Drop for DateService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A global decorator that stamps the `Date` header on every response.
pub struct DateDecorator;

pub struct DateResponseHandler<H: RequestHandler> {
    handler: H,
}

impl<H: RequestHandler> Decorator<H> for DateDecorator {
    type Out = DateResponseHandler<H>;

    fn decorate(&self, raw: H) -> Self::Out {
        DateResponseHandler { handler: raw }
    }
}

#[async_trait]
impl<H: RequestHandler> RequestHandler for DateResponseHandler<H> {
    async fn invoke(&self, req: &mut RequestContext<'_, '_>, req_body: OptionReqBody) -> Response<ResponseBody> {
        let mut resp = self.handler.invoke(req, req_body).await;

        DateService::get_global_instance().with_http_date(|date_header_value| {
            resp.headers_mut().insert(http::header::DATE, date_header_value);
        });

        resp
    }
}
