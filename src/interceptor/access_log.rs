use async_trait::async_trait;
use http::Response;
use tracing::info;

use super::Interceptor;
use crate::{OptionReqBody, RequestContext, ResponseBody};

/// Logs one structured line per request once the response is final.
///
/// Runs as a response hook so it also covers error and not-found
/// responses.
#[derive(Default)]
pub struct AccessLogInterceptor;

#[async_trait]
impl Interceptor for AccessLogInterceptor {
    async fn on_response(&self, req: &RequestContext, resp: &mut Response<ResponseBody>) {
        info!(
            method = %req.method(),
            path = %req.uri().path(),
            status = resp.status().as_u16(),
            api_version = req.api_version(),
            remote_addr = ?req.remote_addr(),
            elapsed_us = req.received_at().elapsed().as_micros() as u64,
            "request served"
        );
    }
}
