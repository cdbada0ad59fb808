//! Access to the parts of an HTTP request a handler may care about:
//! head, path parameters, the API version it was dispatched under, the
//! peer address and the instant the request was accepted.

use http::request::Parts;
use http::{HeaderMap, Method, Uri, Version};
use matchit::Params;
use std::net::SocketAddr;
use std::time::Instant;

/// The context of one in-flight request.
///
/// The lifetime parameters keep the context from outliving either the
/// application (`'app`, which owns the route table) or the request data
/// it references (`'req`).
pub struct RequestContext<'app: 'req, 'req> {
    head: &'req Parts,
    path_params: PathParams<'app, 'req>,
    api_version: Option<u32>,
    remote_addr: Option<SocketAddr>,
    received_at: Instant,
}

impl<'app, 'req> RequestContext<'app, 'req> {
    pub fn new(head: &'req Parts, path_params: PathParams<'app, 'req>) -> Self {
        Self { head, path_params, api_version: None, remote_addr: None, received_at: Instant::now() }
    }

    pub fn with_api_version(mut self, api_version: Option<u32>) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_remote_addr(mut self, remote_addr: Option<SocketAddr>) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    pub(crate) fn with_received_at(mut self, received_at: Instant) -> Self {
        self.received_at = received_at;
        self
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn version(&self) -> Version {
        self.head.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// Path parameters captured by the matched route pattern.
    pub fn path_params(&self) -> &PathParams<'app, 'req> {
        &self.path_params
    }

    /// The API version this request was dispatched under, if it carried one.
    pub fn api_version(&self) -> Option<u32> {
        self.api_version
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// The instant the request was accepted, before any routing work.
    pub fn received_at(&self) -> Instant {
        self.received_at
    }
}

/// Named segments captured from the request path, e.g. `id` in `/users/{id}`.
#[derive(Debug, Clone)]
pub struct PathParams<'app, 'req> {
    kind: PathParamsKind<'app, 'req>,
}

#[derive(Debug, Clone)]
enum PathParamsKind<'app, 'req> {
    None,
    Params(Params<'app, 'req>),
}

impl<'app, 'req> PathParams<'app, 'req> {
    #[inline]
    fn new(params: Params<'app, 'req>) -> Self {
        if params.is_empty() {
            Self::empty()
        } else {
            Self { kind: PathParamsKind::Params(params) }
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self { kind: PathParamsKind::None }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            PathParamsKind::None => true,
            PathParamsKind::Params(params) => params.is_empty(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match &self.kind {
            PathParamsKind::None => 0,
            PathParamsKind::Params(params) => params.len(),
        }
    }

    /// Gets a parameter value by name, `None` if the pattern has no such segment.
    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'req str> {
        match &self.kind {
            PathParamsKind::Params(params) => params.get(key),
            PathParamsKind::None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'app str, &'req str)> + '_ {
        let params = match &self.kind {
            PathParamsKind::Params(params) => Some(params.iter()),
            PathParamsKind::None => None,
        };
        params.into_iter().flatten()
    }
}

impl<'app, 'req> From<Params<'app, 'req>> for PathParams<'app, 'req> {
    fn from(params: Params<'app, 'req>) -> Self {
        PathParams::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::{PathParams, RequestContext};
    use std::time::{Duration, Instant};

    #[test]
    fn received_at_can_predate_construction() {
        let accepted = Instant::now() - Duration::from_millis(5);
        let (parts, ()) = http::Request::builder().uri("/").body(()).unwrap().into_parts();

        let ctx = RequestContext::new(&parts, PathParams::empty()).with_received_at(accepted);
        assert_eq!(ctx.received_at(), accepted);
        assert!(ctx.received_at().elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn empty_params() {
        let params = PathParams::empty();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
        assert_eq!(params.get("id"), None);
        assert_eq!(params.iter().count(), 0);
    }

    #[test]
    fn matched_params() {
        let mut router = matchit::Router::new();
        router.insert("/users/{id}", ()).unwrap();
        let matched = router.at("/users/42").unwrap();

        let params = PathParams::from(matched.params);
        assert!(!params.is_empty());
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("id", "42")]);
    }
}
