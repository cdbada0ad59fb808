//! Composable request filters.
//!
//! A route path can carry several registered items; filters decide which
//! of them serves a given request. Built-ins cover HTTP methods, header
//! equality, API version membership and closures, composable with
//! AND/OR logic.
//!
//! All filters are `Send + Sync` so they can be consulted concurrently
//! from every connection task.
//!
//! # Examples
//!
//! ```
//! use embrace::filter::{all_filter, get_method, header};
//!
//! // match GET requests carrying a specific header
//! let mut combined = all_filter();
//! combined.and(get_method()).and(header("x-requested-with", "XMLHttpRequest"));
//! ```

use crate::request::RequestContext;
use http::{HeaderName, HeaderValue, Method};
use std::collections::BTreeSet;

/// Core trait for request filtering.
///
/// Returns `true` if the route item should serve the request.
pub trait Filter: Send + Sync {
    fn matches(&self, req: &RequestContext) -> bool;
}

/// A filter that wraps a closure.
struct FnFilter<F: Fn(&RequestContext) -> bool>(F);

impl<F: Fn(&RequestContext) -> bool + Send + Sync> Filter for FnFilter<F> {
    fn matches(&self, req: &RequestContext) -> bool {
        (self.0)(req)
    }
}

/// Creates a filter from a closure.
///
/// # Example
/// ```
/// use embrace::filter::fn_filter;
///
/// let custom_filter = fn_filter(|req| {
///     req.uri().path().starts_with("/api")
/// });
/// ```
pub fn fn_filter<F>(f: F) -> impl Filter
where
    F: Fn(&RequestContext) -> bool + Send + Sync,
{
    FnFilter(f)
}

/// Creates a filter that always returns true.
pub fn true_filter() -> TrueFilter {
    TrueFilter
}

/// Creates a filter that always returns false.
pub fn false_filter() -> FalseFilter {
    FalseFilter
}

/// A filter that always returns true.
pub struct TrueFilter;
impl Filter for TrueFilter {
    #[inline]
    fn matches(&self, _req: &RequestContext) -> bool {
        true
    }
}

/// A filter that always returns false.
pub struct FalseFilter;
impl Filter for FalseFilter {
    #[inline]
    fn matches(&self, _req: &RequestContext) -> bool {
        false
    }
}

/// Creates a new OR-composed filter chain.
pub fn any_filter() -> AnyFilter {
    AnyFilter::new()
}

/// Compose filters with OR logic.
///
/// If any inner filter succeeds, the whole filter succeeds.
/// An empty filter chain returns true by default.
pub struct AnyFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AnyFilter {
    fn new() -> Self {
        Self { filters: vec![] }
    }

    /// Add a new filter to the OR chain.
    pub fn or<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Filter for AnyFilter {
    fn matches(&self, req: &RequestContext) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        for filter in &self.filters {
            if filter.matches(req) {
                return true;
            }
        }

        false
    }
}

/// Creates a new AND-composed filter chain.
pub fn all_filter() -> AllFilter {
    AllFilter::new()
}

/// Compose filters with AND logic.
///
/// All inner filters must succeed for the whole filter to succeed.
/// An empty filter chain returns true by default.
pub struct AllFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AllFilter {
    fn new() -> Self {
        Self { filters: vec![] }
    }

    /// Add a new filter to the AND chain.
    pub fn and<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Filter for AllFilter {
    fn matches(&self, req: &RequestContext) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        for filter in &self.filters {
            if !filter.matches(req) {
                return false;
            }
        }

        true
    }
}

/// A filter that matches HTTP methods.
pub struct MethodFilter(Method);

impl Filter for MethodFilter {
    fn matches(&self, req: &RequestContext) -> bool {
        self.0.eq(req.method())
    }
}

macro_rules! method_filter {
    ($method:ident, $upper_case_method:ident) => {
        #[doc = concat!("Creates a filter that matches HTTP ", stringify!($upper_case_method), " requests.")]
        #[inline]
        pub fn $method() -> MethodFilter {
            MethodFilter(Method::$upper_case_method)
        }
    };
}

method_filter!(get_method, GET);
method_filter!(post_method, POST);
method_filter!(put_method, PUT);
method_filter!(delete_method, DELETE);
method_filter!(head_method, HEAD);
method_filter!(options_method, OPTIONS);
method_filter!(connect_method, CONNECT);
method_filter!(patch_method, PATCH);
method_filter!(trace_method, TRACE);

/// Creates a filter that matches a specific header name and value.
#[inline]
pub fn header<K, V>(header_name: K, header_value: V) -> HeaderFilter
where
    HeaderName: TryFrom<K>,
    <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
    HeaderValue: TryFrom<V>,
    <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
{
    // TODO: surface invalid names as a build error instead of panicking here
    let name = <HeaderName as TryFrom<K>>::try_from(header_name).map_err(Into::into).unwrap();
    let value = <HeaderValue as TryFrom<V>>::try_from(header_value).map_err(Into::into).unwrap();
    HeaderFilter(name, value)
}

/// A filter that matches HTTP headers.
pub struct HeaderFilter(HeaderName, HeaderValue);

impl Filter for HeaderFilter {
    fn matches(&self, req: &RequestContext) -> bool {
        let value_option = req.headers().get(&self.0);
        value_option.map(|value| self.1.eq(value)).unwrap_or(false)
    }
}

/// Creates a filter that matches requests dispatched under one of the
/// given API versions. A request without a version never matches.
pub fn version<I: IntoIterator<Item = u32>>(versions: I) -> VersionFilter {
    VersionFilter(versions.into_iter().collect())
}

/// A filter that matches by API version membership.
pub struct VersionFilter(BTreeSet<u32>);

impl Filter for VersionFilter {
    fn matches(&self, req: &RequestContext) -> bool {
        req.api_version().map(|v| self.0.contains(&v)).unwrap_or(false)
    }
}
