//! Route registration and matching.
//!
//! Routes are declared through [`RouterBuilder::route`] with method item
//! builders ([`get`], [`post`], ...) wrapping a handler, then compiled
//! into a [`Router`] backed by `matchit`. Several items may share one
//! path; the first whose filter chain accepts the request wins.
//!
//! An item builder also carries the route's documentation metadata
//! (description, examples, declared inputs, output format, versions),
//! which `build` aggregates into the router's [`ApiDocs`].

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::PathParams;
use crate::decorator::{Decorator, DecoratorComposer, DecoratorExt, IdentityDecorator};
use crate::docs::{ApiDocs, OutputDoc, ParamDoc, RouteMeta};
use crate::filter::{self, AllFilter, Filter};
use crate::handler::RequestHandler;
use crate::types::TypeDoc;

type RouterFilter = dyn Filter + Send + Sync + 'static;
type InnerRouter<T> = matchit::Router<T>;

/// Main router structure that dispatches requests to registered items.
pub struct Router {
    inner_router: InnerRouter<Vec<RouterItem>>,
    docs: Arc<ApiDocs>,
}

/// A router item containing a filter chain and a handler.
pub struct RouterItem {
    filter: Box<RouterFilter>,
    handler: Box<dyn RequestHandler>,
}

/// Result of matching a route, containing matched items and path parameters.
pub struct RouteResult<'router, 'req> {
    router_items: &'router [RouterItem],
    params: PathParams<'router, 'req>,
}

impl Router {
    /// Creates a new router builder with the identity decorator.
    pub fn builder() -> RouterBuilder<IdentityDecorator> {
        RouterBuilder::new()
    }

    /// Matches a path against the registered routes.
    ///
    /// A miss yields an empty `RouteResult`; the caller decides what a
    /// miss means (for the app, the documentation 404).
    pub fn at<'router, 'req>(&'router self, path: &'req str) -> RouteResult<'router, 'req> {
        self.inner_router
            .at(path)
            .map(|matched| RouteResult { router_items: matched.value.as_slice(), params: matched.params.into() })
            .map_err(|e| debug!("no route for '{}': {}", path, e))
            .unwrap_or(RouteResult::empty())
    }

    /// The documentation aggregated from all registered routes.
    pub fn docs(&self) -> &Arc<ApiDocs> {
        &self.docs
    }
}

impl RouterItem {
    pub fn filter(&self) -> &RouterFilter {
        self.filter.as_ref()
    }

    pub fn handler(&self) -> &dyn RequestHandler {
        self.handler.as_ref()
    }
}

impl<'router, 'req> RouteResult<'router, 'req> {
    fn empty() -> Self {
        Self { router_items: &[], params: PathParams::empty() }
    }

    /// Returns true if no routes were matched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.router_items.is_empty()
    }

    pub fn params(&self) -> &PathParams<'router, 'req> {
        &self.params
    }

    pub fn router_items(&self) -> &'router [RouterItem] {
        self.router_items
    }
}

pub struct RouterBuilder<D> {
    data: HashMap<String, Vec<RouterItemBuilder>>,
    overview: Option<String>,
    decorator: D,
}

impl RouterBuilder<IdentityDecorator> {
    fn new() -> Self {
        Self { data: HashMap::new(), overview: None, decorator: IdentityDecorator }
    }
}

impl<D> RouterBuilder<D> {
    /// Registers an item under a path. Paths use `matchit` syntax, so
    /// named segments are written `/users/{id}`.
    pub fn route(mut self, route: impl Into<String>, item_builder: RouterItemBuilder) -> Self {
        let vec = self.data.entry(route.into()).or_default();
        vec.push(item_builder);
        self
    }

    /// Sets the overview text of the generated documentation.
    pub fn overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    /// Wraps every registered handler with `decorator` at build time.
    pub fn with_global_decorator<D2>(self, decorator: D2) -> RouterBuilder<DecoratorComposer<D, D2>>
    where
        D: Decorator<Box<dyn RequestHandler>>,
        D2: Decorator<D::Out>,
    {
        RouterBuilder { data: self.data, overview: self.overview, decorator: self.decorator.and_then(decorator) }
    }

    /// Builds the router from the accumulated routes and decorators.
    ///
    /// # Panics
    /// Panics when a registered path is not a valid route pattern.
    pub fn build(self) -> Router
    where
        D: Decorator<Box<dyn RequestHandler>>,
        <D as Decorator<Box<dyn RequestHandler>>>::Out: RequestHandler + 'static,
    {
        let mut inner_router = InnerRouter::new();
        let mut routes = Vec::new();

        for (path, items) in self.data.into_iter() {
            let router_items = items
                .into_iter()
                .map(|item_builder| {
                    let (item, mut meta) = item_builder.build();
                    meta.path = path.clone();
                    routes.push(meta);
                    let handler = self.decorator.decorate(item.handler);
                    RouterItem { handler: Box::new(handler), ..item }
                })
                .collect::<Vec<_>>();

            inner_router.insert(path, router_items).unwrap();
        }

        routes.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
        Router { inner_router, docs: Arc::new(ApiDocs { overview: self.overview, routes }) }
    }
}

macro_rules! method_router_filter {
    ($method:ident, $method_name:ident, $method_str:literal) => {
        pub fn $method<H: RequestHandler + 'static>(handler: H) -> RouterItemBuilder {
            let mut filters = filter::all_filter();
            filters.and(filter::$method_name());
            RouterItemBuilder {
                filters,
                handler: Box::new(handler),
                meta: RouteMeta { method: $method_str.to_owned(), ..RouteMeta::default() },
            }
        }
    };
}

method_router_filter!(get, get_method, "GET");
method_router_filter!(post, post_method, "POST");
method_router_filter!(put, put_method, "PUT");
method_router_filter!(delete, delete_method, "DELETE");
method_router_filter!(head, head_method, "HEAD");
method_router_filter!(options, options_method, "OPTIONS");
method_router_filter!(connect, connect_method, "CONNECT");
method_router_filter!(patch, patch_method, "PATCH");
method_router_filter!(trace, trace_method, "TRACE");

pub struct RouterItemBuilder {
    filters: AllFilter,
    handler: Box<dyn RequestHandler>,
    meta: RouteMeta,
}

impl RouterItemBuilder {
    /// Adds a filter to this item's chain.
    pub fn with<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filters.and(filter);
        self
    }

    /// Restricts this item to requests carrying one of `versions`, and
    /// records the set in the documentation.
    pub fn versions<I: IntoIterator<Item = u32>>(mut self, versions: I) -> Self {
        let versions: BTreeSet<u32> = versions.into_iter().collect();
        self.filters.and(filter::version(versions.iter().copied()));
        self.meta.versions = Some(versions);
        self
    }

    /// Sets the usage text shown in the documentation.
    pub fn describe(mut self, usage: impl Into<String>) -> Self {
        self.meta.usage = Some(usage.into());
        self
    }

    /// Adds an example query string to the documentation.
    pub fn example(mut self, query: impl Into<String>) -> Self {
        self.meta.examples.push(query.into());
        self
    }

    /// Documents an accepted parameter with `T`'s type description.
    pub fn input<T: TypeDoc>(mut self, name: impl Into<String>) -> Self {
        self.meta.inputs.push(ParamDoc { name: name.into(), type_doc: T::type_doc(), default: None });
        self
    }

    /// Documents an accepted parameter together with its default value.
    pub fn input_with_default<T: TypeDoc>(mut self, name: impl Into<String>, default: impl Serialize) -> Self {
        let default = serde_json::to_value(default).unwrap_or(Value::Null);
        self.meta.inputs.push(ParamDoc { name: name.into(), type_doc: T::type_doc(), default: Some(default) });
        self
    }

    /// Overrides the documented output format.
    pub fn output_doc(mut self, output: OutputDoc) -> Self {
        self.meta.output = Some(output);
        self
    }

    fn build(self) -> (RouterItem, RouteMeta) {
        (RouterItem { filter: Box::new(self.filters), handler: self.handler }, self.meta)
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderValue, Method, Request};
    use serde_json::json;

    use super::{Router, get, post};
    use crate::filter::header;
    use crate::{PathParams, RequestContext, handler_fn};

    async fn simple_get_1(_method: &Method) -> String {
        "hello world".into()
    }

    async fn simple_get_2(_method: &Method) -> String {
        "hello world".into()
    }

    fn router() -> Router {
        Router::builder()
            .route("/", get(handler_fn(simple_get_1)))
            .route(
                "/",
                post(handler_fn(simple_get_1)).with(header(
                    http::header::CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                )),
            )
            .route("/", post(handler_fn(simple_get_1)))
            .route("/2", get(handler_fn(simple_get_2)))
            .build()
    }

    fn parts(builder: http::request::Builder) -> http::request::Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_route_get() {
        let router = router();
        let route_result = router.at("/");

        assert_eq!(route_result.params.len(), 0);

        let items = route_result.router_items;
        assert_eq!(items.len(), 3);

        let head = parts(Request::builder().method(Method::GET));
        let req_ctx = RequestContext::new(&head, PathParams::empty());

        assert!(items[0].filter.matches(&req_ctx));
        assert!(!items[1].filter.matches(&req_ctx));
        assert!(!items[2].filter.matches(&req_ctx));
    }

    #[test]
    fn test_route_post_with_content_type() {
        let router = router();
        let items = router.at("/").router_items;
        assert_eq!(items.len(), 3);

        let head = parts(
            Request::builder()
                .method(Method::POST)
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
        );
        let req_ctx = RequestContext::new(&head, PathParams::empty());

        assert!(!items[0].filter.matches(&req_ctx));
        assert!(items[1].filter.matches(&req_ctx));
        assert!(items[2].filter.matches(&req_ctx));
    }

    #[test]
    fn test_path_params_capture() {
        let router = Router::builder().route("/users/{id}", get(handler_fn(simple_get_1))).build();

        let route_result = router.at("/users/42");
        assert!(!route_result.is_empty());
        assert_eq!(route_result.params().get("id"), Some("42"));
    }

    #[test]
    fn test_versioned_item_matching() {
        let router = Router::builder()
            .route("/echo", get(handler_fn(simple_get_1)).versions([1]))
            .route("/echo", get(handler_fn(simple_get_2)).versions([2, 3]))
            .build();

        let items = router.at("/echo").router_items;
        assert_eq!(items.len(), 2);

        let head = parts(Request::builder().method(Method::GET));

        let v1 = RequestContext::new(&head, PathParams::empty()).with_api_version(Some(1));
        assert!(items[0].filter.matches(&v1));
        assert!(!items[1].filter.matches(&v1));

        let v3 = RequestContext::new(&head, PathParams::empty()).with_api_version(Some(3));
        assert!(!items[0].filter.matches(&v3));
        assert!(items[1].filter.matches(&v3));
    }

    #[test]
    fn test_metadata_feeds_docs() {
        let router = Router::builder()
            .overview("demo api")
            .route(
                "/hello",
                get(handler_fn(simple_get_1))
                    .describe("Says hello")
                    .example("name=world")
                    .input::<String>("name")
                    .input_with_default::<u32>("times", 1),
            )
            .build();

        let docs = router.docs().generate("http://localhost", None);
        assert_eq!(docs["overview"], json!("demo api"));
        let route = &docs["/hello"]["GET"];
        assert_eq!(route["usage"], json!("Says hello"));
        assert_eq!(route["examples"], json!(["http://localhost/hello?name=world"]));
        assert_eq!(route["inputs"]["name"]["type"], json!("Basic text / string value"));
        assert_eq!(route["inputs"]["times"]["default"], json!(1));
    }
}
