use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use thiserror::Error;
use std::net::ToSocketAddrs;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};

use crate::body::{BoxError, OptionReqBody, ReqBody, ResponseBody};
use crate::docs::ApiDocs;
use crate::handler::RequestHandler;
use crate::interceptor::{Interceptor, Interceptors};
use crate::output::Json;
use crate::request::RequestContext;
use crate::responder::Responder;
use crate::router::Router;
use crate::version;

/// The gateway-facing application: routing, dispatch and middleware,
/// independent of any listening socket.
///
/// [`App::handle`] is a complete request round trip, which is what the
/// [`crate::testing`] helpers call directly.
pub struct App {
    router: Router,
    default_handler: Box<dyn RequestHandler>,
    interceptors: Interceptors,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// Serves one request to completion.
    ///
    /// The request version is taken from a leading `/v{N}` path segment
    /// or the `X-Api-Version` header (the path wins), and the prefix is
    /// stripped before route matching. Among the items registered for
    /// the matched path, the first whose filter accepts the request is
    /// invoked; with no match the default handler answers.
    pub async fn handle(&self, req: Request<ReqBody>, remote_addr: Option<SocketAddr>) -> Response<ResponseBody> {
        let received_at = Instant::now();
        let (parts, body) = req.into_parts();
        let mut req_body = OptionReqBody::from(body);

        let (api_version, path) = version::extract(parts.uri.path(), &parts.headers);
        let route_result = self.router.at(path);

        let mut request_context = RequestContext::new(&parts, route_result.params().clone())
            .with_api_version(api_version)
            .with_remote_addr(remote_addr)
            .with_received_at(received_at);

        let handler = route_result
            .router_items()
            .iter()
            .filter(|item| item.filter().matches(&request_context))
            .map(|item| item.handler())
            .take(1)
            .next()
            .unwrap_or(self.default_handler.as_ref());

        self.interceptors.on_request(&mut request_context, &mut req_body).await;
        let mut response = handler.invoke(&mut request_context, req_body).await;
        self.interceptors.on_response(&request_context, &mut response).await;
        response
    }

    /// The documentation aggregated from the app's routes.
    pub fn docs(&self) -> &Arc<ApiDocs> {
        self.router.docs()
    }
}

pub struct AppBuilder {
    router: Option<Router>,
    default_handler: Option<Box<dyn RequestHandler>>,
    interceptors: Interceptors,
}

impl AppBuilder {
    fn new() -> Self {
        Self { router: None, default_handler: None, interceptors: Interceptors::builder().build() }
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Replaces the documentation 404 with a custom handler.
    pub fn default_handler(mut self, request_handler: impl RequestHandler + 'static) -> Self {
        self.default_handler = Some(Box::new(request_handler));
        self
    }

    pub fn interceptors(mut self, interceptors: Interceptors) -> Self {
        self.interceptors = interceptors;
        self
    }

    pub fn build(self) -> Result<App, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let default_handler = self
            .default_handler
            .unwrap_or_else(|| Box::new(NotFoundHandler { docs: Arc::clone(router.docs()) }));
        Ok(App { router, default_handler, interceptors: self.interceptors })
    }
}

/// The default handler for unmatched requests: answers 404 with a
/// definition of the whole API.
pub struct NotFoundHandler {
    docs: Arc<ApiDocs>,
}

#[async_trait]
impl RequestHandler for NotFoundHandler {
    async fn invoke(&self, req: &mut RequestContext<'_, '_>, _req_body: OptionReqBody) -> Response<ResponseBody> {
        let base_url = req
            .headers()
            .get(http::header::HOST)
            .and_then(|host| host.to_str().ok())
            .map(|host| format!("http://{host}"))
            .unwrap_or_default();
        let documentation = self.docs.generate(&base_url, req.api_version());
        let body = json!({
            "404": "The API call you tried to make was not defined. Here's a definition of the API to help you get going :)",
            "documentation": documentation,
        });
        (StatusCode::NOT_FOUND, Json(body)).response_to(req)
    }
}

pub struct ServerBuilder {
    app: AppBuilder,
    address: Option<Result<Vec<SocketAddr>, ServerBuildError>>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { app: AppBuilder::new(), address: None }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address =
            Some(address.to_socket_addrs().map(|addrs| addrs.collect()).map_err(ServerBuildError::from));
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.app = self.app.router(router);
        self
    }

    pub fn default_handler(mut self, request_handler: impl RequestHandler + 'static) -> Self {
        self.app = self.app.default_handler(request_handler);
        self
    }

    pub fn interceptors(mut self, interceptors: Interceptors) -> Self {
        self.app = self.app.interceptors(interceptors);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let app = self.app.build()?;
        let address = self.address.ok_or(ServerBuildError::MissingAddress)??;
        Ok(Server { app: Arc::new(app), address })
    }
}

pub struct Server {
    app: Arc<App>,
    address: Vec<SocketAddr>,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("address must be set")]
    MissingAddress,
    #[error("invalid listen address: {0}")]
    InvalidAddress(#[from] std::io::Error),
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Binds the listener and serves connections until the task is
    /// cancelled. Installs a global `tracing` subscriber unless one is
    /// already set.
    pub async fn start(self) {
        let _ = tracing_subscriber::fmt().with_max_level(Level::INFO).try_init();

        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return;
            }
        };

        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let app = Arc::clone(&self.app);

            tokio::spawn(async move {
                let io = TokioIo::new(tcp_stream);
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let app = Arc::clone(&app);
                    async move {
                        let req = req.map(|body| body.map_err(|e| Box::new(e) as BoxError).boxed_unsync());
                        Ok::<_, std::convert::Infallible>(app.handle(req, Some(remote_addr)).await)
                    }
                });
                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    error!(cause = %e, "connection error, shutdown");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use http::{HeaderValue, Response, StatusCode};
    use serde::Deserialize;
    use serde_json::{Value, json};

    use crate::directive::{ApiVersion, Timer};
    use crate::extract::Query;
    use crate::interceptor::{Interceptor, Interceptors};
    use crate::output::Json;
    use crate::router::{Router, get, post};
    use crate::testing;
    use crate::{App, OptionReqBody, RequestContext, ResponseBody, handler_fn};

    #[derive(Deserialize)]
    struct EchoParams {
        text: String,
    }

    async fn echo(Query(params): Query<EchoParams>) -> Json<Value> {
        Json(json!({ "message": params.text }))
    }

    async fn echo_v2(Query(params): Query<EchoParams>) -> Json<Value> {
        Json(json!({ "message": params.text.to_uppercase() }))
    }

    async fn whoami(version: ApiVersion, timer: Timer) -> Json<Value> {
        let _ = timer.elapsed();
        Json(json!({ "version": version.0 }))
    }

    #[derive(Deserialize)]
    struct CreateUser {
        name: String,
    }

    async fn create_user(crate::extract::Json(user): crate::extract::Json<CreateUser>) -> (StatusCode, Json<Value>) {
        (StatusCode::CREATED, Json(json!({ "created": user.name })))
    }

    fn app() -> App {
        let router = Router::builder()
            .overview("test api")
            .route("/echo", get(handler_fn(echo_v2)).versions([2]))
            .route("/echo", get(handler_fn(echo)).describe("Echoes text").example("text=hi").input::<String>("text"))
            .route("/whoami", get(handler_fn(whoami)))
            .route("/users", post(handler_fn(create_user)))
            .build();
        App::builder().router(router).build().unwrap()
    }

    #[tokio::test]
    async fn query_extraction_round_trip() {
        let response = testing::get("/echo?text=hi").send(&app()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "application/json");
        assert_eq!(response.json()["message"], "hi");
    }

    #[tokio::test]
    async fn missing_parameter_is_a_400_with_errors_map() {
        let response = testing::get("/echo").send(&app()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["errors"]["text"], "Required parameter not supplied");
    }

    #[tokio::test]
    async fn version_dispatch_by_path_prefix() {
        let app = app();

        let v2 = testing::get("/v2/echo?text=hi").send(&app).await;
        assert_eq!(v2.json()["message"], "HI");

        // an unversioned item serves any version it is asked under
        let v9 = testing::get("/v9/echo?text=hi").send(&app).await;
        assert_eq!(v9.json()["message"], "hi");

        let bare = testing::get("/echo?text=hi").send(&app).await;
        assert_eq!(bare.json()["message"], "hi");
    }

    #[tokio::test]
    async fn version_dispatch_by_header() {
        let response = testing::get("/echo?text=hi").api_version(2).send(&app()).await;
        assert_eq!(response.json()["message"], "HI");
    }

    #[tokio::test]
    async fn directives_resolve_during_dispatch() {
        let response = testing::get("/v3/whoami").send(&app()).await;
        assert_eq!(response.json()["version"], 3);
    }

    #[tokio::test]
    async fn json_body_extraction() {
        let response = testing::post("/users").json(&json!({ "name": "ada" })).send(&app()).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.json()["created"], "ada");
    }

    #[tokio::test]
    async fn wrong_content_type_is_a_415() {
        let response = testing::post("/users").body("text/plain", "name=ada").send(&app()).await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn unmatched_request_gets_the_documentation_404() {
        let response = testing::get("/nope").send(&app()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.json();
        assert_eq!(
            body["404"],
            "The API call you tried to make was not defined. Here's a definition of the API to help you get going :)"
        );
        assert_eq!(body["documentation"]["overview"], "test api");
    }

    struct TagResponse;

    #[async_trait]
    impl Interceptor for TagResponse {
        async fn on_response(&self, _req: &RequestContext, resp: &mut Response<ResponseBody>) {
            resp.headers_mut().insert("x-served-by", HeaderValue::from_static("embrace"));
        }
    }

    #[tokio::test]
    async fn response_interceptors_cover_the_404_path() {
        let router = Router::builder().route("/echo", get(handler_fn(echo))).build();
        let app = App::builder()
            .router(router)
            .interceptors(Interceptors::builder().add_last(TagResponse).build())
            .build()
            .unwrap();

        let hit = testing::get("/echo?text=hi").send(&app).await;
        assert_eq!(hit.headers()["x-served-by"], "embrace");

        let miss = testing::get("/nope").send(&app).await;
        assert_eq!(miss.status(), StatusCode::NOT_FOUND);
        assert_eq!(miss.headers()["x-served-by"], "embrace");
    }

    #[tokio::test]
    async fn global_decorator_wraps_every_route() {
        let router = Router::builder()
            .route("/echo", get(handler_fn(echo)))
            .with_global_decorator(crate::date::DateDecorator)
            .build();
        let app = App::builder().router(router).build().unwrap();

        let response = testing::get("/echo?text=hi").send(&app).await;
        assert!(response.headers().contains_key(http::header::DATE));
    }

    #[test]
    fn app_requires_a_router() {
        assert!(App::builder().build().is_err());
    }
}
