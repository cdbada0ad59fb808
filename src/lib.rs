//! embrace aims to make writing an HTTP API as succinct as its written
//! definition, but no less explicit.
//!
//! Handlers are plain async functions. The framework resolves their
//! arguments from the request (typed query/form/json extraction, path
//! segments, directives like [`directive::Timer`]), dispatches by route,
//! method and API version, and renders their return values through
//! pluggable output formats. Route metadata registered alongside a
//! handler feeds an auto-generated JSON description of the whole API,
//! which is also what unmatched requests receive as a 404 body.
//!
//! The wire level is not implemented here: connections are driven by
//! hyper, the same way the routing layer of a WSGI framework leans on
//! the gateway underneath it.
//!
//! ```no_run
//! use embrace::{App, Server, Router, handler_fn};
//! use embrace::extract::Query;
//! use embrace::output::Json;
//! use embrace::router::get;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Params {
//!     name: String,
//! }
//!
//! /// Says hello
//! async fn hello(Query(params): Query<Params>) -> Json<String> {
//!     Json(format!("hello {}", params.name))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::builder()
//!         .route("/hello", get(handler_fn(hello)).describe("Says hello").example("name=world"))
//!         .build();
//!
//!     Server::builder()
//!         .router(router)
//!         .address(("127.0.0.1", 8000))
//!         .build()
//!         .unwrap()
//!         .start()
//!         .await;
//! }
//! ```

mod body;
mod fn_trait;
mod handler;
mod request;
mod responder;
mod server;
mod version;

pub mod date;
pub mod decorator;
pub mod directive;
pub mod docs;
pub mod error;
pub mod extract;
pub mod filter;
pub mod interceptor;
pub mod output;
pub mod router;
pub mod testing;
pub mod types;

pub use body::BoxError;
pub use body::OptionReqBody;
pub use body::ReqBody;
pub use body::ResponseBody;
pub use error::ExtractError;
pub use fn_trait::FnTrait;
pub use handler::FnHandler;
pub use handler::RequestHandler;
pub use handler::handler_fn;
pub use request::PathParams;
pub use request::RequestContext;
pub use responder::Responder;
pub use router::Router;
pub use server::App;
pub use server::AppBuilder;
pub use server::NotFoundHandler;
pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
