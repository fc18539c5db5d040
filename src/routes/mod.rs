//! Router assembly: common routes, one CRUD router per resource, and the middleware stack.

mod common;
mod resource;

pub use common::common_routes;
pub use resource::resource_routes;

use crate::config::AppConfig;
use crate::state::AppState;
use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Full application router. Trailing-slash removal must wrap this from outside (see the binary),
/// since it has to run before routing.
pub fn app_router(state: AppState, config: &AppConfig) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([
        Method::GET,
        Method::HEAD,
        Method::PUT,
        Method::PATCH,
        Method::POST,
        Method::DELETE,
    ]);

    Router::new()
        .merge(common_routes(state.clone()))
        .merge(resource_routes(state.students))
        .merge(resource_routes(state.teachers))
        .merge(resource_routes(state.courses))
        .merge(resource_routes(state.disciplines))
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
