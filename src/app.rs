use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, Environment};
use crate::database::Store;
use crate::handlers::{protected, public, system};
use crate::middleware::{reject_oversized_body, require_auth};
use crate::services::{ResourceService, UserService};

/// Shared handler state; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub users: UserService,
    pub resources: ResourceService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            users: UserService::new(store.clone()),
            resources: ResourceService::new(store.clone()),
            store,
        }
    }
}

/// Full HTTP surface with global middleware
pub fn app(state: AppState) -> Router {
    let cfg = config::config();

    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(user_routes(state.clone()))
        .merge(recipe_routes(state.clone()))
        .fallback(system::not_found)
        .layer(DefaultBodyLimit::max(cfg.api.max_request_size_bytes))
        .layer(from_fn(reject_oversized_body));

    if cfg.security.enable_cors {
        router = router.layer(cors_layer());
    }
    if cfg.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

// The auth layer is attached per method router rather than with
// `route_layer`, so it also wraps the 405 fallback: anonymous callers get
// 401 for every verb and only authenticated callers see 405.
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/users/create",
            post(public::users::create).fallback(system::method_not_allowed),
        )
        .route(
            "/users/token",
            post(public::users::token).fallback(system::method_not_allowed),
        )
        .route(
            "/users/me",
            get(protected::me::get)
                .patch(protected::me::patch)
                .put(protected::me::put)
                .fallback(system::method_not_allowed)
                .layer(from_fn_with_state(state, require_auth)),
        )
}

fn recipe_routes(state: AppState) -> Router<AppState> {
    use protected::recipe;

    Router::new()
        .route(
            "/recipe/tags",
            get(recipe::list_tags)
                .post(recipe::create_tag)
                .fallback(system::method_not_allowed)
                .layer(from_fn_with_state(state.clone(), require_auth)),
        )
        .route(
            "/recipe/ingredients",
            get(recipe::list_ingredients)
                .post(recipe::create_ingredient)
                .fallback(system::method_not_allowed)
                .layer(from_fn_with_state(state, require_auth)),
        )
}

fn cors_layer() -> CorsLayer {
    let cfg = config::config();
    if cfg.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cfg
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
