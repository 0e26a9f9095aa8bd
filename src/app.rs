use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, AppConfig};
use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::require_principal;

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

/// Build the application router using the global configuration
pub fn router(state: AppState) -> Router {
    router_with_config(state, config::config())
}

pub fn router_with_config(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(ingredient_routes())
        .merge(tag_routes())
        .merge(recipe_routes())
        // route_layer so unmatched paths stay 404 instead of 401
        .route_layer(from_fn_with_state(state, require_principal))
}

fn user_routes() -> Router<AppState> {
    use protected::user;

    Router::new().route("/api/user/me", get(user::me))
}

fn ingredient_routes() -> Router<AppState> {
    use protected::attributes::{self, Ingredients};

    Router::new()
        .route(
            "/api/recipe/ingredients",
            get(attributes::list::<Ingredients>).post(attributes::create::<Ingredients>),
        )
        .route(
            "/api/recipe/ingredients/:id",
            get(attributes::retrieve::<Ingredients>)
                .put(attributes::replace::<Ingredients>)
                .patch(attributes::patch::<Ingredients>)
                .delete(attributes::delete::<Ingredients>),
        )
}

fn tag_routes() -> Router<AppState> {
    use protected::attributes::{self, Tags};

    Router::new()
        .route(
            "/api/recipe/tags",
            get(attributes::list::<Tags>).post(attributes::create::<Tags>),
        )
        .route(
            "/api/recipe/tags/:id",
            get(attributes::retrieve::<Tags>)
                .put(attributes::replace::<Tags>)
                .patch(attributes::patch::<Tags>)
                .delete(attributes::delete::<Tags>),
        )
}

fn recipe_routes() -> Router<AppState> {
    use protected::recipes;

    Router::new()
        .route(
            "/api/recipe/recipes",
            get(recipes::list).post(recipes::create),
        )
        .route(
            "/api/recipe/recipes/:id",
            get(recipes::retrieve)
                .put(recipes::replace)
                .patch(recipes::patch)
                .delete(recipes::delete),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
