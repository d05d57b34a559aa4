pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod store;
pub mod uploads;
pub mod validation;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{config::Config, store::FilmStore, uploads::UploadStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: FilmStore,
    pub uploads: UploadStore,
}

pub fn router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/films",
            get(routes::list_films)
                .post(routes::create_film)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/films/relations", get(routes::list_films_with_relations))
        .route(
            "/films/{id}",
            get(routes::film_detail)
                .put(routes::update_film)
                .patch(routes::update_film)
                .delete(routes::delete_film),
        )
        .route("/films/{id}/episodes", post(routes::create_episode))
        .route("/categories", get(routes::list_categories).post(routes::create_category))
        .nest_service("/uploads", uploads)
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
