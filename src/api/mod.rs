use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{BookService, ImageService};
use crate::state::SharedState;

mod books;
mod catalog;
mod error;
pub mod form;
mod home;
mod types;
mod validation;
pub mod views;

pub use error::{ApiError, PageError};
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn book_service(&self) -> &Arc<dyn BookService> {
        &self.shared.book_service
    }

    #[must_use]
    pub fn image_service(&self) -> &Arc<ImageService> {
        &self.shared.image_service
    }
}

pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.config().read().await.server.max_upload_mb * 1024 * 1024;
    let images_dir = state.image_service().images_dir();

    let api_router = Router::new()
        .route("/books", get(catalog::list_books))
        .route("/books/{id}", get(catalog::get_book))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home::index))
        .route("/Home", get(home::index))
        .route("/Home/Index", get(home::index))
        .route("/Home/Privacy", get(home::privacy))
        .route("/Books", get(books::index))
        .route("/Books/Index", get(books::index))
        .route("/Books/Details/{id}", get(books::details))
        .route(
            "/Books/Create",
            get(books::create_form).post(books::create),
        )
        .route(
            "/Books/Edit/{id}",
            get(books::edit_form).post(books::edit),
        )
        .route(
            "/Books/Delete/{id}",
            get(books::delete_confirmation).post(books::delete),
        )
        .with_state(state)
        .nest("/api", api_router)
        .nest_service("/images", ServeDir::new(images_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
