use axum::{extract::State, response::Html};
use std::sync::Arc;

use super::AppState;
use super::error::PageError;
use super::views;

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let books = state.book_service().list_books().await?;
    Ok(Html(views::home(&books)))
}

pub async fn privacy() -> Html<String> {
    Html(views::privacy())
}
