use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, BookDto};
use crate::api::validation::validate_book_id;

pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BookDto>>>, ApiError> {
    let books = state.book_service().list_books().await?;
    let dtos = books.iter().map(BookDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookDto>>, ApiError> {
    let id = validate_book_id(id)?;
    let book = state.book_service().get_book(id).await?;

    Ok(Json(ApiResponse::success(BookDto::from(&book))))
}
