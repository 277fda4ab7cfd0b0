use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::error::PageError;
use super::form::BookSubmission;
use super::views::{self, FormMode};
use super::AppState;
use crate::models::book::{BookForm, ValidationErrors};
use crate::services::BookError;

const INDEX: &str = "/Books";

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let books = state.book_service().list_books().await?;
    Ok(Html(views::book_list(&books)))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Html<String>, PageError> {
    let book = state.book_service().get_book(id).await?;
    Ok(Html(views::book_details(&book)))
}

pub async fn create_form() -> Html<String> {
    Html(views::book_form(
        FormMode::Create,
        &BookForm::default(),
        &ValidationErrors::default(),
        None,
    ))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let BookSubmission { form, image } = BookSubmission::from_multipart(multipart).await?;

    match state.book_service().create_book(&form, image).await {
        Ok(_) => Ok(Redirect::to(INDEX).into_response()),
        Err(BookError::Validation { errors, .. }) => Ok(form_with_errors(
            FormMode::Create,
            &form,
            &errors,
            None,
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Html<String>, PageError> {
    let book = state.book_service().get_book(id).await?;
    Ok(Html(views::book_form(
        FormMode::Edit(id),
        &BookForm::from_book(&book),
        &ValidationErrors::default(),
        book.image_url.as_deref(),
    )))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let BookSubmission { form, image } = BookSubmission::from_multipart(multipart).await?;

    match state.book_service().update_book(id, &form, image).await {
        Ok(_) => Ok(Redirect::to(INDEX).into_response()),
        Err(BookError::Validation {
            errors,
            current_image,
        }) => Ok(form_with_errors(
            FormMode::Edit(id),
            &form,
            &errors,
            current_image.as_deref(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_confirmation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Html<String>, PageError> {
    let book = state.book_service().get_book(id).await?;
    Ok(Html(views::delete_confirmation(&book)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Redirect, PageError> {
    state.book_service().delete_book(id).await?;
    Ok(Redirect::to(INDEX))
}

fn form_with_errors(
    mode: FormMode,
    form: &BookForm,
    errors: &ValidationErrors,
    current_image: Option<&str>,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::book_form(mode, form, errors, current_image)),
    )
        .into_response()
}
