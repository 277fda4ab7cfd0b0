//! Domain service for the book catalog.
//!
//! Each operation is one guarded request workflow: validate, touch the
//! image store when needed, then hit the persistence gateway.

use crate::models::book::{Book, BookForm, ValidationErrors};
use crate::services::image::UploadedFile;
use thiserror::Error;

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("Book {0} not found")]
    NotFound(i32),

    /// `current_image` is the cover the book still has, for re-rendering
    /// a rejected edit.
    #[error("Validation failed: {errors}")]
    Validation {
        errors: ValidationErrors,
        current_image: Option<String>,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Image storage error: {0}")]
    Storage(String),
}

impl BookError {
    #[must_use]
    pub const fn invalid(errors: ValidationErrors) -> Self {
        Self::Validation {
            errors,
            current_image: None,
        }
    }
}

impl From<sea_orm::DbErr> for BookError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<anyhow::Error> for BookError {
    fn from(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }
}

/// Domain service trait for the book catalog.
#[async_trait::async_trait]
pub trait BookService: Send + Sync {
    /// Lists every book. An empty catalog is an empty list.
    async fn list_books(&self) -> Result<Vec<Book>, BookError>;

    /// Gets a book by id.
    async fn get_book(&self, id: i32) -> Result<Book, BookError>;

    /// Validates and stores a new book. A form carrying the id of an
    /// existing book overwrites it.
    async fn create_book(
        &self,
        form: &BookForm,
        image: Option<UploadedFile>,
    ) -> Result<Book, BookError>;

    /// Replaces the scalar fields of an existing book. The cover image is
    /// only replaced when a new one is supplied.
    async fn update_book(
        &self,
        id: i32,
        form: &BookForm,
        image: Option<UploadedFile>,
    ) -> Result<Book, BookError>;

    /// Removes a book and its cover image.
    async fn delete_book(&self, id: i32) -> Result<(), BookError>;
}
