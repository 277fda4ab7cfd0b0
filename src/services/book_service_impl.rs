//! `SeaORM` implementation of the `BookService` trait.

use crate::db::Store;
use crate::models::book::{Book, BookForm, ValidationErrors, fields};
use crate::services::book_service::{BookError, BookService};
use crate::services::image::{ImageError, ImageService, UploadedFile};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub struct SeaOrmBookService {
    store: Store,
    images: Arc<ImageService>,
}

impl SeaOrmBookService {
    #[must_use]
    pub const fn new(store: Store, images: Arc<ImageService>) -> Self {
        Self { store, images }
    }

    /// Stores the upload, if any. An unsupported file type is reported as a
    /// validation error on the image field.
    async fn store_image(&self, image: Option<&UploadedFile>) -> Result<Option<String>, BookError> {
        let Some(image) = image else {
            return Ok(None);
        };

        match self.images.store(image).await {
            Ok(path) => Ok(path),
            Err(e @ ImageError::UnsupportedFileType(_)) => Err(BookError::invalid(
                ValidationErrors::single(fields::IMAGE_FILE, e.to_string()),
            )),
            Err(ImageError::Io(e)) => Err(BookError::Storage(e.to_string())),
        }
    }
}

#[async_trait]
impl BookService for SeaOrmBookService {
    async fn list_books(&self) -> Result<Vec<Book>, BookError> {
        Ok(self.store.list_books().await?)
    }

    async fn get_book(&self, id: i32) -> Result<Book, BookError> {
        self.store
            .get_book(id)
            .await?
            .ok_or(BookError::NotFound(id))
    }

    async fn create_book(
        &self,
        form: &BookForm,
        image: Option<UploadedFile>,
    ) -> Result<Book, BookError> {
        let mut draft = form.validate().map_err(BookError::invalid)?;
        draft.image_url = self.store_image(image.as_ref()).await?;

        // No compensation: a stored image stays on disk if the write below fails.
        let book = match form.requested_id() {
            Some(id) => self.store.upsert_book(id, &draft).await?,
            None => self.store.add_book(&draft).await?,
        };

        info!(book_id = book.id, title = %book.title, "Book saved");
        Ok(book)
    }

    async fn update_book(
        &self,
        id: i32,
        form: &BookForm,
        image: Option<UploadedFile>,
    ) -> Result<Book, BookError> {
        let mut book = self.get_book(id).await?;

        let validated = match form.validate() {
            Ok(draft) => self
                .store_image(image.as_ref())
                .await
                .map(|new_image| (draft, new_image)),
            Err(errors) => Err(BookError::invalid(errors)),
        };
        let (draft, new_image) = match validated {
            Ok(validated) => validated,
            Err(BookError::Validation { errors, .. }) => {
                return Err(BookError::Validation {
                    errors,
                    current_image: book.image_url,
                });
            }
            Err(e) => return Err(e),
        };

        book.apply(draft);
        if let Some(path) = new_image {
            book.image_url = Some(path);
        }

        if !self.store.update_book(&book).await? {
            warn!(book_id = id, "Book vanished before update");
            return Err(BookError::NotFound(id));
        }

        info!(book_id = id, title = %book.title, "Book updated");
        Ok(book)
    }

    async fn delete_book(&self, id: i32) -> Result<(), BookError> {
        let book = self.get_book(id).await?;

        if let Some(image_url) = book.image_url.as_deref().filter(|url| !url.is_empty()) {
            self.images
                .delete(image_url)
                .await
                .map_err(|e| BookError::Storage(e.to_string()))?;
        }

        self.store.delete_book(id).await?;

        info!(book_id = id, "Book deleted");
        Ok(())
    }
}
