use serde::Serialize;

use crate::models::book::Book;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: String,
    pub discount_percentage: f64,
    pub final_price: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            published_year: book.published_year,
            price: book.price.to_string(),
            discount_percentage: book.discount_percentage,
            final_price: book.final_price().map(|price| price.to_string()),
            image_url: book.image_url.as_deref().map(public_image_url),
        }
    }
}

/// Browser-facing URL for a stored image path.
#[must_use]
pub fn public_image_url(path: &str) -> String {
    format!("/{}", path.replace('\\', "/").trim_start_matches('/'))
}
