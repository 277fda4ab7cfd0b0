pub mod book_service;
pub mod book_service_impl;
pub mod image;

pub use book_service::{BookError, BookService};
pub use book_service_impl::SeaOrmBookService;
pub use image::{ImageError, ImageService, UploadedFile};
