pub use super::books::Entity as Books;
