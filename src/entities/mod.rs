pub mod prelude;

pub mod books;
