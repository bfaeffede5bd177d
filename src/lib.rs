//! Bookstore application library
//!
//! Application modules and the bootstrap sequence that wires them to the
//! database and HTTP server.

pub mod bootstrap;
pub mod modules;

/// Re-export commonly used types
pub use modules::books::{
    models::{Book, BookId},
    repository::{BookRepository, SqliteBookRepository, StorageError},
    service::{BookError, BookService},
};
