//! Storage collaborator for books: the trait the service depends on and its SQLite implementation.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::{Book, BookId};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage failure: {0}")]
    Backend(String),
}

/// Table-level access to persisted books.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StorageError>;

    /// All books in insertion order
    async fn find_all(&self) -> Result<Vec<Book>, StorageError>;

    /// Inserts when the id is unassigned, otherwise replaces the whole record.
    /// Returns the stored book with its id assigned.
    async fn save(&self, book: Book) -> Result<Book, StorageError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, StorageError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), StorageError>;
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    genre: String,
    available: bool,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: BookId::Assigned(row.id),
            title: row.title,
            author: row.author,
            genre: row.genre,
            available: row.available,
        }
    }
}

/// `BookRepository` backed by the `books` table.
#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StorageError> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, author, genre, available FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Book::from))
    }

    async fn find_all(&self) -> Result<Vec<Book>, StorageError> {
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, author, genre, available FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn save(&self, book: Book) -> Result<Book, StorageError> {
        let id: i64 = match book.id {
            BookId::Unassigned => {
                sqlx::query_scalar(
                    "INSERT INTO books (title, author, genre, available) VALUES (?, ?, ?, ?) RETURNING id",
                )
                .bind(&book.title)
                .bind(&book.author)
                .bind(&book.genre)
                .bind(book.available)
                .fetch_one(&self.pool)
                .await?
            }
            BookId::Assigned(id) => {
                sqlx::query(
                    "INSERT INTO books (id, title, author, genre, available) VALUES (?, ?, ?, ?, ?) \
                     ON CONFLICT(id) DO UPDATE SET \
                     title = excluded.title, author = excluded.author, \
                     genre = excluded.genre, available = excluded.available",
                )
                .bind(id)
                .bind(&book.title)
                .bind(&book.author)
                .bind(&book.genre)
                .bind(book.available)
                .execute(&self.pool)
                .await?;
                id
            }
        };

        Ok(Book {
            id: BookId::Assigned(id),
            ..book
        })
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StorageError> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found != 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
