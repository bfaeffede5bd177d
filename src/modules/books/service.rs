//! Business rules for books: existence checks and failure translation.

use std::sync::Arc;

use tracing::Span;

use super::models::{Book, BookId};
use super::repository::{BookRepository, StorageError};

pub const SAVED: &str = "Book saved successfully!";
pub const UPDATED: &str = "Book updated successfully!";
pub const DELETED: &str = "Book deleted successfully!";

/// Domain outcome of a failed book operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("Book not found with id: {0}")]
    NotFound(i64),

    #[error("{0}")]
    ServiceFailure(String),
}

impl BookError {
    fn failure(message: &str) -> Self {
        BookError::ServiceFailure(message.to_string())
    }
}

pub struct BookService {
    repository: Arc<dyn BookRepository>,
    span: Span,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self::with_span(repository, tracing::info_span!("book_service"))
    }

    /// Build a service whose log lines are emitted under `span`.
    pub fn with_span(repository: Arc<dyn BookRepository>, span: Span) -> Self {
        Self { repository, span }
    }

    pub async fn save_book(&self, book: Book) -> Result<&'static str, BookError> {
        match self.repository.save(book).await {
            Ok(saved) => {
                tracing::info!(parent: &self.span, id = ?saved.id.get(), "{}", SAVED);
                Ok(SAVED)
            }
            Err(e) => {
                tracing::error!(parent: &self.span, "Failed to save the book: {}", e);
                Err(BookError::failure("Failed to save the book"))
            }
        }
    }

    pub async fn get_book(&self, id: i64) -> Result<Book, BookError> {
        match self.repository.find_by_id(id).await {
            Ok(Some(book)) => Ok(book),
            Ok(None) => Err(BookError::NotFound(id)),
            Err(e) => {
                tracing::error!(parent: &self.span, id, "Failed to load the book: {}", e);
                Err(BookError::failure("Failed to load the book"))
            }
        }
    }

    pub async fn get_all_books(&self) -> Result<Vec<Book>, BookError> {
        self.repository.find_all().await.map_err(|e| {
            tracing::error!(parent: &self.span, "Failed to list the books: {}", e);
            BookError::failure("Failed to list the books")
        })
    }

    /// Replace an existing book. The id must be assigned and already stored.
    pub async fn update_book(&self, book: Book) -> Result<&'static str, BookError> {
        let id = match book.id {
            BookId::Assigned(id) => id,
            BookId::Unassigned => {
                tracing::error!(parent: &self.span, "Failed to update the book: missing id");
                return Err(BookError::failure("Book ID cannot be null"));
            }
        };

        let wrap = |e: StorageError| {
            tracing::error!(parent: &self.span, id, "Failed to update the book: {}", e);
            BookError::failure("Failed to update the book")
        };

        if !self.repository.exists_by_id(id).await.map_err(wrap)? {
            tracing::error!(parent: &self.span, id, "Failed to update the book: not found");
            return Err(BookError::NotFound(id));
        }

        self.repository.save(book).await.map_err(wrap)?;
        tracing::info!(parent: &self.span, id, "{}", UPDATED);
        Ok(UPDATED)
    }

    pub async fn delete_book(&self, id: i64) -> Result<&'static str, BookError> {
        let wrap = |e: StorageError| {
            tracing::error!(parent: &self.span, id, "Failed to delete the book: {}", e);
            BookError::failure("Failed to delete the book")
        };

        if !self.repository.exists_by_id(id).await.map_err(wrap)? {
            return Err(BookError::NotFound(id));
        }

        self.repository.delete_by_id(id).await.map_err(wrap)?;
        tracing::info!(parent: &self.span, id, "{}", DELETED);
        Ok(DELETED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted repository that records which operations were invoked.
    #[derive(Default)]
    struct ScriptedRepository {
        stored: Option<Book>,
        exists: bool,
        fail_exists: bool,
        fail_save: bool,
        fail_delete: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedRepository {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl BookRepository for ScriptedRepository {
        async fn find_by_id(&self, _id: i64) -> Result<Option<Book>, StorageError> {
            self.record("find_by_id");
            Ok(self.stored.clone())
        }

        async fn find_all(&self) -> Result<Vec<Book>, StorageError> {
            self.record("find_all");
            Ok(self.stored.clone().into_iter().collect())
        }

        async fn save(&self, book: Book) -> Result<Book, StorageError> {
            self.record("save");
            if self.fail_save {
                return Err(StorageError::Backend("Test Exception".into()));
            }
            Ok(book)
        }

        async fn exists_by_id(&self, _id: i64) -> Result<bool, StorageError> {
            self.record("exists_by_id");
            if self.fail_exists {
                return Err(StorageError::Backend("Test Exception".into()));
            }
            Ok(self.exists)
        }

        async fn delete_by_id(&self, _id: i64) -> Result<(), StorageError> {
            self.record("delete_by_id");
            if self.fail_delete {
                return Err(StorageError::Backend("Test Exception".into()));
            }
            Ok(())
        }
    }

    fn service(repository: ScriptedRepository) -> (BookService, Arc<ScriptedRepository>) {
        let repository = Arc::new(repository);
        (BookService::new(repository.clone()), repository)
    }

    fn sample() -> Book {
        Book::new("Test Book", "Test Author", "Test Genre", true)
    }

    #[tokio::test]
    async fn save_book_success() {
        let (service, repo) = service(ScriptedRepository::default());

        assert_eq!(service.save_book(sample()).await, Ok(SAVED));
        assert_eq!(repo.calls(), vec!["save"]);
    }

    #[tokio::test]
    async fn save_book_failure_is_wrapped() {
        let (service, _) = service(ScriptedRepository {
            fail_save: true,
            ..Default::default()
        });

        assert_eq!(
            service.save_book(sample()).await,
            Err(BookError::ServiceFailure("Failed to save the book".into()))
        );
    }

    #[tokio::test]
    async fn get_book_found_and_missing() {
        let book = sample().with_id(1);
        let (found, _) = service(ScriptedRepository {
            stored: Some(book.clone()),
            ..Default::default()
        });
        assert_eq!(found.get_book(1).await, Ok(book));

        let (missing, _) = service(ScriptedRepository::default());
        let err = missing.get_book(1).await.unwrap_err();
        assert_eq!(err, BookError::NotFound(1));
        assert_eq!(err.to_string(), "Book not found with id: 1");
    }

    #[tokio::test]
    async fn get_all_books_may_be_empty() {
        let (service, repo) = service(ScriptedRepository::default());
        assert_eq!(service.get_all_books().await, Ok(vec![]));
        assert_eq!(repo.calls(), vec!["find_all"]);
    }

    #[tokio::test]
    async fn update_book_success() {
        let (service, repo) = service(ScriptedRepository {
            exists: true,
            ..Default::default()
        });

        assert_eq!(service.update_book(sample().with_id(1)).await, Ok(UPDATED));
        assert_eq!(repo.calls(), vec!["exists_by_id", "save"]);
    }

    #[tokio::test]
    async fn update_book_not_found_never_saves() {
        let (service, repo) = service(ScriptedRepository::default());

        assert_eq!(
            service.update_book(sample().with_id(1)).await,
            Err(BookError::NotFound(1))
        );
        assert_eq!(repo.calls(), vec!["exists_by_id"]);
    }

    #[tokio::test]
    async fn update_book_requires_id() {
        let (service, repo) = service(ScriptedRepository::default());

        assert_eq!(
            service.update_book(sample()).await,
            Err(BookError::ServiceFailure("Book ID cannot be null".into()))
        );
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn update_book_failure_is_wrapped() {
        let (service, _) = service(ScriptedRepository {
            exists: true,
            fail_save: true,
            ..Default::default()
        });

        assert_eq!(
            service.update_book(sample().with_id(1)).await,
            Err(BookError::ServiceFailure("Failed to update the book".into()))
        );
    }

    #[tokio::test]
    async fn delete_book_success() {
        let (service, repo) = service(ScriptedRepository {
            exists: true,
            ..Default::default()
        });

        assert_eq!(service.delete_book(1).await, Ok(DELETED));
        assert_eq!(repo.calls(), vec!["exists_by_id", "delete_by_id"]);
    }

    #[tokio::test]
    async fn delete_book_not_found_never_deletes() {
        let (service, repo) = service(ScriptedRepository::default());

        assert_eq!(service.delete_book(1).await, Err(BookError::NotFound(1)));
        assert_eq!(repo.calls(), vec!["exists_by_id"]);
    }

    #[tokio::test]
    async fn delete_book_failure_is_wrapped() {
        let (service, _) = service(ScriptedRepository {
            exists: true,
            fail_delete: true,
            ..Default::default()
        });

        assert_eq!(
            service.delete_book(1).await,
            Err(BookError::ServiceFailure("Failed to delete the book".into()))
        );
    }

    #[tokio::test]
    async fn existence_check_failure_is_wrapped() {
        let (service, repo) = service(ScriptedRepository {
            fail_exists: true,
            ..Default::default()
        });

        assert_eq!(
            service.update_book(sample().with_id(1)).await,
            Err(BookError::ServiceFailure("Failed to update the book".into()))
        );
        assert_eq!(
            service.delete_book(1).await,
            Err(BookError::ServiceFailure("Failed to delete the book".into()))
        );
        assert_eq!(repo.calls(), vec!["exists_by_id", "exists_by_id"]);
    }
}
