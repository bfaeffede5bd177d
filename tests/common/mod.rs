#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bookstore_app::{Book, BookId, BookRepository, StorageError};
use bookstore_kernel::{settings::Settings, ModuleRegistry};
use tower::ServiceExt;

/// Router over a migrated in-memory SQLite database.
pub async fn sqlite_app() -> Router {
    let mut settings = Settings::default();
    settings.database.url = "sqlite::memory:".to_string();

    let (pool, registry) = bookstore_app::bootstrap::prepare(&settings).await.unwrap();
    bookstore_db::migrate(&pool, &registry.collect_migrations())
        .await
        .unwrap();
    bookstore_http::build_router(&registry, &settings)
}

/// Router over the given repository.
pub fn app_with(repository: Arc<dyn BookRepository>) -> Router {
    let mut registry = ModuleRegistry::new();
    registry.register(bookstore_app::modules::books::create_module(repository));
    bookstore_http::build_router(&registry, &Settings::default())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, String) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// In-memory repository that journals calls and can be told to fail.
#[derive(Default)]
pub struct RecordingRepository {
    books: Mutex<BTreeMap<i64, Book>>,
    calls: Mutex<Vec<&'static str>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl RecordingRepository {
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let repository = Self::default();
        {
            let mut stored = repository.books.lock().unwrap();
            for book in books {
                let id = book.id.get().expect("seeded books carry ids");
                stored.insert(id, book);
            }
        }
        repository
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_reads(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            Err(StorageError::Backend("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BookRepository for RecordingRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StorageError> {
        self.record("find_by_id");
        self.check(&self.fail_reads)?;
        Ok(self.books.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Book>, StorageError> {
        self.record("find_all");
        self.check(&self.fail_reads)?;
        Ok(self.books.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, book: Book) -> Result<Book, StorageError> {
        self.record("save");
        self.check(&self.fail_writes)?;
        let mut books = self.books.lock().unwrap();
        let id = match book.id {
            BookId::Assigned(id) => id,
            BookId::Unassigned => books.keys().next_back().map_or(1, |last| last + 1),
        };
        let stored = Book {
            id: BookId::Assigned(id),
            ..book
        };
        books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StorageError> {
        self.record("exists_by_id");
        self.check(&self.fail_reads)?;
        Ok(self.books.lock().unwrap().contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StorageError> {
        self.record("delete_by_id");
        self.check(&self.fail_writes)?;
        self.books.lock().unwrap().remove(&id);
        Ok(())
    }
}
