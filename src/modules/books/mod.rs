pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

use repository::{BookRepository, SqliteBookRepository};
use service::BookService;

/// Books module: CRUD over the `books` table
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>) -> Self {
        Self { service }
    }

    /// Schema owned by this module.
    pub fn migration_set() -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    title     TEXT    NOT NULL CHECK (title  <> ''),
                    author    TEXT    NOT NULL CHECK (author <> ''),
                    genre     TEXT    NOT NULL CHECK (genre  <> ''),
                    available BOOLEAN NOT NULL
                );
                "#,
        }]
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let text = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": { "text/plain": { "schema": { "type": "string" } } }
            })
        };
        let id_param = serde_json::json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
        let book_body = serde_json::json!({
            "required": true,
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/Book" } }
            }
        });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books in insertion order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": text("Storage failure")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": book_body.clone(),
                        "responses": {
                            "201": text("Book saved successfully!"),
                            "500": text("Error: {message}")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": text("Book not found with id: {id}")
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": book_body,
                        "responses": {
                            "200": text("Book updated successfully!"),
                            "404": text("Book not found with id: {id}"),
                            "500": text("Error updating the book: {message}")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": text("Book deleted successfully!"),
                            "404": text("Book not found with id: {id}"),
                            "500": text("Error deleting the book: {message}")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Storage-assigned identifier, absent for new books"
                            },
                            "title": { "type": "string", "description": "Title of the book" },
                            "author": { "type": "string", "description": "Author of the book" },
                            "genre": { "type": "string", "description": "Genre of the book" },
                            "available": {
                                "type": "boolean",
                                "description": "Whether the book can be lent out"
                            }
                        },
                        "required": ["title", "author", "genre", "available"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        Self::migration_set()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module over the given storage collaborator
pub fn create_module(repository: Arc<dyn BookRepository>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(Arc::new(BookService::new(repository))))
}

/// Create the books module backed by the SQLite `books` table
pub fn create_sqlite_module(pool: SqlitePool) -> Arc<dyn Module> {
    create_module(Arc::new(SqliteBookRepository::new(pool)))
}
