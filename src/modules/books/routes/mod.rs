//! HTTP surface of the Books module.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::error::AppError;

use super::models::{Book, BookId};
use super::service::{BookError, BookService};

/// Routes relative to the module mount point (`/books` by default).
pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(service)
}

fn not_found(id: i64) -> AppError {
    AppError::not_found(BookError::NotFound(id).to_string())
}

fn internal(prefix: &str, e: BookError) -> AppError {
    AppError::internal(format!("{}{}", prefix, e))
}

/// 404 for a missing book, otherwise 500 with `prefix` before the failure message.
fn failed(id: i64, prefix: &str, e: BookError) -> AppError {
    match e {
        BookError::NotFound(_) => not_found(id),
        e => internal(prefix, e),
    }
}

async fn list_books(State(service): State<Arc<BookService>>) -> Result<Json<Vec<Book>>, AppError> {
    service
        .get_all_books()
        .await
        .map(Json)
        .map_err(|e| internal("Error: ", e))
}

async fn create_book(
    State(service): State<Arc<BookService>>,
    Json(mut book): Json<Book>,
) -> Result<(StatusCode, &'static str), AppError> {
    // New books always get a storage-assigned id.
    book.id = BookId::Unassigned;
    let message = service
        .save_book(book)
        .await
        .map_err(|e| internal("Error: ", e))?;
    Ok((StatusCode::CREATED, message))
}

async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    service
        .get_book(id)
        .await
        .map(Json)
        .map_err(|e| failed(id, "Error: ", e))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<i64>,
    Json(mut book): Json<Book>,
) -> Result<&'static str, AppError> {
    book.id = BookId::Assigned(id);
    service
        .update_book(book)
        .await
        .map_err(|e| failed(id, "Error updating the book: ", e))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<i64>,
) -> Result<&'static str, AppError> {
    service
        .delete_book(id)
        .await
        .map_err(|e| failed(id, "Error deleting the book: ", e))
}
