use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bookstore_db::RowId;
use bookstore_http::{AppError, PathParam, ValidatedJson};

use super::models::{BookDto, CreateBookForm, UpdateBookForm};
use super::service::BookService;

/// HTTP routes for the Books module, relative to `/api/books`.
pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{book_id}",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn list_books(State(service): State<Arc<BookService>>) -> Json<Vec<BookDto>> {
    tracing::info!("getting all books");
    let books = service.list_all().await;
    Json(books.into_iter().map(BookDto::from).collect())
}

async fn get_book(
    State(service): State<Arc<BookService>>,
    PathParam(book_id): PathParam<RowId>,
) -> Result<Json<BookDto>, AppError> {
    let book = service.get_by_id(book_id).await?;
    Ok(Json(book.into()))
}

async fn create_book(
    State(service): State<Arc<BookService>>,
    ValidatedJson(form): ValidatedJson<CreateBookForm>,
) -> Result<impl IntoResponse, AppError> {
    let book = service.create(form).await?;
    let location = format!("/api/books/{}", book.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BookDto::from(book)),
    ))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    PathParam(book_id): PathParam<RowId>,
    ValidatedJson(form): ValidatedJson<UpdateBookForm>,
) -> Result<Json<BookDto>, AppError> {
    let book = service.update_by_id(book_id, form).await?;
    Ok(Json(book.into()))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    PathParam(book_id): PathParam<RowId>,
) -> Result<StatusCode, AppError> {
    service.delete_by_id(book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
