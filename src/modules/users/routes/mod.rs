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

use super::models::{CreateUserForm, UpdateUserForm, UserDto};
use super::service::UserService;

/// HTTP routes for the Users module, relative to `/api/users`.
pub fn router(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{user_id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .with_state(service)
}

async fn list_users(State(service): State<Arc<UserService>>) -> Json<Vec<UserDto>> {
    tracing::info!("getting all users");
    let users = service.list_all().await;
    Json(users.into_iter().map(UserDto::from).collect())
}

async fn get_user(
    State(service): State<Arc<UserService>>,
    PathParam(user_id): PathParam<RowId>,
) -> Result<Json<UserDto>, AppError> {
    let user = service.get_by_id(user_id).await?;
    Ok(Json(user.into()))
}

async fn create_user(
    State(service): State<Arc<UserService>>,
    ValidatedJson(form): ValidatedJson<CreateUserForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = service.create(form).await?;
    let location = format!("/api/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserDto::from(user)),
    ))
}

async fn update_user(
    State(service): State<Arc<UserService>>,
    PathParam(user_id): PathParam<RowId>,
    ValidatedJson(form): ValidatedJson<UpdateUserForm>,
) -> Result<Json<UserDto>, AppError> {
    let user = service.update_by_id(user_id, form).await?;
    Ok(Json(user.into()))
}

async fn delete_user(
    State(service): State<Arc<UserService>>,
    PathParam(user_id): PathParam<RowId>,
) -> Result<StatusCode, AppError> {
    service.delete_by_id(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
