//! User CRUD handlers.
//!
//! Replace, patch and delete look the record up first and answer 404 before
//! touching storage. The lookup and the write are separate storage calls, so
//! a concurrent delete between them is not detected: the write then silently
//! does nothing and the handler still reports success.

use axum::{
    Json,
    extract::{
        OriginalUri, Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::pagination::{PageParams, total_pages};
use crate::api::state::AppState;
use crate::user::{User, UserPage, UserPatch, UserPayload, is_valid_email};

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("invalid id: '{raw}'")))
}

fn path_id(path: Result<Path<String>, PathRejection>) -> ApiResult<i64> {
    let Path(raw) = path?;
    parse_id(&raw)
}

async fn require_user(state: &AppState, id: i64) -> ApiResult<User> {
    state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))
}

/// List users, one page at a time.
#[instrument(skip(state, uri, query))]
pub async fn list_users(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult<Json<UserPage>> {
    let params = PageParams::from_query(&query)?;

    let (users, total) = state
        .users
        .list_users_paged(params.limit, params.offset)
        .await?;

    let total_pages = total_pages(total, params.limit);
    let (next, prev) = params.links(uri.path(), &query, total_pages);

    info!(
        page = params.page,
        limit = params.limit,
        count = users.len(),
        total,
        "Listed users"
    );

    Ok(Json(UserPage {
        data: users,
        page: params.page,
        limit: params.limit,
        total,
        total_pages,
        next,
        prev,
    }))
}

/// Get a single user.
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<User>> {
    let id = path_id(path)?;
    require_user(&state, id).await.map(Json)
}

/// Create a user. Nothing is checked here; uniqueness is enforced by storage
/// and surfaces as a server error.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(payload) = payload?;

    let user = state.users.create_user(payload).await?;

    info!(user_id = user.id, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Replace a user.
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let id = path_id(path)?;
    require_user(&state, id).await?;

    let Json(payload) = payload?;
    let user = payload.with_id(id);
    state.users.update_user(&user).await?;

    info!(user_id = id, "Replaced user");
    Ok(Json(user))
}

/// Partially update a user.
#[instrument(skip(state, payload))]
pub async fn patch_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let id = path_id(path)?;
    let mut user = require_user(&state, id).await?;

    let Json(patch) = payload?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("no fields to update"));
    }
    if let Some(email) = &patch.email
        && !is_valid_email(email)
    {
        return Err(ApiError::bad_request("invalid email format"));
    }

    patch.apply(&mut user);
    state.users.update_user(&user).await?;

    info!(user_id = id, "Patched user");
    Ok(Json(user))
}

/// Delete a user.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(path)?;
    require_user(&state, id).await?;

    state.users.delete_user(id).await?;

    info!(user_id = id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
