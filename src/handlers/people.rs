//! `/api/people` handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use people_core::{CreatedPerson, PersonId, PersonRecord};

use crate::dto::{ListQuery, PaginatedResponse, PersonBody};
use crate::error::ApiResult;
use crate::router::AppState;

pub async fn create_person(
    State(state): State<AppState>,
    body: Result<Json<PersonBody>, JsonRejection>,
) -> ApiResult<Json<CreatedPerson>> {
    let Json(body) = body?;
    Ok(Json(state.service.create(body.into()).await?))
}

pub async fn list_people(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<PaginatedResponse>> {
    let Query(query) = query?;
    let page = query.page_request()?;
    let result = state.service.list(&query.filter(), page).await?;
    Ok(Json(result.into()))
}

pub async fn get_person(
    State(state): State<AppState>,
    id: Result<Path<PersonId>, PathRejection>,
) -> ApiResult<Json<PersonRecord>> {
    let Path(id) = id?;
    Ok(Json(state.service.get_by_id(id).await?))
}

pub async fn update_person(
    State(state): State<AppState>,
    id: Result<Path<PersonId>, PathRejection>,
    body: Result<Json<PersonBody>, JsonRejection>,
) -> ApiResult<Json<PersonRecord>> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(Json(state.service.update(id, body.into()).await?))
}

pub async fn delete_person(
    State(state): State<AppState>,
    id: Result<Path<PersonId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
