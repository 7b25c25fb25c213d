// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{AppState, required_text};
use crate::error::{ApiError, ApiResult};
use crate::models::Category;
use crate::store;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Category>>> {
    let Query(q) = query?;
    let conn = state.conn();
    Ok(Json(store::categories::list(&conn, q.include_inactive)?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(body) = body?;
    let name = required_text(body.name, "name")?;
    let conn = state.conn();
    let cat = store::categories::create(&conn, &name)?;
    info!("created category {} '{}'", cat.id, cat.name);
    Ok((StatusCode::CREATED, Json(cat)))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let name = match body.name {
        Some(n) => Some(required_text(Some(n), "name")?),
        None => None,
    };
    if name.is_none() && body.is_active.is_none() {
        return Err(ApiError::missing("name"));
    }
    let conn = state.conn();
    store::categories::update(&conn, id, name.as_deref(), body.is_active)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", id)))
}

pub async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let conn = state.conn();
    if !store::categories::deactivate(&conn, id)? {
        return Err(ApiError::NotFound(format!("Category {} not found", id)));
    }
    info!("deactivated category {}", id);
    Ok(Json(json!({ "success": true, "id": id })))
}
