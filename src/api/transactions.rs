// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{AppState, ensure_category, required, required_text};
use crate::error::{ApiError, ApiResult};
use crate::models::{NewTransaction, Source, Transaction, TxType};
use crate::store;
use crate::store::transactions::TransactionFilter;
use crate::utils::parse_date;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub month: Option<String>,
    pub category_id: Option<i64>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub limit: Option<u32>,
}

/// Body of a create/update request and of one import element. Everything is
/// optional here so missing fields turn into descriptive 400s.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPayload {
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub category_id: Option<i64>,
}

impl TransactionPayload {
    pub fn validate(self, source: Source) -> ApiResult<NewTransaction> {
        let raw_date = required_text(self.date, "date")?;
        let date = parse_date(&raw_date).map_err(|e| ApiError::validation(e.to_string()))?;
        let description = required_text(self.description, "description")?;
        let amount = required(self.amount, "amount")?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ApiError::validation("amount must be non-negative"));
        }
        let tx_type = required_text(self.tx_type, "type")?
            .parse::<TxType>()
            .map_err(ApiError::Validation)?;
        let category_id = required(self.category_id, "category_id")?;
        Ok(NewTransaction {
            date,
            description,
            amount,
            tx_type,
            category_id,
            source,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let Query(q) = query?;
    let month = match q.month.filter(|m| !m.trim().is_empty()) {
        Some(m) => Some(super::month_param(Some(m))?),
        None => None,
    };
    let tx_type = match q.tx_type {
        Some(t) => Some(t.parse::<TxType>().map_err(ApiError::Validation)?),
        None => None,
    };
    let filter = TransactionFilter {
        month,
        category_id: q.category_id,
        tx_type,
        limit: q.limit,
    };
    let conn = state.conn();
    Ok(Json(store::transactions::list(&conn, &filter)?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<TransactionPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(body) = body?;
    let tx = body.validate(Source::Manual)?;
    let conn = state.conn();
    ensure_category(&conn, tx.category_id)?;
    let id = store::transactions::insert(&conn, &tx)?;
    let saved = store::transactions::get(&conn, id)?
        .ok_or_else(|| ApiError::Store(format!("transaction {} vanished after insert", id)))?;
    info!("created transaction {} ({} {})", id, saved.tx_type, saved.amount);
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TransactionPayload>, JsonRejection>,
) -> ApiResult<Json<Transaction>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let tx = body.validate(Source::Manual)?;
    let conn = state.conn();
    ensure_category(&conn, tx.category_id)?;
    if !store::transactions::update(&conn, id, &tx)? {
        return Err(ApiError::NotFound(format!("Transaction {} not found", id)));
    }
    store::transactions::get(&conn, id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Transaction {} not found", id)))
}

pub async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let conn = state.conn();
    if !store::transactions::delete(&conn, id)? {
        return Err(ApiError::NotFound(format!("Transaction {} not found", id)));
    }
    info!("deleted transaction {}", id);
    Ok(Json(json!({ "success": true, "id": id })))
}

/// Best-effort bulk insert. Each element is checked on its own and invalid
/// ones are skipped; rows are committed one at a time, so a store failure
/// leaves the earlier rows in place.
pub async fn import(
    State(state): State<AppState>,
    body: Result<Json<Vec<Value>>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(rows) = body?;
    let conn = state.conn();
    let mut imported = 0usize;
    let mut skipped = 0usize;

    for (idx, raw) in rows.into_iter().enumerate() {
        let checked = serde_json::from_value::<TransactionPayload>(raw)
            .map_err(|e| ApiError::validation(e.to_string()))
            .and_then(|p| p.validate(Source::Csv));
        let tx = match checked {
            Ok(tx) => tx,
            Err(e) => {
                debug!("import row {} skipped: {}", idx, e);
                skipped += 1;
                continue;
            }
        };
        if !store::categories::exists(&conn, tx.category_id)? {
            debug!("import row {} skipped: unknown category {}", idx, tx.category_id);
            skipped += 1;
            continue;
        }
        store::transactions::insert(&conn, &tx)?;
        imported += 1;
    }

    info!("imported {} transactions ({} skipped)", imported, skipped);
    Ok(Json(json!({ "imported": imported, "skipped": skipped })))
}
