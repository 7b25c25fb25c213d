// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{AppState, ensure_category, month_param, required};
use crate::error::{ApiError, ApiResult};
use crate::models::{BudgetItem, MonthlyBudget};
use crate::store;
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use log::info;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BudgetItemPayload {
    pub category_id: Option<i64>,
    pub budget_amount: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveBudgets {
    pub month: Option<String>,
    pub budgets: Option<Vec<BudgetItemPayload>>,
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MonthlyBudget>>> {
    let Query(q) = query?;
    let month = month_param(q.month)?;
    let conn = state.conn();
    Ok(Json(store::budgets::for_month(&conn, &month)?))
}

/// Upsert every pair for one month. All pairs are checked before the first
/// write; the response is the month's full budget list.
pub async fn save(
    State(state): State<AppState>,
    body: Result<Json<SaveBudgets>, JsonRejection>,
) -> ApiResult<Json<Vec<MonthlyBudget>>> {
    let Json(body) = body?;
    let month = month_param(body.month)?;
    let items = required(body.budgets, "budgets")?
        .into_iter()
        .map(|p| {
            let category_id = required(p.category_id, "category_id")?;
            let budget_amount = required(p.budget_amount, "budget_amount")?;
            if budget_amount.is_sign_negative() && !budget_amount.is_zero() {
                return Err(ApiError::validation("budget_amount must be non-negative"));
            }
            Ok(BudgetItem {
                category_id,
                budget_amount,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let conn = state.conn();
    for item in &items {
        ensure_category(&conn, item.category_id)?;
    }
    for item in &items {
        store::budgets::upsert(&conn, &month, item)?;
    }
    info!("saved {} budgets for {}", items.len(), month);
    Ok(Json(store::budgets::for_month(&conn, &month)?))
}
