// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{AppState, budgets::MonthQuery, month_param};
use crate::error::ApiResult;
use crate::models::MonthlySummary;
use crate::report;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

pub async fn summary(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<MonthlySummary>> {
    let Query(q) = query?;
    let month = month_param(q.month)?;
    let conn = state.conn();
    Ok(Json(report::monthly_summary(&conn, &month)?))
}
