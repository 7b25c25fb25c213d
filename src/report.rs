// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly actual-vs-budget aggregation.

use crate::models::{
    Category, CategoryBreakdown, MonthlyBudget, MonthlySummary, Transaction, TxType,
};
use crate::store;
use crate::utils::month_of;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] rusqlite::Error),

    /// A running total left the range `Decimal` can hold.
    #[error("{what} for {month} exceeds the largest supported amount")]
    Overflow { what: &'static str, month: String },
}

fn accumulate(
    total: &mut Decimal,
    amount: Decimal,
    what: &'static str,
    month: &str,
) -> Result<(), ReportError> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| ReportError::Overflow {
            what,
            month: month.to_string(),
        })?;
    Ok(())
}

/// Join transactions and budgets for `month`. Rows outside the month are
/// ignored, so callers may pass whole tables.
///
/// Every active category gets a breakdown row. A deactivated category only
/// appears when it has expenses or a budget in `month`.
pub fn summarize(
    month: &str,
    categories: &[Category],
    transactions: &[Transaction],
    budgets: &[MonthlyBudget],
) -> Result<MonthlySummary, ReportError> {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut spent: HashMap<i64, Decimal> = HashMap::new();

    for t in transactions.iter().filter(|t| month_of(t.date) == month) {
        match t.tx_type {
            TxType::Income => accumulate(&mut total_income, t.amount, "Income total", month)?,
            TxType::Expense => {
                accumulate(&mut total_expenses, t.amount, "Expense total", month)?;
                let slot = spent.entry(t.category_id).or_insert(Decimal::ZERO);
                accumulate(slot, t.amount, "Category spend", month)?;
            }
        }
    }

    let planned: HashMap<i64, Decimal> = budgets
        .iter()
        .filter(|b| b.month == month)
        .map(|b| (b.category_id, b.budget_amount))
        .collect();

    // both sides are non-negative and in range, so differences cannot overflow
    let mut rows: Vec<CategoryBreakdown> = categories
        .iter()
        .filter(|c| {
            c.is_active || spent.contains_key(&c.id) || planned.contains_key(&c.id)
        })
        .map(|c| {
            let actual = spent.get(&c.id).copied().unwrap_or(Decimal::ZERO);
            let budget = planned.get(&c.id).copied().unwrap_or(Decimal::ZERO);
            CategoryBreakdown {
                category_id: c.id,
                name: c.name.clone(),
                is_active: c.is_active,
                actual,
                budget,
                remaining: budget - actual,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.actual.cmp(&a.actual).then_with(|| a.name.cmp(&b.name)));

    Ok(MonthlySummary {
        month: month.to_string(),
        total_income,
        total_expenses,
        net: total_income - total_expenses,
        categories: rows,
    })
}

pub fn monthly_summary(conn: &Connection, month: &str) -> Result<MonthlySummary, ReportError> {
    let categories = store::categories::list(conn, true)?;
    let transactions = store::transactions::for_month(conn, month)?;
    let budgets = store::budgets::for_month(conn, month)?;
    summarize(month, &categories, &transactions, &budgets)
}
