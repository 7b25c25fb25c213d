// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::decimal_at;
use crate::models::{BudgetItem, MonthlyBudget};
use rusqlite::{Connection, params};

pub fn for_month(conn: &Connection, month: &str) -> rusqlite::Result<Vec<MonthlyBudget>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.month, b.category_id, c.name, b.budget_amount, b.created_at, b.updated_at
         FROM monthly_budgets b LEFT JOIN categories c ON b.category_id=c.id
         WHERE b.month=?1 ORDER BY c.name",
    )?;
    let rows = stmt.query_map(params![month], |r| {
        Ok(MonthlyBudget {
            id: r.get(0)?,
            month: r.get(1)?,
            category_id: r.get(2)?,
            category_name: r.get(3)?,
            budget_amount: decimal_at(r, 4)?,
            created_at: r.get(5)?,
            updated_at: r.get(6)?,
        })
    })?;
    rows.collect()
}

pub fn upsert(conn: &Connection, month: &str, item: &BudgetItem) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO monthly_budgets(month, category_id, budget_amount) VALUES (?1,?2,?3)
         ON CONFLICT(month, category_id) DO UPDATE
         SET budget_amount=excluded.budget_amount, updated_at=datetime('now')",
        params![month, item.category_id, item.budget_amount.to_string()],
    )?;
    Ok(())
}
