// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{decimal_at, parsed_at};
use crate::models::{NewTransaction, Transaction, TxType};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SELECT: &str = "SELECT t.id, t.date, t.description, t.amount, t.type, t.category_id, \
                      c.name, t.source, t.created_at \
                      FROM transactions t LEFT JOIN categories c ON t.category_id=c.id";

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub month: Option<String>,
    pub category_id: Option<i64>,
    pub tx_type: Option<TxType>,
    pub limit: Option<u32>,
}

fn from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        description: r.get(2)?,
        amount: decimal_at(r, 3)?,
        tx_type: parsed_at(r, 4)?,
        category_id: r.get(5)?,
        category_name: r.get(6)?,
        source: parsed_at(r, 7)?,
        created_at: r.get(8)?,
    })
}

pub fn list(conn: &Connection, filter: &TransactionFilter) -> rusqlite::Result<Vec<Transaction>> {
    let mut sql = format!("{} WHERE 1=1", SELECT);
    let mut values: Vec<Value> = Vec::new();

    if let Some(month) = &filter.month {
        sql.push_str(" AND substr(t.date,1,7)=?");
        values.push(Value::Text(month.clone()));
    }
    if let Some(cat) = filter.category_id {
        sql.push_str(" AND t.category_id=?");
        values.push(Value::Integer(cat));
    }
    if let Some(kind) = filter.tx_type {
        sql.push_str(" AND t.type=?");
        values.push(Value::Text(kind.as_str().to_string()));
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        values.push(Value::Integer(i64::from(limit)));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(values), from_row)?;
    rows.collect()
}

pub fn for_month(conn: &Connection, month: &str) -> rusqlite::Result<Vec<Transaction>> {
    list(
        conn,
        &TransactionFilter {
            month: Some(month.to_string()),
            ..Default::default()
        },
    )
}

pub fn get(conn: &Connection, id: i64) -> rusqlite::Result<Option<Transaction>> {
    conn.query_row(&format!("{} WHERE t.id=?1", SELECT), params![id], from_row)
        .optional()
}

pub fn insert(conn: &Connection, tx: &NewTransaction) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, category_id, source)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tx.date.to_string(),
            tx.description,
            tx.amount.to_string(),
            tx.tx_type.as_str(),
            tx.category_id,
            tx.source.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite the editable fields in place; `source` and `created_at` stay.
pub fn update(conn: &Connection, id: i64, tx: &NewTransaction) -> rusqlite::Result<bool> {
    let n = conn.execute(
        "UPDATE transactions SET date=?1, description=?2, amount=?3, type=?4, category_id=?5
         WHERE id=?6",
        params![
            tx.date.to_string(),
            tx.description,
            tx.amount.to_string(),
            tx.tx_type.as_str(),
            tx.category_id,
            id,
        ],
    )?;
    Ok(n > 0)
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(n > 0)
}
