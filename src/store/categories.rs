// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, name, is_active, created_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        is_active: r.get::<_, i64>(2)? != 0,
        created_at: r.get(3)?,
    })
}

pub fn list(conn: &Connection, include_inactive: bool) -> rusqlite::Result<Vec<Category>> {
    let sql = if include_inactive {
        format!("SELECT {} FROM categories ORDER BY name", COLUMNS)
    } else {
        format!(
            "SELECT {} FROM categories WHERE is_active=1 ORDER BY name",
            COLUMNS
        )
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

pub fn get(conn: &Connection, id: i64) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        &format!("SELECT {} FROM categories WHERE id=?1", COLUMNS),
        params![id],
        from_row,
    )
    .optional()
}

pub fn exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM categories WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

pub fn create(conn: &Connection, name: &str) -> rusqlite::Result<Category> {
    conn.execute("INSERT INTO categories(name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    get(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Rename and/or toggle a category. Returns `None` when the id is unknown.
pub fn update(
    conn: &Connection,
    id: i64,
    name: Option<&str>,
    is_active: Option<bool>,
) -> rusqlite::Result<Option<Category>> {
    if get(conn, id)?.is_none() {
        return Ok(None);
    }
    if let Some(name) = name {
        conn.execute(
            "UPDATE categories SET name=?1 WHERE id=?2",
            params![name, id],
        )?;
    }
    if let Some(active) = is_active {
        conn.execute(
            "UPDATE categories SET is_active=?1 WHERE id=?2",
            params![active as i64, id],
        )?;
    }
    get(conn, id)
}

/// Soft delete. The row and every transaction pointing at it stay in place.
pub fn deactivate(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let n = conn.execute(
        "UPDATE categories SET is_active=0 WHERE id=?1",
        params![id],
    )?;
    Ok(n > 0)
}
