// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Parameterized SQL over the three budgeting tables. Every function takes a
//! borrowed connection and runs independently committed statements.

pub mod budgets;
pub mod categories;
pub mod transactions;

use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Money columns are stored as TEXT; read one back as a `Decimal`.
pub(crate) fn decimal_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    Decimal::from_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parsed_at<T>(r: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let s: String = r.get(idx)?;
    T::from_str(&s).map_err(|e| {
        let e: Box<dyn std::error::Error + Send + Sync> = e.into();
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e)
    })
}
