// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use rust_decimal::{Decimal, RoundingStrategy};

const UA: &str = concat!(
    "budgetclip/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/budgetclip)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    if s.len() != 7 {
        anyhow::bail!("Invalid month '{}', expected YYYY-MM", s);
    }
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn current_month() -> String {
    month_of(chrono::Local::now().date_naive())
}

/// Move a `YYYY-MM` key by `delta` months.
pub fn shift_month(month: &str, delta: i32) -> Result<String> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", parse_month(month)?), "%Y-%m-%d")?;
    let idx = first.year() * 12 + first.month0() as i32 + delta;
    let d = NaiveDate::from_ymd_opt(idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1, 1)
        .with_context(|| format!("Month out of range: {} {:+}", month, delta))?;
    Ok(month_of(d))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!(
        "{:.2}",
        d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Like `pretty_table`, with the given columns right-aligned.
pub fn money_table(headers: &[&str], rows: Vec<Vec<String>>, numeric: &[usize]) -> Table {
    let mut t = pretty_table(headers, rows);
    for idx in numeric {
        if let Some(col) = t.column_mut(*idx) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_month_crosses_years() {
        assert_eq!(shift_month("2024-01", -1).unwrap(), "2023-12");
        assert_eq!(shift_month("2024-12", 1).unwrap(), "2025-01");
        assert_eq!(shift_month("2024-03", 0).unwrap(), "2024-03");
    }

    #[test]
    fn parse_month_rejects_bad_keys() {
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("2024-3").is_err());
        assert!(parse_month("March").is_err());
        assert_eq!(parse_month(" 2024-03 ").unwrap(), "2024-03");
    }

    #[test]
    fn money_is_two_places() {
        assert_eq!(fmt_money(&"1500".parse().unwrap()), "1500.00");
        assert_eq!(fmt_money(&"12.345".parse().unwrap()), "12.35");
    }
}
