// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turning a bank CSV export into import rows.

use super::api::TransactionInput;
use crate::models::TxType;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

static AMOUNT_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Sc}\s,]").unwrap());

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Header row plus one map per data row, keyed by header.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

/// Which CSV headers feed which transaction fields.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub date: String,
    pub description: String,
    pub amount: String,
}

/// Applied to every imported row.
#[derive(Debug, Clone, Copy)]
pub struct ImportDefaults {
    pub tx_type: TxType,
    pub category_id: i64,
}

/// Plain comma split: no quoting or escaping, short rows padded with "".
pub fn parse_csv(text: &str) -> Result<CsvTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .context("Read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec.context("Read CSV row")?;
        if rec.iter().all(str::is_empty) {
            continue;
        }
        let row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), rec.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}

/// Normalize a date in any common layout to `YYYY-MM-DD`. Anything
/// unrecognised comes back unchanged (trimmed).
pub fn normalize_date(raw: &str) -> String {
    let s = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.format("%Y-%m-%d").to_string();
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    s.to_string()
}

/// Strip currency symbols, whitespace and thousands separators, drop the
/// sign. Any other stray character makes the amount unparseable.
pub fn clean_amount(raw: &str) -> Option<Decimal> {
    let digits = AMOUNT_NOISE.replace_all(raw, "");
    Decimal::from_str(&digits).ok().map(|d| d.abs())
}

pub fn map_rows(
    table: &CsvTable,
    mapping: &ColumnMapping,
    defaults: &ImportDefaults,
) -> Vec<TransactionInput> {
    let field = |row: &HashMap<String, String>, key: &str| -> String {
        row.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
    };

    table
        .rows
        .iter()
        .filter_map(|row| {
            let date = field(row, &mapping.date);
            let description = field(row, &mapping.description);
            if date.is_empty() || description.is_empty() {
                return None;
            }
            let amount = clean_amount(&field(row, &mapping.amount))?;
            Some(TransactionInput {
                date: normalize_date(&date),
                description,
                amount,
                tx_type: defaults.tx_type,
                category_id: defaults.category_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_lose_symbols_separators_and_sign() {
        assert_eq!(clean_amount("$1,200.50"), Some("1200.50".parse().unwrap()));
        assert_eq!(clean_amount("-45.10 €"), Some("45.10".parse().unwrap()));
        assert_eq!(clean_amount("£ 3"), Some(Decimal::from(3)));
        assert_eq!(clean_amount("n/a"), None);
        assert_eq!(clean_amount(""), None);
    }

    #[test]
    fn amounts_with_other_text_are_rejected() {
        assert_eq!(clean_amount("1e3"), None);
        assert_eq!(clean_amount("Ref 12 USD"), None);
        assert_eq!(clean_amount("-45.10 EUR"), None);
        assert_eq!(clean_amount("12.50 (pending)"), None);
    }

    #[test]
    fn dates_normalize_or_pass_through() {
        assert_eq!(normalize_date("2024-03-01"), "2024-03-01");
        assert_eq!(normalize_date("03/15/2024"), "2024-03-15");
        assert_eq!(normalize_date("2024/03/15"), "2024-03-15");
        assert_eq!(normalize_date("Mar 5, 2024"), "2024-03-05");
        assert_eq!(normalize_date("2024-03-05T10:20:00Z"), "2024-03-05");
        assert_eq!(normalize_date(" someday "), "someday");
    }

    #[test]
    fn parse_pads_short_rows_and_skips_blank_lines() {
        let t = parse_csv("Date,Memo,Amount\n2024-03-01,Coffee\n\n2024-03-02,Tea,4\n").unwrap();
        assert_eq!(t.headers, vec!["Date", "Memo", "Amount"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0]["Amount"], "");
        assert_eq!(t.rows[1]["Amount"], "4");
    }
}
