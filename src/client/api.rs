// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BudgetItem, Category, MonthlyBudget, MonthlySummary, Transaction, TxType};
use crate::utils::http_client;
use anyhow::{Context, Result, anyhow};
use reqwest::blocking::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Request body for creating, updating or importing a transaction. `date` is
/// kept as text so CSV rows with unparseable dates are sent as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub date: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub category_id: i64,
}

/// Everything the client needs from the server.
pub trait BudgetApi {
    fn categories(&self, include_inactive: bool) -> Result<Vec<Category>>;
    fn create_category(&self, name: &str) -> Result<Category>;
    fn rename_category(&self, id: i64, name: &str) -> Result<Category>;
    fn deactivate_category(&self, id: i64) -> Result<()>;

    fn transactions(&self, month: &str) -> Result<Vec<Transaction>>;
    fn create_transaction(&self, tx: &TransactionInput) -> Result<Transaction>;
    fn update_transaction(&self, id: i64, tx: &TransactionInput) -> Result<Transaction>;
    fn delete_transaction(&self, id: i64) -> Result<()>;
    fn import_transactions(&self, rows: &[TransactionInput]) -> Result<usize>;

    fn budgets(&self, month: &str) -> Result<Vec<MonthlyBudget>>;
    fn save_budgets(&self, month: &str, items: &[BudgetItem]) -> Result<Vec<MonthlyBudget>>;

    fn summary(&self, month: &str) -> Result<MonthlySummary>;
}

pub struct HttpApi {
    base: String,
    http: Client,
}

impl HttpApi {
    pub fn new(base: &str) -> Result<Self> {
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http: http_client()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn call<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req
            .send()
            .with_context(|| format!("Request to {} failed", self.base))?;
        let status = resp.status();
        if status.is_success() {
            return resp.json::<T>().context("Invalid JSON in response");
        }
        let body: Value = resp.json().unwrap_or(Value::Null);
        let msg = body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        Err(anyhow!("{} (HTTP {})", msg, status.as_u16()))
    }
}

impl BudgetApi for HttpApi {
    fn categories(&self, include_inactive: bool) -> Result<Vec<Category>> {
        let mut req = self.http.get(self.url("/api/categories"));
        if include_inactive {
            req = req.query(&[("include_inactive", "true")]);
        }
        self.call(req)
    }

    fn create_category(&self, name: &str) -> Result<Category> {
        self.call(
            self.http
                .post(self.url("/api/categories"))
                .json(&json!({ "name": name })),
        )
    }

    fn rename_category(&self, id: i64, name: &str) -> Result<Category> {
        self.call(
            self.http
                .put(self.url(&format!("/api/categories/{}", id)))
                .json(&json!({ "name": name })),
        )
    }

    fn deactivate_category(&self, id: i64) -> Result<()> {
        let _: Value = self.call(self.http.delete(self.url(&format!("/api/categories/{}", id))))?;
        Ok(())
    }

    fn transactions(&self, month: &str) -> Result<Vec<Transaction>> {
        self.call(
            self.http
                .get(self.url("/api/transactions"))
                .query(&[("month", month)]),
        )
    }

    fn create_transaction(&self, tx: &TransactionInput) -> Result<Transaction> {
        self.call(self.http.post(self.url("/api/transactions")).json(tx))
    }

    fn update_transaction(&self, id: i64, tx: &TransactionInput) -> Result<Transaction> {
        self.call(
            self.http
                .put(self.url(&format!("/api/transactions/{}", id)))
                .json(tx),
        )
    }

    fn delete_transaction(&self, id: i64) -> Result<()> {
        let _: Value =
            self.call(self.http.delete(self.url(&format!("/api/transactions/{}", id))))?;
        Ok(())
    }

    fn import_transactions(&self, rows: &[TransactionInput]) -> Result<usize> {
        let v: Value = self.call(
            self.http
                .post(self.url("/api/transactions/import"))
                .json(rows),
        )?;
        v.get("imported")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .context("Import response is missing 'imported'")
    }

    fn budgets(&self, month: &str) -> Result<Vec<MonthlyBudget>> {
        self.call(
            self.http
                .get(self.url("/api/budgets"))
                .query(&[("month", month)]),
        )
    }

    fn save_budgets(&self, month: &str, items: &[BudgetItem]) -> Result<Vec<MonthlyBudget>> {
        self.call(
            self.http
                .post(self.url("/api/budgets"))
                .json(&json!({ "month": month, "budgets": items })),
        )
    }

    fn summary(&self, month: &str) -> Result<MonthlySummary> {
        self.call(
            self.http
                .get(self.url("/api/reports/summary"))
                .query(&[("month", month)]),
        )
    }
}
