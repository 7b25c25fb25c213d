// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow, bail};
use budgetclip::client::api::{BudgetApi, TransactionInput};
use budgetclip::client::{Flow, Session, View, run};
use budgetclip::models::{BudgetItem, Category, MonthlyBudget, MonthlySummary, Source, Transaction};
use budgetclip::report;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::io::{Cursor, Write};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    budgets: Vec<MonthlyBudget>,
    next_id: i64,
}

#[derive(Default)]
struct FakeApi {
    state: RefCell<State>,
}

impl FakeApi {
    fn with_categories(names: &[&str]) -> Self {
        let api = FakeApi::default();
        for n in names {
            api.create_category(n).unwrap();
        }
        api
    }

    fn next_id(&self) -> i64 {
        let mut s = self.state.borrow_mut();
        s.next_id += 1;
        s.next_id
    }

    fn to_tx(&self, id: i64, tx: &TransactionInput, source: Source) -> Result<Transaction> {
        let date = NaiveDate::parse_from_str(&tx.date, "%Y-%m-%d")
            .map_err(|_| anyhow!("date must be YYYY-MM-DD (HTTP 400)"))?;
        let s = self.state.borrow();
        let cat = s
            .categories
            .iter()
            .find(|c| c.id == tx.category_id)
            .ok_or_else(|| anyhow!("Category {} does not exist (HTTP 400)", tx.category_id))?;
        Ok(Transaction {
            id,
            date,
            description: tx.description.clone(),
            amount: tx.amount,
            tx_type: tx.tx_type,
            category_id: tx.category_id,
            category_name: Some(cat.name.clone()),
            source,
            created_at: "2024-01-01 00:00:00".into(),
        })
    }
}

impl BudgetApi for FakeApi {
    fn categories(&self, include_inactive: bool) -> Result<Vec<Category>> {
        let mut cats: Vec<Category> = self
            .state
            .borrow()
            .categories
            .iter()
            .filter(|c| include_inactive || c.is_active)
            .cloned()
            .collect();
        cats.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cats)
    }

    fn create_category(&self, name: &str) -> Result<Category> {
        let id = self.next_id();
        let cat = Category {
            id,
            name: name.to_string(),
            is_active: true,
            created_at: "2024-01-01 00:00:00".into(),
        };
        self.state.borrow_mut().categories.push(cat.clone());
        Ok(cat)
    }

    fn rename_category(&self, id: i64, name: &str) -> Result<Category> {
        let mut s = self.state.borrow_mut();
        let cat = s
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow!("Category {} not found (HTTP 404)", id))?;
        cat.name = name.to_string();
        Ok(cat.clone())
    }

    fn deactivate_category(&self, id: i64) -> Result<()> {
        let mut s = self.state.borrow_mut();
        match s.categories.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.is_active = false;
                Ok(())
            }
            None => bail!("Category {} not found (HTTP 404)", id),
        }
    }

    fn transactions(&self, month: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .state
            .borrow()
            .transactions
            .iter()
            .filter(|t| t.date.format("%Y-%m").to_string() == month)
            .cloned()
            .collect())
    }

    fn create_transaction(&self, tx: &TransactionInput) -> Result<Transaction> {
        let id = self.next_id();
        let t = self.to_tx(id, tx, Source::Manual)?;
        self.state.borrow_mut().transactions.push(t.clone());
        Ok(t)
    }

    fn update_transaction(&self, id: i64, tx: &TransactionInput) -> Result<Transaction> {
        let t = self.to_tx(id, tx, Source::Manual)?;
        let mut s = self.state.borrow_mut();
        let slot = s
            .transactions
            .iter_mut()
            .find(|x| x.id == id)
            .ok_or_else(|| anyhow!("Transaction {} not found (HTTP 404)", id))?;
        *slot = t.clone();
        Ok(t)
    }

    fn delete_transaction(&self, id: i64) -> Result<()> {
        let mut s = self.state.borrow_mut();
        let before = s.transactions.len();
        s.transactions.retain(|t| t.id != id);
        if s.transactions.len() == before {
            bail!("Transaction {} not found (HTTP 404)", id);
        }
        Ok(())
    }

    fn import_transactions(&self, rows: &[TransactionInput]) -> Result<usize> {
        let mut imported = 0;
        for row in rows {
            let id = self.next_id();
            if let Ok(t) = self.to_tx(id, row, Source::Csv) {
                self.state.borrow_mut().transactions.push(t);
                imported += 1;
            }
        }
        Ok(imported)
    }

    fn budgets(&self, month: &str) -> Result<Vec<MonthlyBudget>> {
        Ok(self
            .state
            .borrow()
            .budgets
            .iter()
            .filter(|b| b.month == month)
            .cloned()
            .collect())
    }

    fn save_budgets(&self, month: &str, items: &[BudgetItem]) -> Result<Vec<MonthlyBudget>> {
        for item in items {
            let existing = self
                .state
                .borrow()
                .budgets
                .iter()
                .position(|b| b.month == month && b.category_id == item.category_id);
            match existing {
                Some(i) => self.state.borrow_mut().budgets[i].budget_amount = item.budget_amount,
                None => {
                    let id = self.next_id();
                    self.state.borrow_mut().budgets.push(MonthlyBudget {
                        id,
                        month: month.to_string(),
                        category_id: item.category_id,
                        category_name: None,
                        budget_amount: item.budget_amount,
                        created_at: String::new(),
                        updated_at: String::new(),
                    });
                }
            }
        }
        self.budgets(month)
    }

    fn summary(&self, month: &str) -> Result<MonthlySummary> {
        let s = self.state.borrow();
        Ok(report::summarize(
            month,
            &s.categories,
            &s.transactions,
            &s.budgets,
        )?)
    }
}

fn session(api: FakeApi) -> Session<FakeApi> {
    let mut s = Session::new(api, "2024-03").unwrap();
    s.refresh_categories().unwrap();
    s
}

fn step(s: &mut Session<FakeApi>, line: &str, answers: &str) -> Result<String> {
    let mut input = Cursor::new(answers.as_bytes().to_vec());
    let mut out = Vec::new();
    s.handle(line, &mut input, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn views_switch_and_month_moves() {
    let mut s = session(FakeApi::with_categories(&["Food"]));
    assert_eq!(s.view(), View::Dashboard);

    let out = step(&mut s, "budget", "").unwrap();
    assert_eq!(s.view(), View::Budget);
    assert!(out.contains("Budget: 2024-03"));

    step(&mut s, "prev", "").unwrap();
    assert_eq!(s.month(), "2024-02");
    step(&mut s, "next", "").unwrap();
    step(&mut s, "next", "").unwrap();
    assert_eq!(s.month(), "2024-04");
    assert_eq!(s.view(), View::Budget);

    step(&mut s, "month 2023-12", "").unwrap();
    assert_eq!(s.month(), "2023-12");
    assert!(step(&mut s, "month 2023-13", "").is_err());
    assert_eq!(s.month(), "2023-12");
}

#[test]
fn budget_set_resolves_category_by_name() {
    let mut s = session(FakeApi::with_categories(&["Eating Out", "Food"]));
    step(&mut s, "budget", "").unwrap();

    step(&mut s, "set eating out 120.50", "").unwrap();
    step(&mut s, "set Food 300", "").unwrap();
    step(&mut s, "set Food 320", "").unwrap();

    let budgets = s.api().budgets("2024-03").unwrap();
    assert_eq!(budgets.len(), 2);
    let food = s.resolve_category("food").unwrap();
    let row = budgets.iter().find(|b| b.category_id == food).unwrap();
    assert_eq!(row.budget_amount, Decimal::from(320));

    let err = step(&mut s, "set Travel 10", "").unwrap_err();
    assert!(err.to_string().contains("Unknown category"));
}

#[test]
fn add_form_uses_defaults_and_refreshes_view() {
    let mut s = session(FakeApi::with_categories(&["Food"]));
    step(&mut s, "transactions", "").unwrap();

    // blank date keeps the 1st of the viewed month; blank type keeps expense
    let out = step(&mut s, "add", "\nGroceries\n45.20\n\nfood\n").unwrap();
    assert!(out.contains("Added transaction"));
    assert!(out.contains("Groceries"));

    let txs = s.api().transactions("2024-03").unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date.to_string(), "2024-03-01");
    assert_eq!(txs[0].amount, "45.20".parse::<Decimal>().unwrap());
    assert_eq!(txs[0].source, Source::Manual);

    let id = txs[0].id;
    step(&mut s, &format!("edit {}", id), "\nGroceries + wine\n60\n\n\n").unwrap();
    let txs = s.api().transactions("2024-03").unwrap();
    assert_eq!(txs[0].description, "Groceries + wine");
    assert_eq!(txs[0].amount, Decimal::from(60));

    step(&mut s, &format!("rm {}", id), "").unwrap();
    assert!(s.api().transactions("2024-03").unwrap().is_empty());
}

#[test]
fn settings_changes_refresh_the_category_cache() {
    let mut s = session(FakeApi::with_categories(&["Food"]));
    step(&mut s, "settings", "").unwrap();

    step(&mut s, "add Travel", "").unwrap();
    assert!(s.resolve_category("travel").is_ok());

    let id = s.resolve_category("Travel").unwrap();
    step(&mut s, &format!("rename {} Trips", id), "").unwrap();
    assert!(s.resolve_category("Trips").is_ok());
    assert!(s.resolve_category("Travel").is_err());

    let out = step(&mut s, &format!("rm {}", id), "").unwrap();
    assert!(out.contains("inactive"));
    assert!(s.resolve_category("Trips").is_err());
    assert_eq!(s.categories().len(), 1);
}

#[test]
fn commands_are_scoped_to_their_view() {
    let mut s = session(FakeApi::with_categories(&["Food"]));
    let err = step(&mut s, "set Food 10", "").unwrap_err();
    assert!(err.to_string().contains("dashboard"));

    let mut input = Cursor::new(Vec::new());
    let mut out = Vec::new();
    assert_eq!(s.handle("quit", &mut input, &mut out).unwrap(), Flow::Quit);
    assert_eq!(s.handle("   ", &mut input, &mut out).unwrap(), Flow::Continue);
}

#[test]
fn import_maps_columns_and_reports_count() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "Posted,Payee,Debit\n2024-03-01,Rent,$1500.00\n03/04/2024,Coffee,3.50\nyesterday,Odd,5\n2024-03-09,Fee,n/a\n"
    )
    .unwrap();
    let path = file.path().display().to_string();

    let mut s = session(FakeApi::with_categories(&["Housing"]));
    step(&mut s, "transactions", "").unwrap();
    // accept guessed columns and expense type, then pick the category
    let out = step(&mut s, &format!("import {}", path), "Posted\n\n\n\nhousing\n").unwrap();
    assert!(out.contains("Columns: Posted, Payee, Debit"));
    assert!(out.contains("Imported 2 of 4 rows"));

    let txs = s.api().transactions("2024-03").unwrap();
    assert_eq!(txs.len(), 2);
    assert!(txs.iter().all(|t| t.source == Source::Csv));
}

#[test]
fn import_rejects_unknown_column() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Date,Memo,Amount\n2024-03-01,Rent,1500\n").unwrap();
    let path = file.path().display().to_string();

    let mut s = session(FakeApi::with_categories(&["Housing"]));
    step(&mut s, "transactions", "").unwrap();
    let err = step(&mut s, &format!("import {}", path), "When\n").unwrap_err();
    assert!(err.to_string().contains("No column named 'When'"));
    assert!(s.api().transactions("2024-03").unwrap().is_empty());
}

#[test]
fn run_loop_reports_errors_and_keeps_going() {
    let api = FakeApi::with_categories(&["Food"]);
    let mut s = Session::new(api, "2024-03").unwrap();
    let script = "bogus\nbudget\nset Food 50\nquit\nnext\n";
    let mut out = Vec::new();
    run(&mut s, Cursor::new(script.as_bytes().to_vec()), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Dashboard: 2024-03"));
    assert!(out.contains("Error: Unknown command 'bogus'"));
    assert!(out.contains("[2024-03 budget]> "));
    assert_eq!(s.month(), "2024-03");
    assert_eq!(s.api().budgets("2024-03").unwrap().len(), 1);
}
