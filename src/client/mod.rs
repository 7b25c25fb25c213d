// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Interactive terminal client.
//!
//! Four views (dashboard, budget, transactions, settings) are switched by
//! command. Each view fetches its own data when shown; the only state kept
//! between views is the month cursor and the active category cache held in
//! [`Session`].

pub mod api;
pub mod csv_import;
pub mod render;

use crate::models::{BudgetItem, Category, Transaction, TxType};
use crate::utils::{current_month, parse_decimal, parse_month, shift_month};
use anyhow::{Context, Result, anyhow, bail};
use api::{BudgetApi, TransactionInput};
use csv_import::{ColumnMapping, ImportDefaults};
use std::fmt;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Budget,
    Transactions,
    Settings,
}

impl View {
    fn parse(s: &str) -> Option<View> {
        match s {
            "dashboard" => Some(View::Dashboard),
            "budget" => Some(View::Budget),
            "transactions" => Some(View::Transactions),
            "settings" => Some(View::Settings),
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            View::Dashboard => "dashboard",
            View::Budget => "budget",
            View::Transactions => "transactions",
            View::Settings => "settings",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<A> {
    api: A,
    month: String,
    categories: Vec<Category>,
    view: View,
}

impl<A: BudgetApi> Session<A> {
    pub fn new(api: A, month: &str) -> Result<Self> {
        Ok(Self {
            api,
            month: parse_month(month)?,
            categories: Vec::new(),
            view: View::Dashboard,
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Active categories as of the last refresh.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn refresh_categories(&mut self) -> Result<()> {
        self.categories = self.api.categories(false)?;
        Ok(())
    }

    pub fn show(&mut self, view: View) -> Result<String> {
        self.view = view;
        self.render()
    }

    /// Fetch what the current view needs and draw it.
    pub fn render(&self) -> Result<String> {
        match self.view {
            View::Dashboard => Ok(render::dashboard(&self.api.summary(&self.month)?)),
            View::Budget => {
                let budgets = self.api.budgets(&self.month)?;
                let summary = self.api.summary(&self.month)?;
                Ok(render::budget(&self.month, &self.categories, &budgets, &summary))
            }
            View::Transactions => {
                let txs = self.api.transactions(&self.month)?;
                Ok(render::transactions(&self.month, &txs))
            }
            View::Settings => Ok(render::settings(&self.api.categories(true)?)),
        }
    }

    pub fn set_month(&mut self, month: &str) -> Result<String> {
        self.month = parse_month(month)?;
        self.render()
    }

    pub fn shift_month(&mut self, delta: i32) -> Result<String> {
        self.month = shift_month(&self.month, delta)?;
        self.render()
    }

    /// Look a category up by name (case-insensitive) or id in the cache.
    pub fn resolve_category(&self, token: &str) -> Result<i64> {
        let token = token.trim();
        if let Some(c) = self
            .categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(token))
        {
            return Ok(c.id);
        }
        if let Ok(id) = token.parse::<i64>() {
            if self.categories.iter().any(|c| c.id == id) {
                return Ok(id);
            }
        }
        bail!("Unknown category '{}'", token)
    }

    pub fn handle<R: BufRead, W: Write>(
        &mut self,
        line: &str,
        input: &mut R,
        out: &mut W,
    ) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        let text = match cmd {
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "help" | "?" => help(self.view),
            "prev" => self.shift_month(-1)?,
            "next" => self.shift_month(1)?,
            "month" => {
                let m = args.first().context("Usage: month YYYY-MM")?;
                self.set_month(m)?
            }
            other => match View::parse(other) {
                Some(view) => self.show(view)?,
                None => self.view_command(cmd, args, input, out)?,
            },
        };
        writeln!(out, "{}", text.trim_end())?;
        Ok(Flow::Continue)
    }

    fn view_command<R: BufRead, W: Write>(
        &mut self,
        cmd: &str,
        args: &[&str],
        input: &mut R,
        out: &mut W,
    ) -> Result<String> {
        match (self.view, cmd) {
            (View::Budget, "set") => {
                let (amount, name) = args
                    .split_last()
                    .filter(|(_, name)| !name.is_empty())
                    .context("Usage: set <category> <amount>")?;
                let item = BudgetItem {
                    category_id: self.resolve_category(&name.join(" "))?,
                    budget_amount: parse_decimal(amount)?,
                };
                self.api.save_budgets(&self.month, &[item])?;
                self.render()
            }
            (View::Transactions, "add") => {
                let tx = self.transaction_form(input, out, None)?;
                let saved = self.api.create_transaction(&tx)?;
                Ok(format!("Added transaction {}\n{}", saved.id, self.render()?))
            }
            (View::Transactions, "edit") => {
                let id = parse_id(args)?;
                let current = self
                    .api
                    .transactions(&self.month)?
                    .into_iter()
                    .find(|t| t.id == id)
                    .ok_or_else(|| anyhow!("Transaction {} is not in {}", id, self.month))?;
                let tx = self.transaction_form(input, out, Some(&current))?;
                self.api.update_transaction(id, &tx)?;
                Ok(format!("Updated transaction {}\n{}", id, self.render()?))
            }
            (View::Transactions, "rm") => {
                let id = parse_id(args)?;
                self.api.delete_transaction(id)?;
                Ok(format!("Deleted transaction {}\n{}", id, self.render()?))
            }
            (View::Transactions, "import") => {
                if args.is_empty() {
                    bail!("Usage: import <path.csv>");
                }
                let msg = self.import_file(&args.join(" "), input, out)?;
                Ok(format!("{}\n{}", msg, self.render()?))
            }
            (View::Settings, "add") => {
                if args.is_empty() {
                    bail!("Usage: add <name>");
                }
                let cat = self.api.create_category(&args.join(" "))?;
                self.refresh_categories()?;
                Ok(format!("Added category '{}'\n{}", cat.name, self.render()?))
            }
            (View::Settings, "rename") => {
                let id = parse_id(args)?;
                if args.len() < 2 {
                    bail!("Usage: rename <id> <name>");
                }
                let cat = self.api.rename_category(id, &args[1..].join(" "))?;
                self.refresh_categories()?;
                Ok(format!("Renamed category {} to '{}'\n{}", id, cat.name, self.render()?))
            }
            (View::Settings, "rm") => {
                let id = parse_id(args)?;
                self.api.deactivate_category(id)?;
                self.refresh_categories()?;
                Ok(format!("Deactivated category {}\n{}", id, self.render()?))
            }
            _ => bail!("Unknown command '{}' in {} view (try 'help')", cmd, self.view),
        }
    }

    fn transaction_form<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
        current: Option<&Transaction>,
    ) -> Result<TransactionInput> {
        let default_date = match current {
            Some(t) => t.date.to_string(),
            None if self.month == current_month() => chrono::Local::now().date_naive().to_string(),
            None => format!("{}-01", self.month),
        };
        let date = prompt(input, out, "Date (YYYY-MM-DD)", Some(&default_date))?;
        let description = prompt(input, out, "Description", current.map(|t| t.description.as_str()))?;
        let current_amount = current.map(|t| t.amount.to_string());
        let amount = parse_decimal(&prompt(input, out, "Amount", current_amount.as_deref())?)?;
        let current_type = current.map(|t| t.tx_type).unwrap_or(TxType::Expense);
        let tx_type = prompt(input, out, "Type (income/expense)", Some(current_type.as_str()))?
            .parse::<TxType>()
            .map_err(anyhow::Error::msg)?;
        let current_cat = current.and_then(|t| t.category_name.as_deref());
        let cat = prompt(input, out, "Category", current_cat)?;
        let category_id = match current {
            Some(t) if Some(cat.as_str()) == current_cat => t.category_id,
            _ => self.resolve_category(&cat)?,
        };
        Ok(TransactionInput {
            date,
            description,
            amount: amount.abs(),
            tx_type,
            category_id,
        })
    }

    fn import_file<R: BufRead, W: Write>(
        &self,
        path: &str,
        input: &mut R,
        out: &mut W,
    ) -> Result<String> {
        let text = std::fs::read_to_string(path).with_context(|| format!("Open CSV {}", path))?;
        let table = csv_import::parse_csv(&text)?;
        writeln!(out, "Columns: {}", table.headers.join(", "))?;

        let mut column = |label: &str, hints: &[&str]| -> Result<String> {
            let guess = guess_column(&table.headers, hints);
            let name = prompt(input, out, label, guess)?;
            if !table.headers.iter().any(|h| h == &name) {
                bail!("No column named '{}'", name);
            }
            Ok(name)
        };
        let mapping = ColumnMapping {
            date: column("Date column", &["date"])?,
            description: column("Description column", &["description", "memo", "payee", "details"])?,
            amount: column("Amount column", &["amount", "value", "debit"])?,
        };

        let tx_type = prompt(input, out, "Type for all rows (income/expense)", Some("expense"))?
            .parse::<TxType>()
            .map_err(anyhow::Error::msg)?;
        let category_id = self.resolve_category(&prompt(input, out, "Category for all rows", None)?)?;

        let rows = csv_import::map_rows(&table, &mapping, &ImportDefaults { tx_type, category_id });
        if rows.is_empty() {
            bail!("No valid rows to import");
        }
        let imported = self.api.import_transactions(&rows)?;
        Ok(format!("Imported {} of {} rows", imported, table.rows.len()))
    }
}

/// Drive a session until `quit` or end of input. API failures are shown as
/// `Error:` lines and the session keeps going.
pub fn run<A: BudgetApi, R: BufRead, W: Write>(
    session: &mut Session<A>,
    mut input: R,
    mut out: W,
) -> Result<()> {
    if let Err(e) = session.refresh_categories() {
        writeln!(out, "Error: {:#}", e)?;
    }
    writeln!(out, "{}", help(session.view()).trim_end())?;
    match session.render() {
        Ok(text) => writeln!(out, "{}", text.trim_end())?,
        Err(e) => writeln!(out, "Error: {:#}", e)?,
    }

    loop {
        write!(out, "[{} {}]> ", session.month(), session.view())?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match session.handle(&line, &mut input, &mut out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => writeln!(out, "Error: {:#}", e)?,
        }
    }
    Ok(())
}

pub fn help(view: View) -> String {
    let mut s = String::from(
        "Views: dashboard | budget | transactions | settings\n\
         Month: prev | next | month YYYY-MM\n",
    );
    let extra = match view {
        View::Dashboard => "",
        View::Budget => "Budget: set <category> <amount>\n",
        View::Transactions => "Transactions: add | edit <id> | rm <id> | import <path.csv>\n",
        View::Settings => "Categories: add <name> | rename <id> <name> | rm <id>\n",
    };
    s.push_str(extra);
    s.push_str("Other: help | quit\n");
    s
}

fn parse_id(args: &[&str]) -> Result<i64> {
    let raw = args.first().context("Missing id")?;
    raw.parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", raw))
}

fn guess_column<'a>(headers: &'a [String], hints: &[&str]) -> Option<&'a str> {
    hints.iter().find_map(|hint| {
        headers
            .iter()
            .find(|h| h.to_ascii_lowercase().contains(hint))
            .map(String::as_str)
    })
}

/// Ask for one value; an empty answer keeps `current`.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: Option<&str>,
) -> Result<String> {
    match current {
        Some(c) => write!(out, "{} [{}]: ", label, c)?,
        None => write!(out, "{}: ", label)?,
    }
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("Input closed");
    }
    let v = line.trim();
    if v.is_empty() {
        return Ok(current.unwrap_or_default().to_string());
    }
    Ok(v.to_string())
}
