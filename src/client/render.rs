// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, CategoryBreakdown, MonthlyBudget, MonthlySummary, Transaction};
use crate::utils::{fmt_money, money_table, pretty_table};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;

const BAR_WIDTH: usize = 40;

pub fn dashboard(summary: &MonthlySummary) -> String {
    let mut out = format!("Dashboard: {}\n\n", summary.month);
    out.push_str(&format!(
        "{}\n",
        money_table(
            &["Income", "Expenses", "Net"],
            vec![vec![
                fmt_money(&summary.total_income),
                fmt_money(&summary.total_expenses),
                fmt_money(&summary.net),
            ]],
            &[0, 1, 2],
        )
    ));

    let visible: Vec<&CategoryBreakdown> =
        summary.categories.iter().filter(|r| !r.is_empty()).collect();
    if visible.is_empty() {
        out.push_str("\nNo spending or budgets for this month.\n");
        return out;
    }

    let rows = visible
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                fmt_money(&r.actual),
                fmt_money(&r.budget),
                fmt_money(&r.remaining),
            ]
        })
        .collect();
    out.push_str(&format!(
        "\n{}\n\n",
        money_table(&["Category", "Actual", "Budget", "Remaining"], rows, &[1, 2, 3])
    ));
    out.push_str(&bar_chart(&visible, BAR_WIDTH));
    out
}

/// Horizontal actual-vs-budget bars scaled to the largest figure.
pub fn bar_chart(rows: &[&CategoryBreakdown], width: usize) -> String {
    let max = rows
        .iter()
        .flat_map(|r| [r.actual, r.budget])
        .max()
        .unwrap_or(Decimal::ZERO);
    let label_w = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);

    let bar = |v: Decimal, glyph: char| -> String {
        if max.is_zero() {
            return String::new();
        }
        let len = (v / max * Decimal::from(width as u64))
            .round()
            .to_usize()
            .unwrap_or(0);
        glyph.to_string().repeat(len)
    };

    let mut out = String::new();
    for r in rows {
        let marker = if r.actual > r.budget && !r.budget.is_zero() {
            " !"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<lw$}  actual {} {}{}\n",
            r.name,
            bar(r.actual, '█'),
            fmt_money(&r.actual),
            marker,
            lw = label_w
        ));
        out.push_str(&format!(
            "{:<lw$}  budget {} {}\n",
            "",
            bar(r.budget, '░'),
            fmt_money(&r.budget),
            lw = label_w
        ));
    }
    out
}

pub fn budget(
    month: &str,
    categories: &[Category],
    budgets: &[MonthlyBudget],
    summary: &MonthlySummary,
) -> String {
    let planned: HashMap<i64, Decimal> = budgets
        .iter()
        .map(|b| (b.category_id, b.budget_amount))
        .collect();
    let spent: HashMap<i64, Decimal> = summary
        .categories
        .iter()
        .map(|r| (r.category_id, r.actual))
        .collect();

    let rows = categories
        .iter()
        .map(|c| {
            let b = planned.get(&c.id).copied().unwrap_or(Decimal::ZERO);
            let a = spent.get(&c.id).copied().unwrap_or(Decimal::ZERO);
            vec![
                c.id.to_string(),
                c.name.clone(),
                fmt_money(&b),
                fmt_money(&a),
                fmt_money(&(b - a)),
            ]
        })
        .collect();
    format!(
        "Budget: {}\n\n{}\n",
        month,
        money_table(&["ID", "Category", "Budget", "Actual", "Remaining"], rows, &[2, 3, 4])
    )
}

pub fn transactions(month: &str, txs: &[Transaction]) -> String {
    if txs.is_empty() {
        return format!("Transactions: {}\n\nNo transactions this month.\n", month);
    }
    let rows = txs
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.description.clone(),
                t.category_name.clone().unwrap_or_default(),
                t.tx_type.to_string(),
                fmt_money(&t.amount),
                t.source.as_str().to_string(),
            ]
        })
        .collect();
    format!(
        "Transactions: {}\n\n{}\n",
        month,
        money_table(
            &["ID", "Date", "Description", "Category", "Type", "Amount", "Source"],
            rows,
            &[5],
        )
    )
}

pub fn settings(categories: &[Category]) -> String {
    let rows = categories
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                if c.is_active { "active" } else { "inactive" }.to_string(),
                c.created_at.clone(),
            ]
        })
        .collect();
    format!(
        "Settings: categories\n\n{}\n",
        pretty_table(&["ID", "Name", "Status", "Created"], rows)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, actual: i64, budget: i64) -> CategoryBreakdown {
        CategoryBreakdown {
            category_id: 1,
            name: name.into(),
            is_active: true,
            actual: Decimal::from(actual),
            budget: Decimal::from(budget),
            remaining: Decimal::from(budget - actual),
        }
    }

    #[test]
    fn bars_scale_to_largest_value() {
        let a = row("Food", 50, 100);
        let b = row("Rent", 100, 0);
        let chart = bar_chart(&[&a, &b], 10);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0].matches('█').count(), 5);
        assert_eq!(lines[1].matches('░').count(), 10);
        assert_eq!(lines[2].matches('█').count(), 10);
    }

    #[test]
    fn overspend_is_flagged() {
        let a = row("Fun", 120, 100);
        assert!(bar_chart(&[&a], 10).lines().next().unwrap().ends_with(" !"));
    }

    #[test]
    fn dashboard_hides_empty_rows() {
        let summary = MonthlySummary {
            month: "2024-03".into(),
            total_income: Decimal::ZERO,
            total_expenses: Decimal::from(50),
            net: Decimal::from(-50),
            categories: vec![row("Food", 50, 100), row("Travel", 0, 0)],
        };
        let out = dashboard(&summary);
        assert!(out.contains("Food"));
        assert!(!out.contains("Travel"));
    }
}
