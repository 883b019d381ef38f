//! Statistics display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::services::{CategoryTotal, MonthlyTotal, PeriodSummary};

use super::budget::progress_bar;

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Budgeted")]
    budgeted: String,
    #[tabled(rename = "Spent")]
    spent: String,
}

/// Format a year of monthly totals
pub fn format_monthly_totals(totals: &[MonthlyTotal], symbol: &str) -> String {
    let rows = totals.iter().map(|t| MonthRow {
        month: t.month.friendly(),
        budgeted: t.budgeted.format_with_symbol(symbol),
        spent: t.spent.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format totals for a period
pub fn format_period_summary(summary: &PeriodSummary, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Summary for {}\n", summary.period));
    output.push_str(&format!(
        "  Budgeted:  {}\n",
        summary.budgeted.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Spent:     {} ({} expenses)\n",
        summary.spent.format_with_symbol(symbol),
        summary.expense_count
    ));
    output.push_str(&format!(
        "  Remaining: {}\n",
        summary.remaining.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  {}\n", progress_bar(summary.progress(), 20)));
    output
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Expenses")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Format the categories with the most spending
pub fn format_top_categories(rows: &[CategoryTotal], symbol: &str) -> String {
    if rows.is_empty() {
        return "No spending in this period.\n".to_string();
    }

    let rows = rows.iter().map(|r| CategoryRow {
        name: r.name.clone(),
        count: r.count,
        total: r.total.format_with_symbol(symbol),
        share: format!("{:.1}%", r.share),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
