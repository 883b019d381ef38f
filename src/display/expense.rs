//! Expense display formatting
//!
//! Formats expense history tables, per-category summaries and details.

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{CategoryId, Expense, Money};
use crate::services::ExpenseSummary;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format expenses as a table
///
/// `category_names` resolves category IDs; unknown IDs show as "(deleted)".
pub fn format_expense_list(
    expenses: &[Expense],
    category_names: &HashMap<CategoryId, String>,
    symbol: &str,
    date_format: &str,
) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = expenses.iter().map(|e| ExpenseRow {
        date: e.date.format(date_format).to_string(),
        category: category_names
            .get(&e.category_id)
            .cloned()
            .unwrap_or_else(|| "(deleted)".to_string()),
        description: truncate(&e.description, 40),
        amount: e.amount.format_with_symbol(symbol),
        id: e.id.to_string(),
    });

    let total: Money = expenses.iter().map(|e| e.amount).sum();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!(
        "{}\n{} expense(s), total {}\n",
        table,
        expenses.len(),
        total.format_with_symbol(symbol)
    )
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Expenses")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
}

/// Format per-category totals of a budget
pub fn format_expense_summary(summaries: &[ExpenseSummary], symbol: &str) -> String {
    if summaries.is_empty() {
        return "No expenses recorded for this budget.\n".to_string();
    }

    let rows = summaries.iter().map(|s| SummaryRow {
        name: s.name.clone(),
        color: s.color_hex.clone(),
        count: s.count,
        total: s.total.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format expense details for display
pub fn format_expense_details(
    expense: &Expense,
    category_name: Option<&str>,
    symbol: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Date:        {}\n", expense.date.format(date_format)));
    output.push_str(&format!(
        "Amount:      {}\n",
        expense.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Category:    {}\n",
        category_name.unwrap_or("(deleted)")
    ));
    if !expense.description.is_empty() {
        output.push_str(&format!("Description: {}\n", expense.description));
    }
    output.push_str(&format!("Budget:      {}\n", expense.budget_id));

    output
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetCategoryId, BudgetId};
    use chrono::NaiveDate;

    fn expense(description: &str) -> Expense {
        Expense::new(
            BudgetId::new(),
            BudgetCategoryId::new(),
            CategoryId::new(),
            Money::from_cents(4_250),
            description,
            NaiveDate::from_ymd_opt(2025, 10, 7).unwrap(),
        )
    }

    #[test]
    fn test_expense_list_marks_deleted_category() {
        let expenses = vec![expense("Cinema")];
        let output = format_expense_list(&expenses, &HashMap::new(), "€", "%d/%m/%Y");
        assert!(output.contains("07/10/2025"));
        assert!(output.contains("(deleted)"));
        assert!(output.contains("€42.50"));
        assert!(output.contains("1 expense(s)"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
    }

    #[test]
    fn test_details() {
        let e = expense("");
        let output = format_expense_details(&e, Some("Food"), "$", "%Y-%m-%d");
        assert!(output.contains("Category:    Food"));
        assert!(output.contains("2025-10-07"));
        assert!(!output.contains("Description"));
    }
}
