//! Budget display formatting
//!
//! Formats budgets, their allocations and the monthly overview.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Budget;
use crate::services::{BudgetOverview, CategoryBudgetSummary};

const BAR_WIDTH: usize = 20;

/// Render a ratio as a fixed-width bar, e.g. `[#####---------------]  25%`
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let clamped = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (clamped * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        ratio.max(0.0) * 100.0
    )
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format a user's budgets as a table
pub fn format_budget_list(budgets: &[Budget], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n\nRun 'moneymate budget create <amount>' to start one.\n"
            .to_string();
    }

    let rows = budgets.iter().map(|b| BudgetRow {
        month: if b.is_for_current_month() {
            format!("{} *", b.month.friendly())
        } else {
            b.month.friendly()
        },
        total: b.total_amount.format_with_symbol(symbol),
        spent: b.spent_amount.format_with_symbol(symbol),
        remaining: b.remaining_amount().format_with_symbol(symbol),
        status: if b.is_active { "Active" } else { "Inactive" },
        id: b.id.to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n* current month\n", table)
}

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "%")]
    percentage: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

/// Format allocations of one budget as a table
pub fn format_allocation_table(categories: &[CategoryBudgetSummary], symbol: &str) -> String {
    if categories.is_empty() {
        return "No categories allocated to this budget.\n".to_string();
    }

    let rows = categories.iter().map(|c| AllocationRow {
        name: c.name.clone(),
        percentage: format!("{:.1}", c.link.percentage),
        limit: c.link.limit_amount.format_with_symbol(symbol),
        spent: c.link.spent_amount.format_with_symbol(symbol),
        remaining: c.remaining().format_with_symbol(symbol),
        progress: progress_bar(c.progress(), BAR_WIDTH / 2),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format the overview of a budget
pub fn format_budget_overview(overview: &BudgetOverview, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget for {}\n", overview.budget.month.friendly()));
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!("Total:       {}\n", overview.total.format_with_symbol(symbol)));
    output.push_str(&format!("Spent:       {}\n", overview.spent.format_with_symbol(symbol)));
    output.push_str(&format!(
        "Remaining:   {}\n",
        overview.remaining.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Progress:    {}\n",
        progress_bar(overview.progress, BAR_WIDTH)
    ));
    output.push_str(&format!(
        "Allocated:   {:.1}% ({:.1}% unallocated)\n",
        overview.allocated_percentage, overview.unallocated_percentage
    ));

    if overview.is_over_allocated() {
        output.push_str("Warning: allocations exceed 100% of the budget.\n");
    }
    if !overview.budget.is_active {
        output.push_str("Note: this budget is inactive.\n");
    }

    output.push('\n');
    output.push_str(&format_allocation_table(&overview.categories, symbol));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetMonth, Money, UserId};

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[----]   0%");
        assert_eq!(progress_bar(0.5, 4), "[##--]  50%");
        assert_eq!(progress_bar(1.5, 4), "[####] 150%");
    }

    #[test]
    fn test_empty_budget_list() {
        assert!(format_budget_list(&[], "€").contains("No budgets found"));
    }

    #[test]
    fn test_budget_list_marks_current_month() {
        let user_id = UserId::new();
        let current = BudgetMonth::current();
        let budgets = vec![
            Budget::new(user_id, Money::from_cents(100_000), current),
            Budget::new(user_id, Money::from_cents(80_000), current.prev()),
        ];

        let output = format_budget_list(&budgets, "€");
        assert!(output.contains(&format!("{} *", current.friendly())));
        assert!(!output.contains(&format!("{} *", current.prev().friendly())));
    }
}
