//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Budget, Category};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format a simple list of categories
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'moneymate init' to create default categories.\n"
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        name: c.name.clone(),
        color: c.color_hex.clone(),
        id: c.id.to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format category details along with the budgets using it
pub fn format_category_details(category: &Category, budgets: &[Budget]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:      {}\n", category.id));
    output.push_str(&format!("  Color:   {}\n", category.color_hex));
    output.push_str(&format!(
        "  Created: {}\n",
        category.created_at.format("%Y-%m-%d")
    ));

    if budgets.is_empty() {
        output.push_str("  Not used by any budget\n");
    } else {
        output.push_str("  Used by:\n");
        for budget in budgets {
            output.push_str(&format!("    {}\n", budget.month.friendly()));
        }
    }

    output
}
