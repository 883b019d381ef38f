//! Expense CLI commands
//!
//! Record, edit and browse expenses. Alerts raised by new spending are
//! printed right after the command.

use std::collections::HashMap;

use clap::Subcommand;

use crate::display::expense::{format_expense_details, format_expense_list};
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::{Alert, CategoryId, Expense, UserId};
use crate::services::{
    AuthService, ExpenseOutcome, ExpenseService, ExpenseUpdate, HistoryFilter, NewExpense,
};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_month, resolve_budget, resolve_category};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount (e.g., "12.50")
        amount: String,
        /// Category name or ID (must be allocated in the budget)
        category: String,
        /// What the money was spent on
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Month or budget ID (default: current month)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Edit an expense
    Edit {
        /// Expense ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },

    /// Show expense details
    Show {
        /// Expense ID
        id: String,
    },

    /// List expenses of a month
    History {
        /// Month (default: current)
        #[arg(short, long)]
        month: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Search descriptions
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> MoneyMateResult<()> {
    let user = AuthService::new(storage).require_user()?;
    let service = ExpenseService::new(storage);
    let settings = storage.settings();
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            description,
            date,
            budget,
        } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let category = resolve_category(storage, &category)?;
            let date = date.map(|d| parse_date(&d, date_format)).transpose()?;

            let ExpenseOutcome { expense, alerts } = service.add(NewExpense {
                budget_id: budget.id,
                category_id: category.id,
                amount: parse_money(&amount)?,
                description: description.unwrap_or_default(),
                date,
            })?;

            println!(
                "Recorded {} in {} on {}",
                expense.amount.format_with_symbol(symbol),
                category.name,
                expense.date.format(date_format)
            );
            println!("  ID: {}", expense.id);
            print_alerts(&alerts);
        }

        ExpenseCommands::Edit {
            id,
            amount,
            category,
            description,
            date,
        } => {
            let expense = require_expense(&service, user.id, &id)?;

            let changes = ExpenseUpdate {
                amount: amount.as_deref().map(parse_money).transpose()?,
                category_id: match category {
                    Some(c) => Some(resolve_category(storage, &c)?.id),
                    None => None,
                },
                description,
                date: date.map(|d| parse_date(&d, date_format)).transpose()?,
            };

            let ExpenseOutcome { expense, alerts } = service.update(expense.id, changes)?;
            println!(
                "Updated expense {}: {}",
                expense.id,
                expense.amount.format_with_symbol(symbol)
            );
            print_alerts(&alerts);
        }

        ExpenseCommands::Delete { id } => {
            let expense = require_expense(&service, user.id, &id)?;
            service.delete(expense.id)?;
            println!(
                "Deleted expense {} ({})",
                expense.id,
                expense.amount.format_with_symbol(symbol)
            );
        }

        ExpenseCommands::Show { id } => {
            let expense = require_expense(&service, user.id, &id)?;
            let category = storage.categories.get(expense.category_id)?;
            print!(
                "{}",
                format_expense_details(
                    &expense,
                    category.as_ref().map(|c| c.name.as_str()),
                    symbol,
                    date_format
                )
            );
        }

        ExpenseCommands::History {
            month,
            category,
            search,
        } => {
            let filter = HistoryFilter {
                month: month.as_deref().map(parse_month).transpose()?,
                category_id: match category {
                    Some(c) => Some(resolve_category(storage, &c)?.id),
                    None => None,
                },
                search,
            };

            let expenses = service.history(user.id, &filter)?;
            print!(
                "{}",
                format_expense_list(&expenses, &category_names(storage)?, symbol, date_format)
            );
        }
    }

    Ok(())
}

fn require_expense(
    service: &ExpenseService<'_>,
    user_id: UserId,
    id: &str,
) -> MoneyMateResult<Expense> {
    service
        .find_for_user(user_id, id)?
        .ok_or_else(|| MoneyMateError::expense_not_found(id))
}

fn category_names(storage: &Storage) -> MoneyMateResult<HashMap<CategoryId, String>> {
    Ok(storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

fn print_alerts(alerts: &[Alert]) {
    for alert in alerts {
        println!("ALERT: {}", alert.message);
    }
}
