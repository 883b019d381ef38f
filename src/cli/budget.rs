//! Budget CLI commands
//!
//! Implements CLI commands for monthly budgets: creation, totals, the
//! overview and month rollover.

use clap::Subcommand;

use crate::display::budget::{format_budget_list, format_budget_overview};
use crate::display::expense::format_expense_summary;
use crate::error::MoneyMateResult;
use crate::models::BudgetMonth;
use crate::services::{AuthService, BudgetService, ExpenseService};
use crate::storage::Storage;

use super::{parse_money, parse_month, resolve_budget};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget for a month
    Create {
        /// Total amount (e.g., "1500" or "1500.00")
        amount: String,
        /// Month (e.g., "2025-10", "10/2025", "current", "next")
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List your budgets
    List,

    /// Show the budget overview
    Overview {
        /// Month or budget ID (default: current month)
        budget: Option<String>,
    },

    /// Show spending per category
    Summary {
        /// Month or budget ID (default: current month)
        budget: Option<String>,
    },

    /// Change a budget's total
    SetTotal {
        /// New total amount
        amount: String,
        /// Month or budget ID (default: current month)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Mark a budget active
    Activate {
        /// Month or budget ID
        budget: String,
    },

    /// Mark a budget inactive
    Deactivate {
        /// Month or budget ID
        budget: String,
    },

    /// Reuse a budget for another month, zeroing its spending
    Reset {
        /// New total amount
        amount: String,
        /// Target month
        #[arg(short, long)]
        to: String,
        /// Month or budget ID to reuse (default: current month)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Delete a budget with its allocations and expenses
    Delete {
        /// Month or budget ID
        budget: String,
        /// Skip the confirmation notice
        #[arg(long)]
        force: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> MoneyMateResult<()> {
    let user = AuthService::new(storage).require_user()?;
    let service = BudgetService::new(storage);
    let symbol = storage.settings().currency_symbol.clone();

    match cmd {
        BudgetCommands::Create { amount, month } => {
            let total = parse_money(&amount)?;
            let month = match month {
                Some(m) => parse_month(&m)?,
                None => BudgetMonth::current(),
            };

            let budget = service.create(user.id, total, month)?;
            println!(
                "Created budget for {}: {}",
                budget.month.friendly(),
                budget.total_amount.format_with_symbol(&symbol)
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::List => {
            let budgets = service.list_for_user(user.id)?;
            print!("{}", format_budget_list(&budgets, &symbol));
        }

        BudgetCommands::Overview { budget } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let overview = service.overview(budget.id)?;
            print!("{}", format_budget_overview(&overview, &symbol));
        }

        BudgetCommands::Summary { budget } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let summaries = ExpenseService::new(storage).summary_by_category(budget.id)?;
            println!("Spending for {}", budget.month.friendly());
            print!("{}", format_expense_summary(&summaries, &symbol));
        }

        BudgetCommands::SetTotal { amount, budget } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let updated = service.update_total(budget.id, parse_money(&amount)?)?;
            println!(
                "Budget for {} now {} (allocation limits recalculated)",
                updated.month.friendly(),
                updated.total_amount.format_with_symbol(&symbol)
            );
        }

        BudgetCommands::Activate { budget } => {
            let budget = resolve_budget(storage, user.id, Some(&budget))?;
            service.set_active(budget.id, true)?;
            println!("Activated budget for {}", budget.month.friendly());
        }

        BudgetCommands::Deactivate { budget } => {
            let budget = resolve_budget(storage, user.id, Some(&budget))?;
            service.set_active(budget.id, false)?;
            println!("Deactivated budget for {}", budget.month.friendly());
        }

        BudgetCommands::Reset { amount, to, budget } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let reset = service.reset_for_new_month(budget.id, parse_money(&amount)?, parse_month(&to)?)?;
            println!(
                "Budget moved from {} to {} with total {}",
                budget.month.friendly(),
                reset.month.friendly(),
                reset.total_amount.format_with_symbol(&symbol)
            );
        }

        BudgetCommands::Delete { budget, force } => {
            let budget = resolve_budget(storage, user.id, Some(&budget))?;
            if !force {
                let expenses = ExpenseService::new(storage).list_for_budget(budget.id)?.len();
                println!(
                    "Deleting the budget for {} also deletes {} expense(s).",
                    budget.month.friendly(),
                    expenses
                );
                println!("Run again with --force to confirm.");
                return Ok(());
            }

            service.delete(budget.id)?;
            println!("Deleted budget for {}", budget.month.friendly());
        }
    }

    Ok(())
}
