//! Allocation CLI commands
//!
//! Links categories to a budget with a percentage of its total.

use clap::Subcommand;

use crate::display::budget::format_allocation_table;
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::BudgetId;
use crate::services::{
    percentage_for_amount, preview_amount, AuthService, BudgetCategoryService, BudgetService,
};
use crate::storage::Storage;

use super::{parse_money, resolve_budget, resolve_category};

/// Allocation subcommands
#[derive(Subcommand)]
pub enum AllocationCommands {
    /// List allocations of a budget
    List {
        /// Month or budget ID (default: current month)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Allocate part of a budget to a category
    Add {
        /// Category name or ID
        category: String,
        /// Percentage of the budget total (default from settings)
        #[arg(short, long, conflicts_with = "amount")]
        percentage: Option<f64>,
        /// Amount to allocate instead of a percentage
        #[arg(short, long)]
        amount: Option<String>,
        /// Month or budget ID (default: current month)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Change the percentage of an allocation
    Set {
        /// Category name or ID
        category: String,
        /// New percentage
        percentage: f64,
        /// Month or budget ID (default: current month)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Remove a category from a budget (its expenses are kept)
    Remove {
        /// Category name or ID
        category: String,
        /// Month or budget ID (default: current month)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Show what a percentage of a budget would allocate
    Preview {
        /// Percentage to preview
        percentage: f64,
        /// Month or budget ID (default: current month)
        #[arg(short, long)]
        budget: Option<String>,
    },
}

/// Handle an allocation command
pub fn handle_allocation_command(
    storage: &Storage,
    cmd: AllocationCommands,
) -> MoneyMateResult<()> {
    let user = AuthService::new(storage).require_user()?;
    let service = BudgetCategoryService::new(storage);
    let symbol = storage.settings().currency_symbol.clone();

    match cmd {
        AllocationCommands::List { budget } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let overview = BudgetService::new(storage).overview(budget.id)?;
            println!("Allocations for {}", budget.month.friendly());
            print!("{}", format_allocation_table(&overview.categories, &symbol));
            println!(
                "Allocated {:.1}%, unallocated {:.1}%",
                overview.allocated_percentage, overview.unallocated_percentage
            );
        }

        AllocationCommands::Add {
            category,
            percentage,
            amount,
            budget,
        } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let category = resolve_category(storage, &category)?;

            let percentage = match amount {
                Some(amount) => {
                    if budget.total_amount.is_zero() {
                        return Err(MoneyMateError::Validation(
                            "Cannot allocate an amount from a zero budget".into(),
                        ));
                    }
                    Some(percentage_for_amount(budget.total_amount, parse_money(&amount)?))
                }
                None => percentage,
            };

            let link = service.add(budget.id, category.id, percentage)?;
            println!(
                "Allocated {:.2}% of {} to {} ({})",
                link.percentage,
                budget.month.friendly(),
                category.name,
                link.limit_amount.format_with_symbol(&symbol)
            );
            warn_if_over_allocated(&service, budget.id)?;
        }

        AllocationCommands::Set {
            category,
            percentage,
            budget,
        } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let category = resolve_category(storage, &category)?;
            let link = service.get_link(budget.id, category.id)?.ok_or_else(|| {
                MoneyMateError::allocation_not_found(format!(
                    "{} in {}",
                    category.name, budget.month
                ))
            })?;

            let updated = service.update_percentage(link.id, percentage)?;
            println!(
                "{} now {:.2}% ({})",
                category.name,
                updated.percentage,
                updated.limit_amount.format_with_symbol(&symbol)
            );
            warn_if_over_allocated(&service, budget.id)?;
        }

        AllocationCommands::Remove { category, budget } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let category = resolve_category(storage, &category)?;
            service.remove_link(budget.id, category.id)?;
            println!(
                "Removed {} from the budget for {}",
                category.name,
                budget.month.friendly()
            );
        }

        AllocationCommands::Preview { percentage, budget } => {
            let budget = resolve_budget(storage, user.id, budget.as_deref())?;
            let amount = preview_amount(budget.total_amount, percentage);
            println!(
                "{:.2}% of {} = {}",
                percentage,
                budget.total_amount.format_with_symbol(&symbol),
                amount.format_with_symbol(&symbol)
            );
        }
    }

    Ok(())
}

fn warn_if_over_allocated(
    service: &BudgetCategoryService<'_>,
    budget_id: BudgetId,
) -> MoneyMateResult<()> {
    let allocated = service.allocated_percentage(budget_id)?;
    if allocated > 100.0 {
        println!("Warning: allocations now total {:.1}% of the budget.", allocated);
    }
    Ok(())
}
