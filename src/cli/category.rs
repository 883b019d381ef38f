//! Category CLI commands
//!
//! Implements CLI commands for the global category list.

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list};
use crate::error::MoneyMateResult;
use crate::services::{AuthService, BudgetService, CategoryService};
use crate::storage::Storage;

use super::{resolve_budget, resolve_category};

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Colour as #RRGGBB
        #[arg(short, long)]
        color: Option<String>,
        /// Also allocate this percentage of a budget to it
        #[arg(short, long)]
        percentage: Option<f64>,
        /// Budget (month or ID) for --percentage (default: current month)
        #[arg(short, long, requires = "percentage")]
        budget: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New colour
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a category and its allocations
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> MoneyMateResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Create {
            name,
            color,
            percentage,
            budget,
        } => match percentage {
            Some(percentage) => {
                let user = AuthService::new(storage).require_user()?;
                let budget = resolve_budget(storage, user.id, budget.as_deref())?;
                let (category, link) =
                    service.create_in_budget(&name, color.as_deref(), budget.id, percentage)?;
                println!("Created category: {}", category.name);
                println!(
                    "  Allocated {:.1}% of {} ({})",
                    link.percentage,
                    budget.month.friendly(),
                    link.limit_amount
                        .format_with_symbol(&storage.settings().currency_symbol)
                );
                println!("  ID: {}", category.id);
            }
            None => {
                let category = service.create(&name, color.as_deref())?;
                println!("Created category: {}", category.name);
                println!("  Color: {}", category.color_hex);
                println!("  ID: {}", category.id);
            }
        },

        CategoryCommands::Show { category } => {
            let category = resolve_category(storage, &category)?;
            let mut budgets = BudgetService::new(storage).budgets_for_category(category.id)?;
            match AuthService::new(storage).current_user_id()? {
                Some(user_id) => budgets.retain(|b| b.user_id == user_id),
                None => budgets.clear(),
            }
            print!("{}", format_category_details(&category, &budgets));
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
        } => {
            let category = resolve_category(storage, &category)?;

            if name.is_none() && color.is_none() {
                println!("No changes specified. Use --name or --color.");
                return Ok(());
            }

            let updated = service.update(category.id, name.as_deref(), color.as_deref())?;
            println!("Updated category: {} ({})", updated.name, updated.color_hex);
        }

        CategoryCommands::Delete { category } => {
            let category = resolve_category(storage, &category)?;
            let links = service.delete(category.id)?;
            println!("Deleted category: {}", category.name);
            if links > 0 {
                println!("  Removed from {} budget(s)", links);
            }
        }
    }

    Ok(())
}
