use anyhow::Result;
use clap::{Parser, Subcommand};

use moneymate::cli::{
    handle_alert_command, handle_allocation_command, handle_audit_command, handle_auth_command,
    handle_budget_command, handle_category_command, handle_config_command,
    handle_expense_command, handle_export_command, handle_stats_command,
};
use moneymate::config::paths::MoneyMatePaths;
use moneymate::storage::Storage;

#[derive(Parser)]
#[command(
    name = "moneymate",
    version,
    about = "Monthly budgets, category allocations and spending alerts",
    long_about = "MoneyMate tracks a monthly budget per user, splits it across \
                  categories by percentage, records expenses against those \
                  categories and raises alerts when spending crosses your threshold."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and starter categories
    Init,

    /// Show or change configuration
    Config(moneymate::cli::ConfigArgs),

    /// Register, log in and manage your account
    #[command(subcommand)]
    Auth(moneymate::cli::AuthCommands),

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(moneymate::cli::BudgetCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(moneymate::cli::CategoryCommands),

    /// Budget allocation commands
    #[command(subcommand, alias = "alloc")]
    Allocation(moneymate::cli::AllocationCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(moneymate::cli::ExpenseCommands),

    /// Spending alerts
    #[command(subcommand)]
    Alert(moneymate::cli::AlertCommands),

    /// Spending statistics
    #[command(subcommand)]
    Stats(moneymate::cli::StatsCommands),

    /// Export data
    #[command(subcommand)]
    Export(moneymate::cli::ExportCommands),

    /// Show the audit log
    Audit(moneymate::cli::AuditArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = MoneyMatePaths::new()?;
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            let fresh = moneymate::storage::init::needs_initialization(&paths);
            println!("Initializing MoneyMate at: {}", paths.data_dir().display());
            moneymate::storage::initialize_storage(&paths)?;
            storage.settings().save(&paths)?;
            println!("Initialization complete!");

            if fresh {
                println!();
                println!("Starter categories have been created:");
                println!("  Food, Transport, Leisure, Housing, Health, Shopping");
            }
            println!();
            println!("Run 'moneymate auth register <name> <email>' to create an account.");
        }
        Some(Commands::Config(args)) => handle_config_command(&storage, args)?,
        Some(Commands::Auth(cmd)) => handle_auth_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Allocation(cmd)) => handle_allocation_command(&storage, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, cmd)?,
        Some(Commands::Alert(cmd)) => handle_alert_command(&storage, cmd)?,
        Some(Commands::Stats(cmd)) => handle_stats_command(&storage, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Audit(args)) => handle_audit_command(&storage, args)?,
        None => {
            println!("MoneyMate - monthly budgets from the terminal");
            println!();
            println!("Run 'moneymate --help' for usage information.");
            println!("Run 'moneymate init' to get started.");
        }
    }

    Ok(())
}
