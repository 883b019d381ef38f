//! Alert CLI commands

use clap::Subcommand;

use crate::display::alert::format_alert_list;
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::services::{AlertService, AuthService};
use crate::storage::Storage;

/// Alert subcommands
#[derive(Subcommand)]
pub enum AlertCommands {
    /// List unread alerts
    List {
        /// Include alerts already read
        #[arg(short, long)]
        all: bool,
    },

    /// Mark an alert as read
    Read {
        /// Alert ID (omit with --all)
        id: Option<String>,
        /// Mark every alert as read
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },

    /// Delete an alert
    Delete {
        /// Alert ID
        id: String,
    },

    /// Delete all of your alerts
    Clear,
}

/// Handle an alert command
pub fn handle_alert_command(storage: &Storage, cmd: AlertCommands) -> MoneyMateResult<()> {
    let user = AuthService::new(storage).require_user()?;
    let service = AlertService::new(storage);

    match cmd {
        AlertCommands::List { all } => {
            let alerts = if all {
                service.all_for_user(user.id)?
            } else {
                service.unread_for_user(user.id)?
            };
            print!("{}", format_alert_list(&alerts));
        }

        AlertCommands::Read { id, all } => {
            if all {
                let count = service.mark_all_as_read(user.id)?;
                println!("Marked {} alert(s) as read", count);
                return Ok(());
            }

            let id = id.ok_or_else(|| {
                MoneyMateError::Validation("Give an alert ID or --all".into())
            })?;
            let alert = service
                .find_for_user(user.id, &id)?
                .ok_or_else(|| MoneyMateError::alert_not_found(&id))?;
            service.mark_as_read(alert.id)?;
            println!("Marked as read: {}", alert.message);
        }

        AlertCommands::Delete { id } => {
            let alert = service
                .find_for_user(user.id, &id)?
                .ok_or_else(|| MoneyMateError::alert_not_found(&id))?;
            service.delete(alert.id)?;
            println!("Deleted alert {}", alert.id);
        }

        AlertCommands::Clear => {
            let count = service.delete_all_for_user(user.id)?;
            println!("Deleted {} alert(s)", count);
        }
    }

    Ok(())
}
