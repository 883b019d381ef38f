//! Audit log CLI command

use clap::Args;

use crate::audit::EntityType;
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::storage::Storage;

/// Arguments for `moneymate audit`
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Only this entity type (user, budget, category, allocation, expense, alert)
    #[arg(short, long)]
    pub entity: Option<String>,
}

/// Show recent audit log entries, oldest first
pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> MoneyMateResult<()> {
    let entity_type = match args.entity.as_deref() {
        Some(s) => Some(EntityType::parse(s).ok_or_else(|| {
            MoneyMateError::Validation(format!("Unknown entity type: {}", s))
        })?),
        None => None,
    };

    let entries = storage.audit().read_recent(args.limit, entity_type)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
