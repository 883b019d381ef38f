//! Statistics CLI commands

use chrono::Datelike;
use clap::Subcommand;

use crate::display::stats::{format_monthly_totals, format_period_summary, format_top_categories};
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::services::{AuthService, Period, StatisticsService};
use crate::storage::Storage;

/// Stats subcommands
#[derive(Subcommand)]
pub enum StatsCommands {
    /// Budgeted and spent per month of a year
    Monthly {
        /// Year (default: this year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Totals for a month or a year
    Summary {
        /// "2025", "2025-10" or "current" (default: current month)
        period: Option<String>,
    },

    /// Categories with the most spending
    Top {
        /// "2025", "2025-10" or "current" (default: current month)
        period: Option<String>,
        /// Number of categories to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
}

fn parse_period(period: Option<&str>) -> MoneyMateResult<Period> {
    match period {
        None => Ok(Period::default()),
        Some(p) => Period::parse(p)
            .ok_or_else(|| MoneyMateError::Validation(format!("Invalid period: {}", p))),
    }
}

/// Handle a stats command
pub fn handle_stats_command(storage: &Storage, cmd: StatsCommands) -> MoneyMateResult<()> {
    let user = AuthService::new(storage).require_user()?;
    let service = StatisticsService::new(storage);
    let symbol = storage.settings().currency_symbol.as_str();

    match cmd {
        StatsCommands::Monthly { year } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let totals = service.monthly_totals(user.id, year)?;
            println!("Monthly totals for {}", year);
            print!("{}", format_monthly_totals(&totals, symbol));
        }

        StatsCommands::Summary { period } => {
            let summary = service.period_summary(user.id, parse_period(period.as_deref())?)?;
            print!("{}", format_period_summary(&summary, symbol));
        }

        StatsCommands::Top { period, limit } => {
            let period = parse_period(period.as_deref())?;
            let rows = service.top_categories(user.id, period, limit)?;
            println!("Top categories for {}", period);
            print!("{}", format_top_categories(&rows, symbol));
        }
    }

    Ok(())
}
