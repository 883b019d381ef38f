//! Configuration CLI command
//!
//! Shows paths and settings; any flag given updates `config.json`.

use clap::Args;

use crate::error::MoneyMateResult;
use crate::storage::Storage;

/// Arguments for `moneymate config`
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Currency symbol used when printing amounts
    #[arg(long)]
    pub currency: Option<String>,

    /// Date format (strftime, e.g. "%d/%m/%Y")
    #[arg(long)]
    pub date_format: Option<String>,

    /// Alert threshold for new users, as a percentage
    #[arg(long)]
    pub alert_threshold: Option<f64>,

    /// Percentage used when allocating without one
    #[arg(long)]
    pub default_percentage: Option<f64>,
}

impl ConfigArgs {
    fn has_changes(&self) -> bool {
        self.currency.is_some()
            || self.date_format.is_some()
            || self.alert_threshold.is_some()
            || self.default_percentage.is_some()
    }
}

/// Handle the config command
pub fn handle_config_command(storage: &Storage, args: ConfigArgs) -> MoneyMateResult<()> {
    let paths = storage.paths();
    let mut settings = storage.settings().clone();

    if args.has_changes() {
        if let Some(currency) = args.currency {
            settings.currency_symbol = currency;
        }
        if let Some(format) = args.date_format {
            settings.date_format = format;
        }
        if let Some(percent) = args.alert_threshold {
            settings.default_alert_threshold = percent / 100.0;
        }
        if let Some(percent) = args.default_percentage {
            settings.default_allocation_percentage = percent;
        }

        settings.validate()?;
        settings.save(paths)?;
        println!("Settings saved.");
        println!();
    }

    println!("MoneyMate Configuration");
    println!("=======================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Data directory:  {}", paths.data_dir().display());
    println!("Audit log:       {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol:      {}", settings.currency_symbol);
    println!("  Date format:          {}", settings.date_format);
    println!(
        "  Default alert:        {:.0}%",
        settings.default_alert_threshold * 100.0
    );
    println!(
        "  Default allocation:   {}%",
        settings.default_allocation_percentage
    );

    Ok(())
}
