//! Account CLI commands
//!
//! Registration, login/logout and per-user preferences. Passwords are read
//! from the terminal when not passed as flags and wiped after use.

use clap::Subcommand;
use zeroize::Zeroizing;

use crate::crypto::{password_strength, strength_label, PasswordChecks};
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::services::AuthService;
use crate::storage::Storage;

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create a new account
    Register {
        /// Display name
        name: String,
        /// Login email
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "MONEYMATE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log in
    Login {
        /// Login email
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "MONEYMATE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Stay logged in for 30 days instead of 24 hours
        #[arg(short, long)]
        remember: bool,
    },

    /// Log out
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Set the alert threshold as a percentage of spend (e.g., 80)
    Threshold {
        /// Percentage in (0, 100]
        percent: f64,
    },

    /// Deactivate the logged-in account
    Delete {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

fn read_password(given: Option<String>, prompt: &str) -> MoneyMateResult<Zeroizing<String>> {
    match given {
        Some(p) => Ok(Zeroizing::new(p)),
        None => rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|e| MoneyMateError::Io(format!("Failed to read password: {}", e))),
    }
}

/// Handle an auth command
pub fn handle_auth_command(storage: &Storage, cmd: AuthCommands) -> MoneyMateResult<()> {
    let service = AuthService::new(storage);

    match cmd {
        AuthCommands::Register {
            name,
            email,
            password,
        } => {
            let prompted = password.is_none();
            let password = read_password(password, "Password: ")?;

            if prompted {
                let confirm = read_password(None, "Confirm password: ")?;
                if *confirm != *password {
                    return Err(MoneyMateError::Validation("Passwords do not match".into()));
                }
            }

            let checks = PasswordChecks::of(&password);
            if !checks.is_strong() {
                println!(
                    "Password strength: {}",
                    strength_label(password_strength(&password))
                );
                println!("Missing: {}", checks.missing().join(", "));
            }

            let user = service.register(&name, &email, &password)?;
            println!("Registered {} <{}>", user.name, user.email);
            println!("Run 'moneymate auth login {}' to start.", user.email);
        }

        AuthCommands::Login {
            email,
            password,
            remember,
        } => {
            let password = read_password(password, "Password: ")?;
            let user = service.login(&email, &password, remember)?;
            println!("Logged in as {}", user.name);
        }

        AuthCommands::Logout => {
            service.logout()?;
            println!("Logged out.");
        }

        AuthCommands::Whoami => match service.current_user()? {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                println!("  ID:              {}", user.id);
                println!("  Alert threshold: {:.0}%", user.alert_threshold * 100.0);
                if let Some(last) = user.last_login {
                    println!("  Last login:      {}", last.format("%Y-%m-%d %H:%M UTC"));
                }
            }
            None => println!("Not logged in."),
        },

        AuthCommands::Threshold { percent } => {
            let user = service.require_user()?;
            let updated = service.update_alert_threshold(user.id, percent / 100.0)?;
            println!(
                "Alert threshold set to {:.0}%",
                updated.alert_threshold * 100.0
            );
        }

        AuthCommands::Delete { yes } => {
            let user = service.require_user()?;
            if !yes {
                println!("This deactivates '{}' and logs you out.", user.email);
                println!("Run again with --yes to confirm.");
                return Ok(());
            }
            service.deactivate(user.id)?;
            println!("Account deactivated.");
        }
    }

    Ok(())
}
