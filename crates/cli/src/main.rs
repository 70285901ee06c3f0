//! Printshop CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (all, or `storefront` / `admin` only)
//! printshop-cli migrate
//! printshop-cli migrate admin
//!
//! # Create an admin user
//! printshop-cli admin create -e admin@example.com -n "Admin Name" -r super_admin -p 'long password'
//!
//! # List admin users / reset a password
//! printshop-cli admin list
//! printshop-cli admin password -e admin@example.com -p 'new long password'
//!
//! # Load demo categories, products, a promo and default settings
//! printshop-cli seed demo
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` or `DATABASE_URL` - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::migrate::MigrationTarget;

#[derive(Parser)]
#[command(name = "printshop-cli")]
#[command(author, version, about = "Printshop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[arg(value_enum, default_value_t = MigrationTarget::All)]
        target: MigrationTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Load seed data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin role (`super_admin`, `admin`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: String,

        /// Initial password
        #[arg(short, long)]
        password: String,
    },
    /// List admin users
    List,
    /// Set a new password for an admin user
    Password {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// New password
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Demo catalog, promo code and default settings (safe to re-run)
    Demo {
        /// Seed file
        #[arg(short, long, default_value = "seeds/demo.yaml")]
        file: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "printshop_cli=info,printshop_admin=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => commands::migrate::run(target).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::admin::create_user(&email, &name, &role, &password).await?;
            }
            AdminAction::List => commands::admin::list_users().await?,
            AdminAction::Password { email, password } => {
                commands::admin::reset_password(&email, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Demo { file } => commands::seed::demo(&file).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_defaults_to_all() {
        let cli = Cli::try_parse_from(["printshop-cli", "migrate"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate {
                target: MigrationTarget::All
            }
        ));

        let cli = Cli::try_parse_from(["printshop-cli", "migrate", "admin"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate {
                target: MigrationTarget::Admin
            }
        ));
    }
}
