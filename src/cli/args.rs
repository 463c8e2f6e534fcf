//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_SEED_MEMBERS;

/// Member Directory - Member and team queries over SeaORM
#[derive(Parser, Debug)]
#[command(name = "member-directory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Insert sample teams and members
    Seed(SeedArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (defaults to SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Number of members to create
    #[arg(short, long, default_value_t = DEFAULT_SEED_MEMBERS, value_parser = clap::value_parser!(i32).range(0..))]
    pub count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_count_default_and_override() {
        let cli = Cli::parse_from(["member-directory", "seed"]);
        assert!(matches!(cli.command, Commands::Seed(SeedArgs { count }) if count == DEFAULT_SEED_MEMBERS));

        let cli = Cli::parse_from(["member-directory", "seed", "--count", "7"]);
        assert!(matches!(cli.command, Commands::Seed(SeedArgs { count: 7 })));
    }

    #[test]
    fn test_negative_seed_count_is_rejected() {
        assert!(Cli::try_parse_from(["member-directory", "seed", "--count", "-1"]).is_err());
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["member-directory", "serve", "--port", "9090"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9090));
                assert_eq!(args.host, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
