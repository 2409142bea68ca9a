//! Database Config

use clap::Args;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string. The role must be subject to row-level security; startup
    /// fails for superusers and roles with `BYPASSRLS`.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}
