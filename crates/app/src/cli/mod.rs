use clap::{Parser, Subcommand};
use trolley_app::database::{self, Db};

mod order;
mod tenant;

#[derive(Debug, Parser)]
#[command(name = "trolley-app", about = "Trolley CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Tenant administration.
    Tenant(tenant::TenantCommand),

    /// Back-office order operations.
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Tenant(command) => tenant::run(command).await,
            Commands::Order(command) => order::run(command).await,
        }
    }
}

/// Opens a pool against `database_url`, flattening failures into CLI messages.
async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
