use clap::{Args, Subcommand};

mod create;
mod show;

#[derive(Debug, Args)]
pub(crate) struct TenantCommand {
    #[command(subcommand)]
    command: TenantSubcommand,
}

#[derive(Debug, Subcommand)]
enum TenantSubcommand {
    /// Register a new tenant.
    Create(create::CreateTenantArgs),

    /// Print an existing tenant.
    Show(show::ShowTenantArgs),
}

pub(crate) async fn run(command: TenantCommand) -> Result<(), String> {
    match command.command {
        TenantSubcommand::Create(args) => create::run(args).await,
        TenantSubcommand::Show(args) => show::run(args).await,
    }
}

fn print_tenant(tenant: &trolley_app::domain::tenants::models::Tenant) {
    println!("tenant_uuid: {}", tenant.uuid);
    println!("tenant_name: {}", tenant.name);
    println!("created_at: {}", tenant.created_at);
}
