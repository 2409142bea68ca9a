use clap::Args;
use trolley_app::domain::tenants::{PgTenantsService, TenantsService, models::TenantUuid};

#[derive(Debug, Args)]
pub(crate) struct ShowTenantArgs {
    /// Tenant UUID
    #[arg(long)]
    tenant_uuid: TenantUuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ShowTenantArgs) -> Result<(), String> {
    let tenants = PgTenantsService::new(crate::cli::connect(&args.database_url).await?);

    let tenant = tenants
        .get_tenant(args.tenant_uuid)
        .await
        .map_err(|error| format!("failed to load tenant {}: {error}", args.tenant_uuid))?;

    super::print_tenant(&tenant);

    Ok(())
}
