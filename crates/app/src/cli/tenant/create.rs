use clap::Args;
use trolley_app::domain::tenants::{
    PgTenantsService, TenantsService,
    models::{NewTenant, TenantUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateTenantArgs {
    /// Display name, must not be blank
    #[arg(long)]
    name: String,

    /// UUID to register the tenant under; a v7 UUID is generated when omitted
    #[arg(long)]
    tenant_uuid: Option<TenantUuid>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateTenantArgs) -> Result<(), String> {
    let tenants = PgTenantsService::new(crate::cli::connect(&args.database_url).await?);

    let new_tenant = NewTenant {
        uuid: args.tenant_uuid.unwrap_or_default(),
        name: args.name,
    };

    let tenant = tenants
        .create_tenant(new_tenant)
        .await
        .map_err(|error| format!("failed to create tenant: {error}"))?;

    super::print_tenant(&tenant);

    Ok(())
}
