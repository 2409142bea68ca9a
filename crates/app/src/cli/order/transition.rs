use clap::Args;
use trolley::orders::OrderStatus;
use trolley_app::domain::{
    orders::{
        OrdersService, PgOrdersService,
        models::{OrderUuid, StatusTransition},
    },
    tenants::models::TenantUuid,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct TransitionOrderArgs {
    /// Tenant owning the order
    #[arg(long)]
    tenant: TenantUuid,

    /// Order UUID
    #[arg(long)]
    order: OrderUuid,

    /// Target status: pending, confirmed, processing, shipped, delivered or cancelled
    #[arg(long)]
    status: OrderStatus,

    /// Staff member performing the change
    #[arg(long)]
    actor: Option<Uuid>,

    /// Note recorded in the order history
    #[arg(long)]
    note: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: TransitionOrderArgs) -> Result<(), String> {
    let service = PgOrdersService::new(crate::cli::connect(&args.database_url).await?);

    let order = service
        .transition_order(
            args.tenant,
            args.order,
            StatusTransition {
                to: args.status,
                actor: args.actor,
                note: args.note,
            },
        )
        .await
        .map_err(|error| format!("failed to transition order: {error}"))?;

    println!("order_number: {}", order.order_number);
    println!("status: {}", order.status);

    Ok(())
}
