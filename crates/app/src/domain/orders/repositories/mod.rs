mod items;
mod logs;
mod orders;

use sqlx::{Postgres, Transaction};

pub(crate) use items::PgOrderItemsRepository;
pub(crate) use logs::PgOrderStatusLogsRepository;
pub(crate) use orders::{NewOrderRow, OrderRow, PgOrdersRepository};

use crate::domain::orders::models::Order;

/// Attaches items and status history to an order row.
pub(crate) async fn load_order(
    tx: &mut Transaction<'_, Postgres>,
    row: OrderRow,
) -> Result<Order, sqlx::Error> {
    let items = PgOrderItemsRepository::new()
        .get_order_items(tx, row.uuid)
        .await?;

    let history = PgOrderStatusLogsRepository::new()
        .get_order_status_logs(tx, row.uuid)
        .await?;

    Ok(row.into_order(items, history))
}
