//! Order Status Logs Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use trolley::orders::StatusChange;
use uuid::Uuid;

use crate::{
    database::{try_get_parsed, try_get_parsed_opt, try_get_timestamp},
    domain::orders::models::{OrderStatusLog, OrderStatusLogUuid, OrderUuid},
};

const CREATE_ORDER_STATUS_LOG_SQL: &str = include_str!("../sql/create_order_status_log.sql");
const GET_ORDER_STATUS_LOGS_SQL: &str = include_str!("../sql/get_order_status_logs.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderStatusLogsRepository;

impl PgOrderStatusLogsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Appends a history entry. Entries are never updated or deleted.
    pub(crate) async fn create_order_status_log(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        change: StatusChange,
        actor: Option<Uuid>,
        note: Option<&str>,
    ) -> Result<OrderStatusLog, sqlx::Error> {
        query_as::<Postgres, OrderStatusLog>(CREATE_ORDER_STATUS_LOG_SQL)
            .bind(OrderStatusLogUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(change.from.map(|status| status.as_str()))
            .bind(change.to.as_str())
            .bind(actor)
            .bind(note)
            .fetch_one(&mut **tx)
            .await
    }

    /// History of an order, oldest first.
    pub(crate) async fn get_order_status_logs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderStatusLog>, sqlx::Error> {
        query_as::<Postgres, OrderStatusLog>(GET_ORDER_STATUS_LOGS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderStatusLog {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderStatusLogUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            from_status: try_get_parsed_opt(row, "from_status")?,
            to_status: try_get_parsed(row, "to_status")?,
            actor_uuid: row.try_get("actor_uuid")?,
            note: row.try_get("note")?,
            created_at: try_get_timestamp(row, "created_at")?,
        })
    }
}
