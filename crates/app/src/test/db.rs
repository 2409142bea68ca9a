//! Per-test PostgreSQL databases in a shared container.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, query};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

pub(super) const SUPERUSER: &str = "trolley_test";
pub(super) const SUPERUSER_PASSWORD: &str = "trolley_test_password";

/// Shared PostgreSQL container that starts once and is reused across all tests
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Receives names of databases to drop once their `TestDb` goes away
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(SUPERUSER)
        .with_password(SUPERUSER_PASSWORD)
        .with_db_name(SUPERUSER)
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Ok(mut conn) = PgConnection::connect(&server_url("postgres").await).await {
                let _ = query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
                    .execute(&mut conn)
                    .await;
                let _ = conn.close().await;
            }
        }
    });

    sender
}

/// Superuser connection string for `database` on the shared container.
async fn server_url(database: &str) -> String {
    let container = POSTGRES_CONTAINER
        .get_or_init(init_postgres_container)
        .await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{SUPERUSER}:{SUPERUSER_PASSWORD}@{host}:{port}/{database}")
}

/// An isolated, migrated database, dropped when the value goes out of scope.
///
/// Every test gets a fresh database, so services commit normally and no rollback is needed
/// between tests.
#[derive(Debug)]
pub struct TestDb {
    /// Superuser pool; RLS does not apply to it.
    pub pool: PgPool,

    /// Database name.
    pub name: String,

    /// The URL `pool` was connected with.
    pub(super) superuser_url: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        let name = format!("trolley_test_{}", Uuid::now_v7().simple());

        let mut conn = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("Failed to connect to postgres database");

        query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let superuser_url = server_url(&name).await;

        let pool = PgPool::connect(&superuser_url)
            .await
            .expect("Failed to create pool for database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self {
            pool,
            name,
            superuser_url,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_every_table() {
        let test_db = TestDb::new().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT tablename::text FROM pg_tables WHERE schemaname = 'public' ORDER BY 1",
        )
        .fetch_all(test_db.pool())
        .await
        .expect("Failed to list tables");

        for table in [
            "cart_items",
            "carts",
            "order_items",
            "order_number_sequences",
            "order_status_logs",
            "orders",
            "tenants",
        ] {
            assert!(
                tables.iter().any(|name| name == table),
                "missing table {table}"
            );
        }
    }
}
