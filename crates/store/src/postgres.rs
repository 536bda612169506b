use async_trait::async_trait;
use common::{OrderId, OwnerId};
use domain::Order;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{OrderStore, Result};

/// PostgreSQL-backed order store.
///
/// The full order record is stored as a jsonb payload; id, owner and
/// status are extracted into columns for lookups.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let payload: serde_json::Value = row.try_get("payload")?;
        Ok(serde_json::from_value(payload)?)
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT payload FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn save(&self, order: Order) -> Result<Order> {
        let id = match order.id() {
            Some(id) => id,
            None => OrderId::new(),
        };
        let order = order.with_id(id);
        let payload = serde_json::to_value(&order)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, owner_id, status, created_date, payload)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                payload = EXCLUDED.payload
            "#,
        )
        .bind(id.as_uuid())
        .bind(order.owner_id().as_uuid())
        .bind(order.status().as_str())
        .bind(order.created_date())
        .bind(payload)
        .execute(&self.pool)
        .await?;

        tracing::debug!(%id, status = %order.status(), "order saved");
        Ok(order)
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        tracing::debug!(%id, removed, "order delete");
        Ok(removed)
    }

    async fn find_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT payload FROM orders WHERE owner_id = $1 ORDER BY created_date ASC",
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }
}
