use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::config::Config;
use crate::models::{Token, TokenFilter};
use crate::store::TokenStore;

/// Key columns are cast to text so integer and UUID schemas compare alike.
const TOKEN_COLUMNS: &str = "id::text AS id, client_id::text AS client_id, user_id::text AS user_id, \
     revoked, expires_at::timestamptz AS expires_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    table: String,
    touch_updated_at: bool,
}

impl PgStore {
    pub async fn connect(cfg: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.database_url)
            .await?;
        Ok(Self::from_pool(pool, &cfg.table, cfg.touch_updated_at))
    }

    /// `table` must already be a validated identifier (see `config::validate_table_name`).
    pub fn from_pool(pool: PgPool, table: &str, touch_updated_at: bool) -> Self {
        Self {
            pool,
            table: table.to_string(),
            touch_updated_at,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn active_query<'a>(
        &self,
        select: &str,
        filter: &'a TokenFilter,
        now: DateTime<Utc>,
    ) -> QueryBuilder<'a, Postgres> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE revoked = false AND expires_at >= ",
            select, self.table
        ));
        qb.push_bind(now);

        if let Some(user) = &filter.user {
            qb.push(" AND user_id::text = ");
            qb.push_bind(user.as_str());
        }
        if let Some(client) = &filter.client {
            qb.push(" AND client_id::text = ");
            qb.push_bind(client.as_str());
        }

        qb
    }
}

#[async_trait]
impl TokenStore for PgStore {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Token>> {
        let row = sqlx::query_as::<_, Token>(&format!(
            "SELECT {} FROM {} WHERE id = $1",
            TOKEN_COLUMNS, self.table
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count_active(&self, filter: &TokenFilter, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let count: i64 = self
            .active_query("COUNT(*)", filter, now)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn list_active(
        &self,
        filter: &TokenFilter,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Token>> {
        let mut qb = self.active_query(TOKEN_COLUMNS, filter, now);
        qb.push(" ORDER BY id");

        let rows = qb.build_query_as::<Token>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn revoke(&self, id: &str) -> anyhow::Result<bool> {
        let sql = if self.touch_updated_at {
            format!(
                "UPDATE {} SET revoked = true, updated_at = NOW() WHERE id = $1",
                self.table
            )
        } else {
            format!("UPDATE {} SET revoked = true WHERE id = $1", self.table)
        };

        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
