//! PostgreSQL `DataStore`. Each call acquires one pooled connection and returns it on drop.

use super::DataStore;
use crate::error::AppError;
use crate::model::{NewProduct, Page, Product, ProductFilter, ProductUpdate};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgPool, Postgres};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, AppError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::error!(error = %e, "failed to acquire connection");
            AppError::Db(e)
        })
    }

    async fn fetch_optional(&self, q: QueryBuf) -> Result<Option<Product>, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_as::<_, Product>(&sql);
        for p in params {
            query = query.bind(p);
        }
        Ok(query.fetch_optional(&mut *conn).await?)
    }

    async fn write_returning(&self, q: QueryBuf) -> Result<Option<Product>, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "write");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_as::<_, Product>(&sql);
        for p in params {
            query = query.bind(p);
        }
        query
            .fetch_optional(&mut *conn)
            .await
            .map_err(AppError::from_write)
    }
}

#[async_trait]
impl DataStore for PgStore {
    /// COUNT and page run in one REPEATABLE READ transaction, so `total` matches `items`.
    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<(Vec<Product>, i64), AppError> {
        let mut conn = self.acquire().await?;
        let mut tx = conn.begin().await?;
        sqlx::query(sql::SNAPSHOT_READ).execute(&mut *tx).await?;

        let count_q = sql::count(filter);
        tracing::debug!(sql = %count_q.sql, params = ?count_q.params, "query");
        let mut count = sqlx::query_scalar::<_, i64>(&count_q.sql);
        for p in count_q.params {
            count = count.bind(p);
        }
        let total = count.fetch_one(&mut *tx).await?;

        let page_q = sql::select_page(filter, page);
        tracing::debug!(sql = %page_q.sql, params = ?page_q.params, "query");
        let mut rows = sqlx::query_as::<_, Product>(&page_q.sql);
        for p in page_q.params {
            rows = rows.bind(p);
        }
        let items = rows.fetch_all(&mut *tx).await?;
        tx.commit().await?;
        Ok((items, total))
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, AppError> {
        self.fetch_optional(sql::select_by_id(id)).await
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError> {
        self.fetch_optional(sql::select_by_sku(sku)).await
    }

    async fn insert(&self, product: &NewProduct) -> Result<Product, AppError> {
        self.write_returning(sql::insert(product))
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update(&self, id: i64, changes: &ProductUpdate) -> Result<Option<Product>, AppError> {
        self.write_returning(sql::update(id, changes)).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
