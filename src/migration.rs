//! Database bootstrap: create the database if missing and the `products` table with its unique `sku` index.

use crate::error::AppError;
use crate::sql::PRODUCTS_TABLE;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Create `products` and its indexes if they do not exist. Safe to run on every start.
///
/// `products_sku_key` is the authoritative uniqueness guard for concurrent writers.
pub async fn ensure_products_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            sku TEXT NOT NULL,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            price DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (price >= 0),
            stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        PRODUCTS_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;

    let indexes = [
        format!("CREATE UNIQUE INDEX IF NOT EXISTS products_sku_key ON {} (sku)", PRODUCTS_TABLE),
        format!("CREATE INDEX IF NOT EXISTS products_category_idx ON {} (category)", PRODUCTS_TABLE),
        format!("CREATE INDEX IF NOT EXISTS products_name_idx ON {} (name)", PRODUCTS_TABLE),
    ];
    for sql in &indexes {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(sql).execute(pool).await?;
    }
    tracing::info!(table = PRODUCTS_TABLE, "schema ready");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
///
/// A URL without a database path names the server default, so nothing is created.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin_url, db_name)) = parse_db_name_from_url(database_url) else {
        tracing::debug!("DATABASE_URL has no database path; skipping create");
        return Ok(());
    };
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Config(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a database URL into the admin URL (same server, `postgres` database) and the
/// database name. `None` when the URL carries no path.
fn parse_db_name_from_url(url: &str) -> Option<(String, String)> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..].find('/').map(|i| scheme_end + i + 1)?;
    let path_and_query = &url[path_start..];
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = &url[..path_start];
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Some((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_database_name_and_admin_url() {
        let (admin, name) = parse_db_name_from_url("postgres://u:p@localhost:5432/products").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "products");
    }

    #[test]
    fn keeps_query_string_on_admin_url() {
        let (admin, name) =
            parse_db_name_from_url("postgres://localhost/catalog?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(name, "catalog");
    }

    #[test]
    fn url_without_path_has_no_database_name() {
        assert_eq!(parse_db_name_from_url("postgres://localhost"), None);
        assert_eq!(parse_db_name_from_url("postgres://u:p@db:5432"), None);
    }

    #[test]
    fn trailing_slash_gives_empty_name() {
        let (_, name) = parse_db_name_from_url("postgres://localhost/").unwrap();
        assert!(name.is_empty());
    }

    #[tokio::test]
    async fn url_without_path_skips_database_creation() {
        // Port 1 is never a Postgres server; success means no connection was attempted.
        ensure_database_exists("postgres://127.0.0.1:1").await.unwrap();
    }

    #[test]
    fn quote_ident_doubles_quotes() {
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }
}
