//! Builds parameterized SELECT, COUNT, INSERT and UPDATE statements for products.

use super::params::BindValue;
use crate::model::{NewProduct, Page, ProductFilter, ProductUpdate};

pub const PRODUCTS_TABLE: &str = "products";

/// Columns returned by every statement, in `Product` field order.
pub const PRODUCT_COLUMNS: &str =
    "id, sku, name, category, description, price, stock, created_at, updated_at";

/// First statement of a list transaction so COUNT and the page read the same snapshot.
pub const SNAPSHOT_READ: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY";

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    fn push_param(&mut self, v: impl Into<BindValue>) -> usize {
        self.params.push(v.into());
        self.params.len()
    }
}

/// Escape `\`, `%` and `_` so user input is matched literally inside ILIKE.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for ch in s.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn push_where(q: &mut QueryBuf, filter: &ProductFilter) -> String {
    let mut parts = Vec::new();
    if let Some(name) = &filter.name {
        let n = q.push_param(format!("%{}%", escape_like(name)));
        parts.push(format!("name ILIKE ${}", n));
    }
    if let Some(category) = &filter.category {
        let n = q.push_param(format!("%{}%", escape_like(category)));
        parts.push(format!("category ILIKE ${}", n));
    }
    if let Some(sku) = &filter.sku {
        let n = q.push_param(sku.as_str());
        parts.push(format!("sku = ${}", n));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// SELECT one page of filtered rows ordered by id.
pub fn select_page(filter: &ProductFilter, page: Page) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = push_where(&mut q, filter);
    let limit = q.push_param(page.limit);
    let offset = q.push_param(page.skip);
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY id LIMIT ${} OFFSET ${}",
        PRODUCT_COLUMNS, PRODUCTS_TABLE, where_clause, limit, offset
    );
    q
}

/// COUNT of all rows matching the filter.
pub fn count(filter: &ProductFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = push_where(&mut q, filter);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", PRODUCTS_TABLE, where_clause);
    q
}

pub fn select_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!("SELECT {} FROM {} WHERE id = ${}", PRODUCT_COLUMNS, PRODUCTS_TABLE, n);
    q
}

pub fn select_by_sku(sku: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(sku);
    q.sql = format!("SELECT {} FROM {} WHERE sku = ${}", PRODUCT_COLUMNS, PRODUCTS_TABLE, n);
    q
}

pub fn insert(product: &NewProduct) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders = [
        q.push_param(product.sku.as_str()),
        q.push_param(product.name.as_str()),
        q.push_param(product.category.as_str()),
        q.push_param(product.description.clone()),
        q.push_param(product.price),
        q.push_param(product.stock),
    ]
    .iter()
    .map(|n| format!("${}", n))
    .collect::<Vec<_>>()
    .join(", ");
    q.sql = format!(
        "INSERT INTO {} (sku, name, category, description, price, stock) VALUES ({}) RETURNING {}",
        PRODUCTS_TABLE, placeholders, PRODUCT_COLUMNS
    );
    q
}

/// UPDATE by id: SET only the fields present in `changes`, always refreshing `updated_at`.
pub fn update(id: i64, changes: &ProductUpdate) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    if let Some(v) = &changes.sku {
        sets.push(format!("sku = ${}", q.push_param(v.as_str())));
    }
    if let Some(v) = &changes.name {
        sets.push(format!("name = ${}", q.push_param(v.as_str())));
    }
    if let Some(v) = &changes.category {
        sets.push(format!("category = ${}", q.push_param(v.as_str())));
    }
    if let Some(v) = &changes.description {
        sets.push(format!("description = ${}", q.push_param(v.as_str())));
    }
    if let Some(v) = changes.price {
        sets.push(format!("price = ${}", q.push_param(v)));
    }
    if let Some(v) = changes.stock {
        sets.push(format!("stock = ${}", q.push_param(v)));
    }
    sets.push("updated_at = NOW()".to_string());
    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
        PRODUCTS_TABLE,
        sets.join(", "),
        id_param,
        PRODUCT_COLUMNS
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn select_page_without_filters() {
        let q = select_page(&ProductFilter::default(), Page { skip: 20, limit: 10 });
        assert_eq!(
            q.sql,
            format!("SELECT {} FROM products ORDER BY id LIMIT $1 OFFSET $2", PRODUCT_COLUMNS)
        );
        assert_eq!(q.params, vec![BindValue::I64(10), BindValue::I64(20)]);
    }

    #[test]
    fn filters_bind_in_order_and_count_shares_where_clause() {
        let filter = ProductFilter {
            name: Some("wid".into()),
            category: None,
            sku: Some("X1".into()),
        };
        let q = select_page(&filter, Page { skip: 0, limit: 5 });
        assert!(q.sql.contains(" WHERE name ILIKE $1 AND sku = $2 ORDER BY id LIMIT $3 OFFSET $4"));
        assert_eq!(q.params[0], BindValue::Text("%wid%".into()));
        assert_eq!(q.params[1], BindValue::Text("X1".into()));

        let c = count(&filter);
        assert_eq!(c.sql, "SELECT COUNT(*) FROM products WHERE name ILIKE $1 AND sku = $2");
        assert_eq!(c.params.len(), 2);
    }

    #[test]
    fn list_snapshot_is_repeatable_read() {
        assert!(SNAPSHOT_READ.starts_with("SET TRANSACTION"));
        assert!(SNAPSHOT_READ.contains("REPEATABLE READ"));
    }

    #[test]
    fn insert_binds_all_columns() {
        let q = insert(&NewProduct {
            sku: "X1".into(),
            name: "Widget".into(),
            category: "Tools".into(),
            description: None,
            price: 9.5,
            stock: 3,
        });
        assert!(q.sql.starts_with("INSERT INTO products (sku, name, category, description, price, stock) VALUES ($1, $2, $3, $4, $5, $6) RETURNING"));
        assert_eq!(q.params[3], BindValue::NullText);
        assert_eq!(q.params[4], BindValue::F64(9.5));
        assert_eq!(q.params[5], BindValue::I32(3));
    }

    #[test]
    fn update_sets_only_present_fields() {
        let changes = ProductUpdate {
            sku: Some("X9".into()),
            stock: Some(7),
            ..Default::default()
        };
        let q = update(42, &changes);
        assert!(q.sql.starts_with("UPDATE products SET sku = $1, stock = $2, updated_at = NOW() WHERE id = $3 RETURNING"));
        assert_eq!(q.params, vec![BindValue::Text("X9".into()), BindValue::I32(7), BindValue::I64(42)]);
    }
}
