use super::DataStore;
use crate::error::{AppError, DUPLICATE_SKU};
use crate::model::{NewProduct, Page, Product, ProductFilter, ProductUpdate};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-process product store with the same unique-`sku` rule as the `products` table.
///
/// Intended for tests and local runs. Data is lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<i64, Product>,
    last_id: i64,
}

impl Inner {
    fn sku_taken(&self, sku: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|p| p.sku == sku && Some(p.id) != except)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products. Fails if the lock was poisoned.
    pub fn count_rows(&self) -> Result<usize, AppError> {
        Ok(self.read()?.rows.len())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, AppError> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, AppError> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<(Vec<Product>, i64), AppError> {
        let inner = self.read()?;
        let matching: Vec<&Product> = inner.rows.values().filter(|p| filter.matches(p)).collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError> {
        Ok(self.read()?.rows.values().find(|p| p.sku == sku).cloned())
    }

    async fn insert(&self, product: &NewProduct) -> Result<Product, AppError> {
        let mut inner = self.write()?;
        if inner.sku_taken(&product.sku, None) {
            return Err(AppError::Conflict(DUPLICATE_SKU.into()));
        }
        inner.last_id += 1;
        let now = Utc::now();
        let row = Product {
            id: inner.last_id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: &ProductUpdate) -> Result<Option<Product>, AppError> {
        let mut inner = self.write()?;
        if let Some(sku) = &changes.sku {
            if inner.sku_taken(sku, Some(id)) {
                return Err(AppError::Conflict(DUPLICATE_SKU.into()));
            }
        }
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(row);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(sku: &str, name: &str, category: &str) -> NewProduct {
        NewProduct {
            sku: sku.into(),
            name: name.into(),
            category: category.into(),
            description: None,
            price: 10.0,
            stock: 1,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.insert(&new_product("A1", "Apple", "Fruit")).await.unwrap();
        let b = store.insert(&new_product("B1", "Banana", "Fruit")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.get(2).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn duplicate_sku_insert_is_rejected() {
        let store = MemoryStore::new();
        store.insert(&new_product("A1", "Apple", "Fruit")).await.unwrap();
        let err = store.insert(&new_product("A1", "Other", "Fruit")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.count_rows().unwrap(), 1);
    }

    #[tokio::test]
    async fn update_to_taken_sku_leaves_row_untouched() {
        let store = MemoryStore::new();
        store.insert(&new_product("A1", "Apple", "Fruit")).await.unwrap();
        let b = store.insert(&new_product("B1", "Banana", "Fruit")).await.unwrap();
        let changes = ProductUpdate {
            sku: Some("A1".into()),
            name: Some("Renamed".into()),
            ..Default::default()
        };
        assert!(matches!(store.update(b.id, &changes).await, Err(AppError::Conflict(_))));
        assert_eq!(store.get(b.id).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn update_missing_row_is_none() {
        let store = MemoryStore::new();
        let changes = ProductUpdate { stock: Some(1), ..Default::default() };
        assert_eq!(store.update(99, &changes).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_counts_all_matches_and_pages_by_id() {
        let store = MemoryStore::new();
        for i in 0..15 {
            let category = if i % 3 == 0 { "Tools" } else { "Garden" };
            store
                .insert(&new_product(&format!("S{i}"), &format!("Item {i}"), category))
                .await
                .unwrap();
        }
        let (items, total) = store
            .list(&ProductFilter::default(), Page { skip: 10, limit: 10 })
            .await
            .unwrap();
        assert_eq!(total, 15);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].id, 11);

        let tools = ProductFilter { category: Some("tools".into()), ..Default::default() };
        let (items, total) = store.list(&tools, Page { skip: 0, limit: 2 }).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn poisoned_lock_is_reported_not_hidden() {
        let store = MemoryStore::new();
        let _ = std::panic::catch_unwind(|| {
            let _guard = store.inner.write().unwrap();
            panic!("poison the lock");
        });
        assert!(matches!(store.count_rows(), Err(AppError::Internal(_))));
    }
}
