use super::RequestValidator;
use crate::error::{AppError, DUPLICATE_SKU};
use crate::model::{ListParams, Product, ProductCreate, ProductUpdate};
use crate::response::ProductPage;
use crate::store::DynDataStore;

/// Stateless product operations. Cloning shares the underlying store handle.
#[derive(Clone)]
pub struct ProductService {
    store: DynDataStore,
}

impl ProductService {
    pub fn new(store: DynDataStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DynDataStore {
        &self.store
    }

    /// List products. `total` counts every match, independent of `skip`/`limit`.
    pub async fn list(&self, params: ListParams) -> Result<ProductPage, AppError> {
        let (page, filter) = params.resolve()?;
        let (items, total) = self.store.list(&filter, page).await?;
        Ok(ProductPage::new(items, total, page))
    }

    pub async fn get(&self, id: i64) -> Result<Product, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::product_not_found(id))
    }

    /// Create a product. The pre-check gives a clean error; the store's unique
    /// constraint still decides races between concurrent writers.
    pub async fn create(&self, body: ProductCreate) -> Result<Product, AppError> {
        let new = RequestValidator::validate_create(body)?;
        if self.store.find_by_sku(&new.sku).await?.is_some() {
            tracing::warn!(sku = %new.sku, "create rejected: sku already exists");
            return Err(AppError::Conflict(DUPLICATE_SKU.into()));
        }
        let product = self.store.insert(&new).await?;
        tracing::info!(id = product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    /// Apply the provided fields to product `id`. Either every field changes or none does.
    pub async fn update(&self, id: i64, body: ProductUpdate) -> Result<Product, AppError> {
        let changes = RequestValidator::validate_update(body)?;
        let current = self.get(id).await?;
        if changes.is_empty() {
            return Ok(current);
        }
        if let Some(sku) = changes.sku.as_deref() {
            if sku != current.sku {
                if let Some(other) = self.store.find_by_sku(sku).await? {
                    if other.id != id {
                        tracing::warn!(id, sku, holder = other.id, "update rejected: sku already exists");
                        return Err(AppError::Conflict(DUPLICATE_SKU.into()));
                    }
                }
            }
        }
        let product = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::product_not_found(id))?;
        tracing::info!(id = product.id, sku = %product.sku, "product updated");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DataStore, MemoryStore};
    use std::sync::Arc;

    fn create_body(sku: &str, name: &str, category: &str) -> ProductCreate {
        ProductCreate {
            sku: sku.into(),
            name: name.into(),
            category: category.into(),
            description: Some("desc".into()),
            price: 12.5,
            stock: Some(3),
        }
    }

    fn service() -> (ProductService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ProductService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn created_product_is_retrievable() {
        let (svc, _) = service();
        let created = svc.create(create_body("X1", "Widget", "Tools")).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.description.as_deref(), Some("desc"));
    }

    #[tokio::test]
    async fn duplicate_create_conflicts_and_store_is_unchanged() {
        let (svc, store) = service();
        svc.create(create_body("X1", "Widget", "Tools")).await.unwrap();
        let err = svc.create(create_body("X1", "Other", "Tools")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.count_rows().unwrap(), 1);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (svc, _) = service();
        assert!(matches!(svc.get(404).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_to_other_products_sku_conflicts_and_leaves_row() {
        let (svc, _) = service();
        svc.create(create_body("X1", "A", "Tools")).await.unwrap();
        let b = svc.create(create_body("X2", "B", "Tools")).await.unwrap();
        let changes = ProductUpdate {
            sku: Some("X1".into()),
            name: Some("changed".into()),
            ..Default::default()
        };
        assert!(matches!(svc.update(b.id, changes).await, Err(AppError::Conflict(_))));
        assert_eq!(svc.get(b.id).await.unwrap(), b);
    }

    #[tokio::test]
    async fn update_to_own_sku_succeeds() {
        let (svc, _) = service();
        let a = svc.create(create_body("X1", "A", "Tools")).await.unwrap();
        let changes = ProductUpdate {
            sku: Some("X1".into()),
            price: Some(99.0),
            ..Default::default()
        };
        let updated = svc.update(a.id, changes).await.unwrap();
        assert_eq!(updated.sku, "X1");
        assert_eq!(updated.price, 99.0);
        assert_eq!(updated.name, "A");
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let (svc, _) = service();
        let changes = ProductUpdate { name: Some("x".into()), ..Default::default() };
        assert!(matches!(svc.update(7, changes).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn empty_update_returns_current() {
        let (svc, _) = service();
        let a = svc.create(create_body("X1", "A", "Tools")).await.unwrap();
        assert_eq!(svc.update(a.id, ProductUpdate::default()).await.unwrap(), a);
    }

    #[tokio::test]
    async fn list_by_sku_returns_exact_match() {
        let (svc, _) = service();
        let a = svc.create(create_body("X1", "A", "Tools")).await.unwrap();
        svc.create(create_body("X2", "B", "Tools")).await.unwrap();
        let page = svc
            .list(ListParams { sku: Some("X1".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, a.id);
    }

    #[tokio::test]
    async fn list_truncates_items_but_counts_all() {
        let (svc, store) = service();
        for i in 0..12 {
            svc.create(create_body(&format!("S{i}"), "Item", "Tools")).await.unwrap();
        }
        let page = svc.list(ListParams::default()).await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 12);
        assert_eq!(page.page, 1);
        assert_eq!(page.size, 10);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn list_rejects_bad_pagination() {
        let (svc, _) = service();
        let err = svc
            .list(ListParams { limit: Some(0), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
