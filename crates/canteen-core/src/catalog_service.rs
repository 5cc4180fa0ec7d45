//! Product catalog used to pre-fill prices and to categorise sales.

use canteen_domain::{Product, ProductDraft, ProductPatch};
use tracing::info;
use uuid::Uuid;

use crate::{storage::ProductStore, time::Clock, validation, CoreError, ValidationError};

pub struct CatalogService {
    store: Box<dyn ProductStore>,
    clock: Box<dyn Clock>,
}

impl CatalogService {
    pub fn new(store: Box<dyn ProductStore>, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Adds a product. Names are unique regardless of case, including inactive products.
    pub fn add(&self, draft: ProductDraft) -> Result<Product, CoreError> {
        let draft = validation::validate_product_draft(&draft)?;
        let mut products = self.store.load_products()?;
        if products.iter().any(|product| product.matches_name(&draft.name)) {
            return Err(ValidationError::DuplicateProduct(draft.name).into());
        }
        let product = Product::new(draft, self.clock.now());
        products.push(product.clone());
        self.store.save_products(&products)?;
        info!(id = %product.id, name = %product.name, "product added");
        Ok(product)
    }

    pub fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, CoreError> {
        let patch = validation::validate_product_patch(&patch)?;
        let mut products = self.store.load_products()?;
        if let Some(name) = &patch.name {
            let clash = products
                .iter()
                .any(|product| product.id != id && product.matches_name(name));
            if clash {
                return Err(ValidationError::DuplicateProduct(name.clone()).into());
            }
        }
        let product = products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;
        product.apply(&patch, self.clock.now());
        let updated = product.clone();
        self.store.save_products(&products)?;
        info!(id = %id, "product updated");
        Ok(updated)
    }

    /// Soft delete: the product stays in the catalog but stops being offered.
    pub fn deactivate(&self, id: Uuid) -> Result<Product, CoreError> {
        self.update(
            id,
            ProductPatch {
                active: Some(false),
                ..ProductPatch::default()
            },
        )
    }

    pub fn get(&self, id: Uuid) -> Result<Product, CoreError> {
        self.store
            .load_products()?
            .into_iter()
            .find(|product| product.id == id)
            .ok_or(CoreError::ProductNotFound(id))
    }

    /// Lists products sorted by name, optionally restricted to active ones and a category.
    pub fn list(&self, active_only: bool, category: Option<&str>) -> Result<Vec<Product>, CoreError> {
        let wanted = category.map(|value| value.trim().to_lowercase());
        let mut products: Vec<Product> = self
            .store
            .load_products()?
            .into_iter()
            .filter(|product| !active_only || product.active)
            .filter(|product| match (&wanted, &product.category) {
                (None, _) => true,
                (Some(wanted), Some(category)) => category.to_lowercase() == *wanted,
                (Some(_), None) => false,
            })
            .collect();
        products.sort_by_key(|product| product.name.to_lowercase());
        Ok(products)
    }

    pub fn categories(&self) -> Result<Vec<String>, CoreError> {
        let mut categories: Vec<String> = self
            .store
            .load_products()?
            .into_iter()
            .filter_map(|product| product.category)
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    /// Case-insensitive lookup among active products.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Product>, CoreError> {
        Ok(self
            .store
            .load_products()?
            .into_iter()
            .find(|product| product.active && product.matches_name(name)))
    }

    pub fn all(&self) -> Result<Vec<Product>, CoreError> {
        self.store.load_products()
    }
}
