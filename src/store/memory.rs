use super::CookingStore;
use crate::cooking::{Cooking, CookingHistoryEntry, RefrigeratorStock};
use crate::error::StoreError;
use crate::food_catalog::FoodCatalog;

/// Store kept entirely in memory. Useful for tests and for embedding the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: FoodCatalog,
    cookings: Vec<Cooking>,
    stock: RefrigeratorStock,
    history: Vec<CookingHistoryEntry>,
}

impl MemoryStore {
    pub fn new(catalog: FoodCatalog, stock: RefrigeratorStock) -> Self {
        MemoryStore {
            catalog,
            stock,
            ..Default::default()
        }
    }

    pub fn stock(&self) -> &RefrigeratorStock {
        &self.stock
    }

    pub fn history(&self) -> &[CookingHistoryEntry] {
        &self.history
    }
}

impl CookingStore for MemoryStore {
    fn food_catalog(&self) -> Result<FoodCatalog, StoreError> {
        Ok(self.catalog.clone())
    }

    fn cookings(&self) -> Result<Vec<Cooking>, StoreError> {
        Ok(self.cookings.clone())
    }

    fn refrigerator_stock(&self) -> Result<RefrigeratorStock, StoreError> {
        Ok(self.stock.clone())
    }

    fn cooking_history(&self) -> Result<Vec<CookingHistoryEntry>, StoreError> {
        Ok(self.history.clone())
    }

    fn insert_cooking(&mut self, record: &Cooking) -> Result<(), StoreError> {
        self.cookings.push(record.clone());
        Ok(())
    }

    fn append_cooking_history(&mut self, entry: &CookingHistoryEntry) -> Result<(), StoreError> {
        self.history.push(entry.clone());
        Ok(())
    }
}
