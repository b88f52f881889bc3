//! The tabular store the engine reads from and writes to.
//!
//! Every read returns a fresh snapshot and every write commits immediately.
//! There is no multi-step transaction: under concurrent use the registry's
//! check-then-write sequences can race (see `CookingRegistry`).

pub mod csv_store;
pub mod memory;

pub use csv_store::CsvStore;
pub use memory::MemoryStore;

use crate::cooking::{Cooking, CookingHistoryEntry, RefrigeratorStock};
use crate::error::StoreError;
use crate::food_catalog::FoodCatalog;

pub trait CookingStore {
    fn food_catalog(&self) -> Result<FoodCatalog, StoreError>;

    /// All cookings with their food attributes.
    fn cookings(&self) -> Result<Vec<Cooking>, StoreError>;

    fn refrigerator_stock(&self) -> Result<RefrigeratorStock, StoreError>;

    /// History entries in insertion order.
    fn cooking_history(&self) -> Result<Vec<CookingHistoryEntry>, StoreError>;

    fn insert_cooking(&mut self, record: &Cooking) -> Result<(), StoreError>;

    fn append_cooking_history(&mut self, entry: &CookingHistoryEntry) -> Result<(), StoreError>;
}
