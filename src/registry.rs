use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::availability::{shortages, Shortage};
use crate::composition_matcher::find_duplicate;
use crate::cooking::{
    Cooking, CookingDraft, CookingHistoryEntry, CookingId, FoodAttribute, FoodSelection,
};
use crate::error::{CookingError, StoreError};
use crate::food_catalog::{FoodCatalog, FoodId, FoodItem};
use crate::nutrition::{compute_nutrition, NutritionSummary};
use crate::store::CookingStore;

/// Result of a successful registration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Registration {
    pub cooking_id: CookingId,
    pub nutrition: NutritionSummary,
}

/// A cooking together with what the refrigerator is missing for it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CookingAvailability {
    pub cooking: Cooking,
    pub shortages: Vec<Shortage>,
}

impl CookingAvailability {
    pub fn is_cookable(&self) -> bool {
        self.shortages.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RefrigeratorLine {
    pub food_id: FoodId,
    /// `None` when the food is not in the catalog.
    pub food_name: Option<String>,
    pub grams: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryLine {
    pub issued_date: DateTime<Utc>,
    pub cooking: Cooking,
}

/// Registers cookings and records cooking events against a store.
///
/// Both writes are check-then-act over fresh snapshots. That is sound for one user;
/// with several writers the duplicate check and the stock check can race and need
/// a unique constraint on the composition and a conditional append in the store.
pub struct CookingRegistry<S: CookingStore> {
    store: S,
}

impl<S: CookingStore> CookingRegistry<S> {
    pub fn new(store: S) -> Self {
        CookingRegistry { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers a new cooking unless an existing one has the same composition.
    pub fn register_cooking(&mut self, draft: &CookingDraft) -> Result<Registration, CookingError> {
        let cooking_name = draft.cooking_name.trim();
        if cooking_name.is_empty() {
            return Err(CookingError::InvalidName);
        }

        let catalog = self.store.food_catalog()?;
        let items = resolve_selections(&catalog, &draft.selections)?;
        let nutrition = compute_nutrition(items.iter().copied())?;
        let food_attributes: Vec<FoodAttribute> = items
            .iter()
            .map(|(food, quantity)| FoodAttribute::new(food, *quantity))
            .collect();

        let existing = self.store.cookings()?;
        debug!(
            "Checking composition of '{}' against {} cooking(s)",
            cooking_name,
            existing.len()
        );
        if let Some(duplicate) = find_duplicate(&food_attributes, &existing) {
            warn!(
                "Rejected '{}': same composition as CookingID {} ('{}')",
                cooking_name, duplicate.cooking_id, duplicate.cooking_name
            );
            return Err(CookingError::DuplicateComposition {
                existing: duplicate.cooking_id,
            });
        }

        let cooking_id = match existing.iter().map(|cooking| cooking.cooking_id).max() {
            None => 1,
            Some(max_id) => max_id
                .checked_add(1)
                .ok_or(CookingError::RegistrationFailed(StoreError::IdsExhausted))?,
        };
        let cooking = Cooking {
            cooking_id,
            cooking_name: cooking_name.to_string(),
            description: draft.description.clone(),
            is_favorite: draft.is_favorite,
            last_update_date: Utc::now(),
            food_attributes,
        };
        self.store
            .insert_cooking(&cooking)
            .map_err(CookingError::RegistrationFailed)?;

        info!(
            "Registered cooking {} '{}' ({} ingredient(s), {:.1} kcal)",
            cooking_id,
            cooking.cooking_name,
            cooking.food_attributes.len(),
            nutrition.calory_total
        );
        Ok(Registration {
            cooking_id,
            nutrition,
        })
    }

    /// Appends a history entry if the refrigerator covers every ingredient.
    /// Stock is left untouched.
    pub fn record_cooking_event(
        &mut self,
        cooking_id: CookingId,
    ) -> Result<CookingHistoryEntry, CookingError> {
        let cooking = self.cooking(cooking_id)?;
        let stock = self.store.refrigerator_stock()?;

        let missing = shortages(&cooking, &stock);
        if !missing.is_empty() {
            warn!(
                "CookingID {} cannot be cooked: {} ingredient(s) short",
                cooking_id,
                missing.len()
            );
            return Err(CookingError::InsufficientStock {
                cooking_id,
                shortages: missing,
            });
        }

        let entry = CookingHistoryEntry {
            cooking_id,
            issued_date: Utc::now(),
        };
        self.store.append_cooking_history(&entry)?;
        info!("Recorded cooking of CookingID {}", cooking_id);
        Ok(entry)
    }

    /// Nutrition of a selection that has not been registered.
    pub fn preview_nutrition(
        &self,
        selections: &[FoodSelection],
    ) -> Result<NutritionSummary, CookingError> {
        let catalog = self.store.food_catalog()?;
        let items = resolve_selections(&catalog, selections)?;
        compute_nutrition(items)
    }

    pub fn food_catalog(&self) -> Result<FoodCatalog, CookingError> {
        Ok(self.store.food_catalog()?)
    }

    pub fn cookings(&self) -> Result<Vec<Cooking>, CookingError> {
        Ok(self.store.cookings()?)
    }

    pub fn cooking(&self, cooking_id: CookingId) -> Result<Cooking, CookingError> {
        self.store
            .cookings()?
            .into_iter()
            .find(|cooking| cooking.cooking_id == cooking_id)
            .ok_or(CookingError::NotFound(cooking_id))
    }

    pub fn cooking_nutrition(&self, cooking_id: CookingId) -> Result<NutritionSummary, CookingError> {
        let cooking = self.cooking(cooking_id)?;
        let catalog = self.store.food_catalog()?;
        cooking.nutrition(&catalog)
    }

    /// Every cooking with its current shortages, in registration order.
    pub fn cookable_cookings(&self) -> Result<Vec<CookingAvailability>, CookingError> {
        let stock = self.store.refrigerator_stock()?;
        Ok(self
            .store
            .cookings()?
            .into_iter()
            .map(|cooking| {
                let shortages = shortages(&cooking, &stock);
                CookingAvailability { cooking, shortages }
            })
            .collect())
    }

    pub fn refrigerator_contents(&self) -> Result<Vec<RefrigeratorLine>, CookingError> {
        let catalog = self.store.food_catalog()?;
        let stock = self.store.refrigerator_stock()?;
        Ok(stock
            .entries()
            .into_iter()
            .map(|(food_id, grams)| RefrigeratorLine {
                food_id,
                food_name: catalog.get(food_id).map(|item| item.name.clone()),
                grams,
            })
            .collect())
    }

    /// History joined with the cookings it refers to, oldest first.
    pub fn history(&self) -> Result<Vec<HistoryLine>, CookingError> {
        let cookings = self.store.cookings()?;
        let mut lines = Vec::new();
        for entry in self.store.cooking_history()? {
            match cookings.iter().find(|c| c.cooking_id == entry.cooking_id) {
                Some(cooking) => lines.push(HistoryLine {
                    issued_date: entry.issued_date,
                    cooking: cooking.clone(),
                }),
                None => warn!(
                    "Skipping history entry for unknown CookingID {}",
                    entry.cooking_id
                ),
            }
        }
        lines.sort_by_key(|line| line.issued_date);
        Ok(lines)
    }
}

fn resolve_selections<'c>(
    catalog: &'c FoodCatalog,
    selections: &[FoodSelection],
) -> Result<Vec<(&'c FoodItem, f32)>, CookingError> {
    selections
        .iter()
        .map(|selection| {
            catalog
                .get(selection.food_id)
                .map(|food| (food, selection.quantity))
                .ok_or(CookingError::UnknownFood(selection.food_id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooking::RefrigeratorStock;
    use crate::store::MemoryStore;

    const EGG: FoodId = 1;
    const FLOUR: FoodId = 2;

    fn catalog() -> FoodCatalog {
        vec![
            FoodItem {
                food_id: EGG,
                name: "Egg".to_string(),
                standard_unit_name: "piece".to_string(),
                standard_unit_grams: 60.0,
                calory_per_gram: 1.5,
                protein_per_gram: 0.125,
                fat_per_gram: 0.1,
                carbo_per_gram: 0.005,
            },
            FoodItem {
                food_id: FLOUR,
                name: "Flour".to_string(),
                standard_unit_name: "100g".to_string(),
                standard_unit_grams: 100.0,
                calory_per_gram: 3.68,
                protein_per_gram: 0.083,
                fat_per_gram: 0.015,
                carbo_per_gram: 0.759,
            },
        ]
        .into_iter()
        .collect()
    }

    fn registry(stock: RefrigeratorStock) -> CookingRegistry<MemoryStore> {
        CookingRegistry::new(MemoryStore::new(catalog(), stock))
    }

    fn draft(name: &str, selections: &[(FoodId, f32)]) -> CookingDraft {
        CookingDraft {
            cooking_name: name.to_string(),
            description: String::new(),
            is_favorite: false,
            selections: selections
                .iter()
                .map(|(food_id, quantity)| FoodSelection {
                    food_id: *food_id,
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    /// Store whose writes always fail.
    struct BrokenStore(MemoryStore);

    impl CookingStore for BrokenStore {
        fn food_catalog(&self) -> Result<FoodCatalog, StoreError> {
            self.0.food_catalog()
        }
        fn cookings(&self) -> Result<Vec<Cooking>, StoreError> {
            self.0.cookings()
        }
        fn refrigerator_stock(&self) -> Result<RefrigeratorStock, StoreError> {
            self.0.refrigerator_stock()
        }
        fn cooking_history(&self) -> Result<Vec<CookingHistoryEntry>, StoreError> {
            self.0.cooking_history()
        }
        fn insert_cooking(&mut self, _record: &Cooking) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }
        fn append_cooking_history(&mut self, _entry: &CookingHistoryEntry) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }
    }

    #[test]
    fn test_register_assigns_increasing_ids() {
        let mut registry = registry(RefrigeratorStock::new());
        let first = registry.register_cooking(&draft("Boiled egg", &[(EGG, 1.0)])).unwrap();
        let second = registry.register_cooking(&draft("Flatbread", &[(FLOUR, 2.0)])).unwrap();
        assert_eq!(first.cooking_id, 1);
        assert_eq!(second.cooking_id, 2);
        assert_eq!(second.nutrition.grams_total, 200.0);

        let stored = registry.cooking(2).unwrap();
        assert_eq!(stored.cooking_name, "Flatbread");
        assert_eq!(stored.food_attributes[0].grams_total, 200.0);
    }

    #[test]
    fn test_register_rejects_reordered_duplicate() {
        let mut registry = registry(RefrigeratorStock::new());
        registry
            .register_cooking(&draft("Pancake", &[(EGG, 4.0), (FLOUR, 0.5)]))
            .unwrap();
        let result = registry.register_cooking(&draft("Pancake again", &[(FLOUR, 0.5), (EGG, 4.0)]));
        assert!(matches!(
            result,
            Err(CookingError::DuplicateComposition { existing: 1 })
        ));
        assert_eq!(registry.cookings().unwrap().len(), 1);
    }

    #[test]
    fn test_register_accepts_superset() {
        let mut registry = registry(RefrigeratorStock::new());
        registry.register_cooking(&draft("Egg", &[(EGG, 2.0)])).unwrap();
        let result = registry.register_cooking(&draft("Egg and flour", &[(EGG, 2.0), (FLOUR, 0.5)]));
        assert_eq!(result.unwrap().cooking_id, 2);
    }

    #[test]
    fn test_register_validates_input() {
        let mut registry = registry(RefrigeratorStock::new());
        assert!(matches!(
            registry.register_cooking(&draft("   ", &[(EGG, 1.0)])),
            Err(CookingError::InvalidName)
        ));
        assert!(matches!(
            registry.register_cooking(&draft("Mystery", &[(99, 1.0)])),
            Err(CookingError::UnknownFood(99))
        ));
        assert!(matches!(
            registry.register_cooking(&draft("Negative", &[(EGG, -1.0)])),
            Err(CookingError::InvalidQuantity { food_id: EGG, .. })
        ));
        assert!(registry.cookings().unwrap().is_empty());
    }

    #[test]
    fn test_second_empty_cooking_is_duplicate() {
        let mut registry = registry(RefrigeratorStock::new());
        registry.register_cooking(&draft("Water", &[])).unwrap();
        assert!(matches!(
            registry.register_cooking(&draft("Air", &[])),
            Err(CookingError::DuplicateComposition { existing: 1 })
        ));
    }

    #[test]
    fn test_register_fails_when_ids_run_out() {
        let mut store = MemoryStore::new(catalog(), RefrigeratorStock::new());
        store
            .insert_cooking(&Cooking {
                cooking_id: CookingId::MAX,
                cooking_name: "Last".to_string(),
                description: String::new(),
                is_favorite: false,
                last_update_date: Utc::now(),
                food_attributes: vec![],
            })
            .unwrap();
        let mut registry = CookingRegistry::new(store);
        let result = registry.register_cooking(&draft("Boiled egg", &[(EGG, 1.0)]));
        assert!(matches!(
            result,
            Err(CookingError::RegistrationFailed(StoreError::IdsExhausted))
        ));
        assert_eq!(registry.cookings().unwrap().len(), 1);
    }

    #[test]
    fn test_register_write_failure() {
        let mut registry = CookingRegistry::new(BrokenStore(MemoryStore::new(
            catalog(),
            RefrigeratorStock::new(),
        )));
        let result = registry.register_cooking(&draft("Boiled egg", &[(EGG, 1.0)]));
        assert!(matches!(result, Err(CookingError::RegistrationFailed(_))));
    }

    #[test]
    fn test_record_event_appends_one_entry() {
        let stock: RefrigeratorStock = vec![(EGG, 150.0), (FLOUR, 300.0)].into_iter().collect();
        let mut registry = registry(stock.clone());
        let id = registry
            .register_cooking(&draft("Pancake", &[(EGG, 2.0), (FLOUR, 3.0)]))
            .unwrap()
            .cooking_id;

        let before = Utc::now();
        let entry = registry.record_cooking_event(id).unwrap();
        assert_eq!(entry.cooking_id, id);
        assert!(entry.issued_date >= before);
        assert_eq!(registry.store().history(), &[entry]);
        assert_eq!(registry.store().stock(), &stock);
    }

    #[test]
    fn test_record_event_insufficient_stock() {
        let stock: RefrigeratorStock = vec![(EGG, 100.0), (FLOUR, 300.0)].into_iter().collect();
        let mut registry = registry(stock);
        let id = registry
            .register_cooking(&draft("Pancake", &[(EGG, 2.0), (FLOUR, 3.0)]))
            .unwrap()
            .cooking_id;

        match registry.record_cooking_event(id) {
            Err(CookingError::InsufficientStock { cooking_id, shortages }) => {
                assert_eq!(cooking_id, id);
                assert_eq!(shortages.len(), 1);
                assert_eq!(shortages[0].food_id, EGG);
            }
            other => panic!("Expected InsufficientStock, got {:?}", other),
        }
        assert!(registry.store().history().is_empty());
    }

    #[test]
    fn test_record_event_with_exact_fractional_stock() {
        let stock: RefrigeratorStock = vec![(FLOUR, 30.0), (EGG, 72.0)].into_iter().collect();
        let mut registry = registry(stock);
        let id = registry
            .register_cooking(&draft("Thin crepe", &[(FLOUR, 0.3), (EGG, 1.2)]))
            .unwrap()
            .cooking_id;

        let stored = registry.cooking(id).unwrap();
        assert_eq!(stored.food_attributes[0].grams_total, 30.0);
        assert_eq!(stored.food_attributes[1].grams_total, 72.0);
        assert!(registry.record_cooking_event(id).is_ok());
    }

    #[test]
    fn test_record_event_unknown_cooking() {
        let mut registry = registry(RefrigeratorStock::new());
        assert!(matches!(
            registry.record_cooking_event(42),
            Err(CookingError::NotFound(42))
        ));
    }

    #[test]
    fn test_record_event_write_failure_is_persistence_error() {
        let mut store = MemoryStore::new(catalog(), RefrigeratorStock::new());
        store.insert_cooking(&Cooking {
            cooking_id: 1,
            cooking_name: "Nothing".to_string(),
            description: String::new(),
            is_favorite: false,
            last_update_date: Utc::now(),
            food_attributes: vec![],
        })
        .unwrap();
        let mut registry = CookingRegistry::new(BrokenStore(store));
        assert!(matches!(
            registry.record_cooking_event(1),
            Err(CookingError::Persistence(_))
        ));
    }

    #[test]
    fn test_read_views() {
        let stock: RefrigeratorStock = vec![(EGG, 120.0), (7, 10.0)].into_iter().collect();
        let mut registry = registry(stock);
        registry.register_cooking(&draft("Eggs", &[(EGG, 2.0)])).unwrap();
        registry.register_cooking(&draft("Bread", &[(FLOUR, 2.0)])).unwrap();
        registry.record_cooking_event(1).unwrap();

        let availability = registry.cookable_cookings().unwrap();
        assert!(availability[0].is_cookable());
        assert!(!availability[1].is_cookable());

        let fridge = registry.refrigerator_contents().unwrap();
        assert_eq!(fridge[0].food_name.as_deref(), Some("Egg"));
        assert_eq!(fridge[1].food_name, None);

        let history = registry.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].cooking.cooking_name, "Eggs");

        let nutrition = registry.cooking_nutrition(2).unwrap();
        assert_eq!(nutrition.grams_total, 200.0);

        let preview = registry
            .preview_nutrition(&[FoodSelection { food_id: EGG, quantity: 0.0 }])
            .unwrap();
        assert_eq!(preview.lines.len(), 1);
        assert_eq!(preview.calory_total, 0.0);
    }
}
