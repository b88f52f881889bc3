use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CookingError;
use crate::food_catalog::{FoodCatalog, FoodId, FoodItem};
use crate::nutrition::{compute_nutrition, NutritionSummary};

pub type CookingId = u32;

/// One ingredient of a cooking, as persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodAttribute {
    pub food_id: FoodId,
    pub standard_unit_quantity: f32,
    pub grams_total: f32,
}

impl FoodAttribute {
    pub fn new(food: &FoodItem, standard_unit_quantity: f32) -> Self {
        FoodAttribute {
            food_id: food.food_id,
            standard_unit_quantity,
            grams_total: food.grams_for(standard_unit_quantity),
        }
    }
}

/// A registered recipe.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Cooking {
    pub cooking_id: CookingId,
    pub cooking_name: String,
    pub description: String,
    pub is_favorite: bool,
    pub last_update_date: DateTime<Utc>,
    pub food_attributes: Vec<FoodAttribute>,
}

impl Cooking {
    /// Recomputes the nutrition of this cooking from its stored quantities.
    pub fn nutrition(&self, catalog: &FoodCatalog) -> Result<NutritionSummary, CookingError> {
        let items = self
            .food_attributes
            .iter()
            .map(|attr| {
                catalog
                    .get(attr.food_id)
                    .map(|food| (food, attr.standard_unit_quantity))
                    .ok_or(CookingError::UnknownFood(attr.food_id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        compute_nutrition(items)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CookingHistoryEntry {
    pub cooking_id: CookingId,
    pub issued_date: DateTime<Utc>,
}

/// Snapshot of grams available per food. Foods without a row hold 0 g.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefrigeratorStock {
    grams: HashMap<FoodId, f32>,
}

impl RefrigeratorStock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds grams to a food, summing with what is already there.
    pub fn add(&mut self, food_id: FoodId, grams: f32) {
        *self.grams.entry(food_id).or_insert(0.0) += grams;
    }

    pub fn set(&mut self, food_id: FoodId, grams: f32) {
        self.grams.insert(food_id, grams);
    }

    pub fn grams_of(&self, food_id: FoodId) -> f32 {
        self.grams.get(&food_id).copied().unwrap_or(0.0)
    }

    /// Entries sorted by food id.
    pub fn entries(&self) -> Vec<(FoodId, f32)> {
        let mut entries: Vec<_> = self.grams.iter().map(|(id, g)| (*id, *g)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }
}

impl FromIterator<(FoodId, f32)> for RefrigeratorStock {
    fn from_iter<I: IntoIterator<Item = (FoodId, f32)>>(iter: I) -> Self {
        let mut stock = RefrigeratorStock::new();
        for (food_id, grams) in iter {
            stock.add(food_id, grams);
        }
        stock
    }
}

/// A food picked for a new cooking, quantity in standard units.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodSelection {
    pub food_id: FoodId,
    pub quantity: f32,
}

/// The registration form: what the user typed before pressing "register".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CookingDraft {
    pub cooking_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub selections: Vec<FoodSelection>,
}
