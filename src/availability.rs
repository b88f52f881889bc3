use serde::{Deserialize, Serialize};

use crate::cooking::{Cooking, FoodAttribute, RefrigeratorStock};
use crate::food_catalog::FoodId;

/// An ingredient the refrigerator cannot cover.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Shortage {
    pub food_id: FoodId,
    pub required_grams: f32,
    pub available_grams: f32,
}

impl Shortage {
    pub fn missing_grams(&self) -> f32 {
        self.required_grams - self.available_grams
    }
}

/// Every attribute whose required grams exceed the stock. Each attribute is checked
/// on its own; requirements for a repeated food are not summed.
pub fn shortages_for(attributes: &[FoodAttribute], stock: &RefrigeratorStock) -> Vec<Shortage> {
    attributes
        .iter()
        .filter_map(|attr| {
            let available = stock.grams_of(attr.food_id);
            if available >= attr.grams_total {
                None
            } else {
                Some(Shortage {
                    food_id: attr.food_id,
                    required_grams: attr.grams_total,
                    available_grams: available,
                })
            }
        })
        .collect()
}

pub fn shortages(cooking: &Cooking, stock: &RefrigeratorStock) -> Vec<Shortage> {
    shortages_for(&cooking.food_attributes, stock)
}

/// A cooking without ingredients is always cookable.
pub fn can_cook(cooking: &Cooking, stock: &RefrigeratorStock) -> bool {
    shortages(cooking, stock).is_empty()
}
