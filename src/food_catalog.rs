use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type FoodId = u32;

/// Reference data for one food. Coefficients are per gram.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodItem {
    pub food_id: FoodId,
    pub name: String,
    pub standard_unit_name: String,
    pub standard_unit_grams: f32,
    pub calory_per_gram: f32,
    pub protein_per_gram: f32,
    pub fat_per_gram: f32,
    pub carbo_per_gram: f32,
}

const MILLIGRAMS_PER_GRAM: f64 = 1000.0;

impl FoodItem {
    /// Weight of `standard_unit_quantity` standard units, rounded to the milligram.
    pub fn grams_for(&self, standard_unit_quantity: f32) -> f32 {
        let grams = f64::from(standard_unit_quantity) * f64::from(self.standard_unit_grams);
        ((grams * MILLIGRAMS_PER_GRAM).round() / MILLIGRAMS_PER_GRAM) as f32
    }
}

/// One row of the food data table. Nutrition values are given per standard unit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodDataRow {
    #[serde(rename = "FoodDataID")]
    pub food_id: FoodId,
    #[serde(rename = "FoodName")]
    pub name: String,
    #[serde(rename = "StandardUnit_Name")]
    pub standard_unit_name: String,
    #[serde(rename = "StandardUnit_Grams")]
    pub standard_unit_grams: f32,
    #[serde(rename = "Calory_Total")]
    pub calory_total: f32,
    #[serde(rename = "Grams_Protein")]
    pub grams_protein: f32,
    #[serde(rename = "Grams_Fat")]
    pub grams_fat: f32,
    #[serde(rename = "Grams_Carbo")]
    pub grams_carbo: f32,
}

impl TryFrom<FoodDataRow> for FoodItem {
    type Error = String;

    fn try_from(row: FoodDataRow) -> Result<Self, Self::Error> {
        if !(row.standard_unit_grams.is_finite() && row.standard_unit_grams > 0.0) {
            return Err(format!(
                "standard unit of '{}' must weigh more than 0 g, got {}",
                row.name, row.standard_unit_grams
            ));
        }
        let per_unit = [
            ("Calory_Total", row.calory_total),
            ("Grams_Protein", row.grams_protein),
            ("Grams_Fat", row.grams_fat),
            ("Grams_Carbo", row.grams_carbo),
        ];
        if let Some((column, value)) = per_unit
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(format!("{} of '{}' is invalid: {}", column, row.name, value));
        }

        let grams = row.standard_unit_grams;
        Ok(FoodItem {
            food_id: row.food_id,
            name: row.name,
            standard_unit_name: row.standard_unit_name,
            standard_unit_grams: grams,
            calory_per_gram: row.calory_total / grams,
            protein_per_gram: row.grams_protein / grams,
            fat_per_gram: row.grams_fat / grams,
            carbo_per_gram: row.grams_carbo / grams,
        })
    }
}

/// All known foods, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodCatalog {
    items: BTreeMap<FoodId, FoodItem>,
}

impl FoodCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item, returning the one it replaced if the id was already taken.
    pub fn insert(&mut self, item: FoodItem) -> Option<FoodItem> {
        self.items.insert(item.food_id, item)
    }

    pub fn get(&self, food_id: FoodId) -> Option<&FoodItem> {
        self.items.get(&food_id)
    }

    /// Case-insensitive lookup on the food name.
    pub fn find_by_name(&self, name: &str) -> Option<&FoodItem> {
        let wanted = name.trim();
        self.items
            .values()
            .find(|item| item.name.eq_ignore_ascii_case(wanted))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<FoodItem> for FoodCatalog {
    fn from_iter<I: IntoIterator<Item = FoodItem>>(iter: I) -> Self {
        let mut catalog = FoodCatalog::new();
        for item in iter {
            catalog.insert(item);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn egg_row() -> FoodDataRow {
        FoodDataRow {
            food_id: 1,
            name: "Egg".to_string(),
            standard_unit_name: "piece".to_string(),
            standard_unit_grams: 60.0,
            calory_total: 90.0,
            grams_protein: 7.5,
            grams_fat: 6.0,
            grams_carbo: 0.3,
        }
    }

    #[test]
    fn test_row_converts_to_per_gram_coefficients() {
        let item = FoodItem::try_from(egg_row()).unwrap();
        assert_eq!(item.standard_unit_grams, 60.0);
        assert!((item.calory_per_gram - 1.5).abs() < 1e-6);
        assert!((item.protein_per_gram - 0.125).abs() < 1e-6);
        assert!((item.fat_per_gram - 0.1).abs() < 1e-6);
        assert!((item.carbo_per_gram - 0.005).abs() < 1e-6);
    }

    #[test]
    fn test_row_with_zero_unit_grams_is_rejected() {
        let mut row = egg_row();
        row.standard_unit_grams = 0.0;
        let err = FoodItem::try_from(row).unwrap_err();
        assert!(err.contains("more than 0 g"));
    }

    #[test]
    fn test_row_with_negative_coefficient_is_rejected() {
        let mut row = egg_row();
        row.grams_fat = -1.0;
        let err = FoodItem::try_from(row).unwrap_err();
        assert!(err.contains("Grams_Fat"));
    }

    #[test]
    fn test_grams_for_fractional_quantities() {
        let milk = FoodItem::try_from(FoodDataRow {
            food_id: 3,
            name: "Milk".to_string(),
            standard_unit_name: "cup".to_string(),
            standard_unit_grams: 200.0,
            calory_total: 134.0,
            grams_protein: 6.6,
            grams_fat: 7.6,
            grams_carbo: 9.6,
        })
        .unwrap();
        assert_eq!(milk.grams_for(0.3), 60.0);
        assert_eq!(milk.grams_for(0.0), 0.0);

        let mut flour = milk.clone();
        flour.standard_unit_grams = 100.0;
        for (quantity, grams) in [(0.3, 30.0), (0.6, 60.0), (1.2, 120.0), (2.5, 250.0)] {
            assert_eq!(flour.grams_for(quantity), grams);
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog: FoodCatalog = vec![FoodItem::try_from(egg_row()).unwrap()]
            .into_iter()
            .collect();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(1).is_some());
        assert!(catalog.get(2).is_none());
        assert_eq!(catalog.find_by_name("  egg ").map(|i| i.food_id), Some(1));
        assert!(catalog.find_by_name("Flour").is_none());
    }
}
