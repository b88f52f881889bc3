use serde::{Deserialize, Serialize};

use super::pfc::{MacroAmount, MacroKind, PfcRatio};
use crate::error::CookingError;
use crate::food_catalog::{FoodId, FoodItem};

/// Nutrition of one selected food.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NutritionLine {
    pub food_id: FoodId,
    pub food_name: String,
    pub standard_unit_name: String,
    pub standard_unit_quantity: f32,
    pub grams_total: f32,
    pub calory_total: f32,
    pub protein: MacroAmount,
    pub fat: MacroAmount,
    pub carbohydrate: MacroAmount,
}

/// Totals over a selection, with the per-food lines they were summed from.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NutritionSummary {
    pub lines: Vec<NutritionLine>,
    pub grams_total: f32,
    pub calory_total: f32,
    pub protein: MacroAmount,
    pub fat: MacroAmount,
    pub carbohydrate: MacroAmount,
}

impl NutritionSummary {
    pub fn macro_amount(&self, kind: MacroKind) -> MacroAmount {
        match kind {
            MacroKind::Protein => self.protein,
            MacroKind::Fat => self.fat,
            MacroKind::Carbohydrate => self.carbohydrate,
        }
    }

    pub fn pfc_calorie_ratio(&self) -> PfcRatio {
        PfcRatio::from_kcal(self.protein.kcal, self.fat.kcal, self.carbohydrate.kcal)
    }

    fn push(&mut self, line: NutritionLine) {
        self.grams_total += line.grams_total;
        self.calory_total += line.calory_total;
        self.protein += line.protein;
        self.fat += line.fat;
        self.carbohydrate += line.carbohydrate;
        self.lines.push(line);
    }
}

/// Nutrition of `quantity` standard units of `food`.
pub fn nutrition_line(food: &FoodItem, quantity: f32) -> Result<NutritionLine, CookingError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(CookingError::InvalidQuantity {
            food_id: food.food_id,
            input: quantity.to_string(),
        });
    }

    let grams = food.grams_for(quantity);
    Ok(NutritionLine {
        food_id: food.food_id,
        food_name: food.name.clone(),
        standard_unit_name: food.standard_unit_name.clone(),
        standard_unit_quantity: quantity,
        grams_total: grams,
        calory_total: grams * food.calory_per_gram,
        protein: MacroAmount::from_grams(grams * food.protein_per_gram, MacroKind::Protein),
        fat: MacroAmount::from_grams(grams * food.fat_per_gram, MacroKind::Fat),
        carbohydrate: MacroAmount::from_grams(
            grams * food.carbo_per_gram,
            MacroKind::Carbohydrate,
        ),
    })
}

/// Sums the nutrition of every (food, quantity) pair. Input order is kept in `lines`
/// and zero quantities stay in the list.
pub fn compute_nutrition<'a, I>(items: I) -> Result<NutritionSummary, CookingError>
where
    I: IntoIterator<Item = (&'a FoodItem, f32)>,
{
    let mut summary = NutritionSummary::default();
    for (food, quantity) in items {
        summary.push(nutrition_line(food, quantity)?);
    }
    Ok(summary)
}
