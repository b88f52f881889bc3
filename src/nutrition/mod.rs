pub mod calculator;
pub mod pfc;

pub use calculator::{compute_nutrition, nutrition_line, NutritionLine, NutritionSummary};
pub use pfc::{macro_grams_to_kcal, MacroAmount, MacroKind, PfcRatio};
