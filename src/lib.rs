pub mod availability;
pub mod cli;
pub mod composition_matcher;
pub mod config;
pub mod cooking;
pub mod draft;
pub mod error;
pub mod food_catalog;
pub mod nutrition;
pub mod registry;
pub mod report;
pub mod store;

pub use availability::{can_cook, shortages, Shortage};
pub use composition_matcher::{is_duplicate_composition, is_new_composition};
pub use error::{CookingError, StoreError};
pub use nutrition::{compute_nutrition, macro_grams_to_kcal, MacroKind, NutritionSummary};
pub use registry::CookingRegistry;
