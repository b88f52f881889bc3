use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::availability::Shortage;
use crate::cooking::CookingId;
use crate::food_catalog::FoodId;

/// Failure reported by a `CookingStore` implementation.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingTable(PathBuf),
    /// Every identifier up to the type's maximum is taken.
    IdsExhausted,
    Malformed {
        table: &'static str,
        row: usize,
        message: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "I/O error: {}", err),
            StoreError::Csv(err) => write!(f, "CSV error: {}", err),
            StoreError::Json(err) => write!(f, "JSON error: {}", err),
            StoreError::MissingTable(path) => write!(f, "Table not found at: {:?}", path),
            StoreError::IdsExhausted => write!(f, "No identifier left to assign"),
            StoreError::Malformed { table, row, message } => {
                write!(f, "Malformed row {} in {}: {}", row, table, message)
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Csv(err) => Some(err),
            StoreError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Csv(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Json(err)
    }
}

/// Typed outcome of every engine operation. None of these are retried.
#[derive(Debug)]
pub enum CookingError {
    /// Negative or non-numeric quantity.
    InvalidQuantity { food_id: FoodId, input: String },
    UnknownFood(FoodId),
    InvalidName,
    /// Another cooking already has the same composition.
    DuplicateComposition { existing: CookingId },
    NotFound(CookingId),
    InsufficientStock {
        cooking_id: CookingId,
        shortages: Vec<Shortage>,
    },
    /// The insert of a new cooking failed.
    RegistrationFailed(StoreError),
    Persistence(StoreError),
}

impl fmt::Display for CookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookingError::InvalidQuantity { food_id, input } => {
                write!(f, "Invalid quantity '{}' for food {}", input, food_id)
            }
            CookingError::UnknownFood(food_id) => write!(f, "Unknown food id: {}", food_id),
            CookingError::InvalidName => write!(f, "Cooking name must not be empty"),
            CookingError::DuplicateComposition { existing } => write!(
                f,
                "A cooking with the same ingredients is already registered (CookingID {})",
                existing
            ),
            CookingError::NotFound(cooking_id) => {
                write!(f, "CookingID {} is not registered", cooking_id)
            }
            CookingError::InsufficientStock {
                cooking_id,
                shortages,
            } => write!(
                f,
                "Not enough food in the refrigerator for CookingID {} ({} ingredient(s) short)",
                cooking_id,
                shortages.len()
            ),
            CookingError::RegistrationFailed(err) => {
                write!(f, "Failed to register cooking: {}", err)
            }
            CookingError::Persistence(err) => write!(f, "Persistence error: {}", err),
        }
    }
}

impl Error for CookingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CookingError::RegistrationFailed(err) => Some(err),
            CookingError::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CookingError {
    fn from(err: StoreError) -> Self {
        CookingError::Persistence(err)
    }
}
