//! Duplicate detection for cooking registration.
//!
//! Two cookings share a composition when they hold the same multiset of
//! (food id, grams) pairs. Grams are compared exactly: quantities arrive already
//! rounded to one decimal place, and rounding again here would merge cookings
//! that differ.

use crate::cooking::{Cooking, FoodAttribute};
use crate::food_catalog::FoodId;

/// Order-independent key of a composition.
///
/// Grams are stored as their bit pattern so the key can be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositionSignature(Vec<(FoodId, u32)>);

impl CompositionSignature {
    pub fn of(attributes: &[FoodAttribute]) -> Self {
        let mut entries: Vec<(FoodId, u32)> = attributes
            .iter()
            // + 0.0 folds -0.0 into 0.0
            .map(|attr| (attr.food_id, (attr.grams_total + 0.0).to_bits()))
            .collect();
        entries.sort_unstable();
        CompositionSignature(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// First existing cooking whose composition equals the candidate's.
pub fn find_duplicate<'a>(
    candidate: &[FoodAttribute],
    existing: &'a [Cooking],
) -> Option<&'a Cooking> {
    let signature = CompositionSignature::of(candidate);
    existing.iter().find(|cooking| {
        cooking.food_attributes.len() == signature.len()
            && CompositionSignature::of(&cooking.food_attributes) == signature
    })
}

pub fn is_duplicate_composition(candidate: &[FoodAttribute], existing: &[Cooking]) -> bool {
    find_duplicate(candidate, existing).is_some()
}

/// `true` when registration of `candidate` may proceed.
pub fn is_new_composition(candidate: &[FoodAttribute], existing: &[Cooking]) -> bool {
    !is_duplicate_composition(candidate, existing)
}
