//! Plain-text views for the command line.

use chrono::{DateTime, Local, Utc};

use crate::error::CookingError;
use crate::food_catalog::{FoodCatalog, FoodId};
use crate::nutrition::{MacroKind, NutritionSummary};
use crate::registry::{CookingAvailability, HistoryLine, RefrigeratorLine};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn local_minutes(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

/// Calorie total followed by kcal and grams per macronutrient.
pub fn format_nutrition_summary(summary: &NutritionSummary) -> String {
    let mut out = format!(
        "Total calories: {:.1} kcal ({:.1} g)\n",
        summary.calory_total, summary.grams_total
    );
    let ratio = summary.pfc_calorie_ratio();
    for (kind, share) in MacroKind::ALL
        .into_iter()
        .zip([ratio.protein, ratio.fat, ratio.carbohydrate])
    {
        let amount = summary.macro_amount(kind);
        out.push_str(&format!(
            "  {:<13} {:>8.1} kcal ({:.1} g, {:.0}%)\n",
            kind.label(),
            amount.kcal,
            amount.grams,
            share * 100.0
        ));
    }
    out
}

/// Per-ingredient amounts and calories.
pub fn format_nutrition_lines(summary: &NutritionSummary) -> String {
    let mut out = format!(
        "{:<20} {:>9} {:>16} {:>9} {:>8} {:>8} {:>8}\n",
        "Food", "Grams", "Quantity", "kcal", "P kcal", "F kcal", "C kcal"
    );
    for line in &summary.lines {
        let quantity = format!("{} * {:.1}", line.standard_unit_name, line.standard_unit_quantity);
        out.push_str(&format!(
            "{:<20} {:>9.1} {:>16} {:>9.1} {:>8.1} {:>8.1} {:>8.1}\n",
            line.food_name,
            line.grams_total,
            quantity,
            line.calory_total,
            line.protein.kcal,
            line.fat.kcal,
            line.carbohydrate.kcal
        ));
    }
    out
}

pub fn format_cooking_list(cookings: &[CookingAvailability]) -> String {
    if cookings.is_empty() {
        return "No cookings registered.\n".to_string();
    }
    let mut out = format!(
        "{:>9}  {:<24} {:<8} {:<16} {:<9} {}\n",
        "CookingID", "CookingName", "Favorite", "LastUpdateDate", "Cookable", "Description"
    );
    for entry in cookings {
        let cooking = &entry.cooking;
        out.push_str(&format!(
            "{:>9}  {:<24} {:<8} {:<16} {:<9} {}\n",
            cooking.cooking_id,
            cooking.cooking_name,
            if cooking.is_favorite { "*" } else { "" },
            local_minutes(&cooking.last_update_date),
            if entry.is_cookable() { "yes" } else { "no" },
            cooking.description.replace('\n', " ")
        ));
    }
    out
}

pub fn format_refrigerator(lines: &[RefrigeratorLine]) -> String {
    if lines.is_empty() {
        return "The refrigerator is empty.\n".to_string();
    }
    let mut out = format!("{:<24} {:>9}\n", "FoodName", "Grams");
    for line in lines {
        let name = line
            .food_name
            .clone()
            .unwrap_or_else(|| format!("(unknown food {})", line.food_id));
        out.push_str(&format!("{:<24} {:>9.1}\n", name, line.grams));
    }
    out
}

pub fn format_history(lines: &[HistoryLine]) -> String {
    if lines.is_empty() {
        return "Nothing cooked yet.\n".to_string();
    }
    let mut out = format!("{:<16}  {:<24} {}\n", "IssuedDate", "CookingName", "Description");
    for line in lines {
        out.push_str(&format!(
            "{:<16}  {:<24} {}\n",
            local_minutes(&line.issued_date),
            line.cooking.cooking_name,
            line.cooking.description.replace('\n', " ")
        ));
    }
    out
}

/// Turns an engine error into the message shown to the user, naming foods where possible.
pub fn describe_error(err: &CookingError, catalog: Option<&FoodCatalog>) -> String {
    let food_name = |food_id: FoodId| {
        catalog
            .and_then(|c| c.get(food_id))
            .map(|item| item.name.clone())
            .unwrap_or_else(|| format!("food {}", food_id))
    };
    match err {
        CookingError::InsufficientStock { shortages, .. } => {
            let mut out = String::from("Not enough food in the refrigerator:");
            for shortage in shortages {
                out.push_str(&format!(
                    "\n  {}: need {:.1} g, have {:.1} g ({:.1} g short)",
                    food_name(shortage.food_id),
                    shortage.required_grams,
                    shortage.available_grams,
                    shortage.missing_grams()
                ));
            }
            out
        }
        CookingError::InvalidQuantity { food_id, input } => {
            format!("Invalid quantity '{}' for {}", input, food_name(*food_id))
        }
        other => other.to_string(),
    }
}
