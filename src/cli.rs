use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::cooking::CookingId;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the CSV tables
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Session the drafts are saved under
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write sample food and refrigerator tables where none exist
    Init,
    /// List registered cookings and whether each can be cooked now
    List,
    /// Show the refrigerator contents
    Fridge,
    /// Show what has been cooked
    History,
    /// Show ingredients and nutrition of a registered cooking
    Show { cooking_id: CookingId },
    /// Preview the nutrition of a selection of foods
    Nutrition {
        /// FOOD=QUANTITY, food by name or id, quantity in standard units
        #[arg(short, long = "food", value_parser = parse_selection)]
        foods: Vec<SelectionArg>,
    },
    /// Register a new cooking
    Register(RegisterArgs),
    /// Show or discard the saved registration draft
    Draft {
        #[arg(long)]
        clear: bool,
    },
    /// Cook a registered cooking and record it in the history
    Cook { cooking_id: CookingId },
}

#[derive(Args, Debug, Default)]
pub struct RegisterArgs {
    /// Name of the new cooking
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Mark as favorite
    #[arg(long)]
    pub favorite: bool,

    /// FOOD=QUANTITY, food by name or id, quantity in standard units
    #[arg(short, long = "food", value_parser = parse_selection)]
    pub foods: Vec<SelectionArg>,

    /// Start from the saved draft
    #[arg(long)]
    pub from_draft: bool,

    /// Start from a JSON file holding a cooking draft
    #[arg(long, conflicts_with = "from_draft")]
    pub file: Option<PathBuf>,

    /// Save the form as a draft instead of registering it
    #[arg(long)]
    pub save_draft: bool,
}

/// A food picked on the command line, not yet resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionArg {
    pub food: String,
    pub quantity: f32,
}

/// Parses `FOOD=QUANTITY`. Quantities are rounded to one decimal place, the
/// precision the engine expects from its input forms.
pub fn parse_selection(raw: &str) -> Result<SelectionArg, String> {
    let (food, quantity) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected FOOD=QUANTITY, got '{}'", raw))?;
    let food = food.trim();
    if food.is_empty() {
        return Err(format!("missing food in '{}'", raw));
    }
    let quantity: f32 = quantity
        .trim()
        .parse()
        .map_err(|_| format!("quantity '{}' is not a number", quantity.trim()))?;
    Ok(SelectionArg {
        food: food.to_string(),
        quantity: round_to_tenth(quantity),
    })
}

pub fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
