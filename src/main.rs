use anyhow::{anyhow, Context, Result};
use cooking_engine::cli::{parse_args, Command, RegisterArgs, SelectionArg};
use cooking_engine::config::AppConfig;
use cooking_engine::cooking::{CookingDraft, FoodSelection};
use cooking_engine::draft::{DraftStore, REGISTER_DRAFT_KEY};
use cooking_engine::error::CookingError;
use cooking_engine::food_catalog::FoodCatalog;
use cooking_engine::registry::CookingRegistry;
use cooking_engine::report;
use cooking_engine::store::CsvStore;
use log::info;
use serde::Serialize;
use tokio::fs;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolves command-line picks against the catalog, by id first, then by name.
fn resolve_selections(catalog: &FoodCatalog, picks: &[SelectionArg]) -> Result<Vec<FoodSelection>> {
    picks
        .iter()
        .map(|pick| -> Result<FoodSelection> {
            let item = pick
                .food
                .parse::<u32>()
                .ok()
                .and_then(|id| catalog.get(id))
                .or_else(|| catalog.find_by_name(&pick.food))
                .ok_or_else(|| anyhow!("Unknown food '{}'", pick.food))?;
            Ok(FoodSelection {
                food_id: item.food_id,
                quantity: pick.quantity,
            })
        })
        .collect()
}

/// Turns an engine error into a user-facing one.
fn user_error(err: CookingError, catalog: Option<&FoodCatalog>) -> anyhow::Error {
    anyhow!(report::describe_error(&err, catalog))
}

async fn build_draft(
    args: &RegisterArgs,
    drafts: &DraftStore,
    catalog: &FoodCatalog,
) -> Result<CookingDraft> {
    let mut draft = if args.from_draft {
        drafts
            .restore::<CookingDraft>(REGISTER_DRAFT_KEY)?
            .ok_or_else(|| anyhow!("No draft saved for session '{}'", drafts.session()))?
    } else if let Some(path) = &args.file {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read draft file '{}'", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse draft file '{}'", path.display()))?
    } else {
        CookingDraft::default()
    };

    if let Some(name) = &args.name {
        draft.cooking_name = name.clone();
    }
    if let Some(description) = &args.description {
        draft.description = description.clone();
    }
    if args.favorite {
        draft.is_favorite = true;
    }
    if !args.foods.is_empty() {
        draft.selections = resolve_selections(catalog, &args.foods)?;
    }
    Ok(draft)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = parse_args();
    let config = AppConfig::from_env().with_overrides(cli_args.data_dir.clone(), cli_args.session.clone());
    env_logger::init();
    info!("Using data directory {:?}", config.data_dir);

    let store = CsvStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open data directory {:?}", config.data_dir))?;
    let mut registry = CookingRegistry::new(store);

    match cli_args.command {
        Command::Init => {
            let written = registry.store().seed_sample_tables()?;
            if written.is_empty() {
                println!("Tables already present in {:?}", config.data_dir);
            } else {
                println!("Wrote {} in {:?}", written.join(", "), config.data_dir);
            }
        }
        Command::List => {
            let cookings = registry.cookable_cookings().map_err(|e| user_error(e, None))?;
            if cli_args.json {
                print_json(&cookings)?;
            } else {
                print!("{}", report::format_cooking_list(&cookings));
            }
        }
        Command::Fridge => {
            let lines = registry.refrigerator_contents().map_err(|e| user_error(e, None))?;
            if cli_args.json {
                print_json(&lines)?;
            } else {
                print!("{}", report::format_refrigerator(&lines));
            }
        }
        Command::History => {
            let lines = registry.history().map_err(|e| user_error(e, None))?;
            if cli_args.json {
                print_json(&lines)?;
            } else {
                print!("{}", report::format_history(&lines));
            }
        }
        Command::Show { cooking_id } => {
            let cooking = registry.cooking(cooking_id).map_err(|e| user_error(e, None))?;
            let summary = registry
                .cooking_nutrition(cooking_id)
                .map_err(|e| user_error(e, None))?;
            if cli_args.json {
                print_json(&summary)?;
            } else {
                println!("No.{} : {}", cooking.cooking_id, cooking.cooking_name);
                print!("{}", report::format_nutrition_summary(&summary));
                println!();
                print!("{}", report::format_nutrition_lines(&summary));
            }
        }
        Command::Nutrition { foods } => {
            let catalog = registry.food_catalog().map_err(|e| user_error(e, None))?;
            let selections = resolve_selections(&catalog, &foods)?;
            let summary = registry
                .preview_nutrition(&selections)
                .map_err(|e| user_error(e, Some(&catalog)))?;
            if cli_args.json {
                print_json(&summary)?;
            } else {
                print!("{}", report::format_nutrition_summary(&summary));
                println!();
                print!("{}", report::format_nutrition_lines(&summary));
            }
        }
        Command::Register(args) => {
            let catalog = registry.food_catalog().map_err(|e| user_error(e, None))?;
            let mut drafts = DraftStore::open(&config.draft_path(), &config.session)?;
            let draft = build_draft(&args, &drafts, &catalog).await?;

            if args.save_draft {
                drafts.save(REGISTER_DRAFT_KEY, &draft)?;
                println!("Draft saved for session '{}'", drafts.session());
                return Ok(());
            }

            let registration = registry
                .register_cooking(&draft)
                .map_err(|e| user_error(e, Some(&catalog)))?;
            if args.from_draft {
                drafts.clear(REGISTER_DRAFT_KEY)?;
            }
            if cli_args.json {
                print_json(&registration)?;
            } else {
                println!("Registered cooking No.{}", registration.cooking_id);
                print!("{}", report::format_nutrition_summary(&registration.nutrition));
            }
        }
        Command::Draft { clear } => {
            let mut drafts = DraftStore::open(&config.draft_path(), &config.session)?;
            if clear {
                if drafts.clear(REGISTER_DRAFT_KEY)? {
                    println!("Draft discarded");
                } else {
                    println!("No draft saved for session '{}'", drafts.session());
                }
                return Ok(());
            }
            match drafts.restore::<CookingDraft>(REGISTER_DRAFT_KEY)? {
                Some(draft) => print_json(&draft)?,
                None => println!("No draft saved for session '{}'", drafts.session()),
            }
        }
        Command::Cook { cooking_id } => {
            let catalog = registry.food_catalog().ok();
            let entry = registry
                .record_cooking_event(cooking_id)
                .map_err(|e| user_error(e, catalog.as_ref()))?;
            if cli_args.json {
                print_json(&entry)?;
            } else {
                println!("Cooking history added for No.{}", entry.cooking_id);
            }
        }
    }

    Ok(())
}
