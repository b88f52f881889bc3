use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::PathBuf;

use super::CookingStore;
use crate::cooking::{Cooking, CookingHistoryEntry, CookingId, FoodAttribute, RefrigeratorStock};
use crate::error::StoreError;
use crate::food_catalog::{FoodCatalog, FoodDataRow, FoodId, FoodItem};

pub const FOOD_DATA_TABLE: &str = "fooddata.csv";
pub const COOKING_TABLE: &str = "cooking.csv";
pub const REFRIGERATOR_TABLE: &str = "refrigerator.csv";
pub const COOKING_HISTORY_TABLE: &str = "cookinghistory.csv";

const SAMPLE_FOOD_DATA: &str = "\
FoodDataID,FoodName,StandardUnit_Name,StandardUnit_Grams,Calory_Total,Grams_Protein,Grams_Fat,Grams_Carbo
1,Egg,piece,60,91,7.4,6.2,0.2
2,Flour,100g,100,368,8.3,1.5,75.9
3,Milk,cup,200,134,6.6,7.6,9.6
4,Rice,bowl,150,234,3.8,0.5,55.7
5,Chicken breast,100g,100,108,22.3,1.5,0
6,Onion,piece,200,66,2.0,0.2,16.8
";

const SAMPLE_REFRIGERATOR: &str = "\
FoodDataID,Grams
1,360
2,1000
3,800
4,600
5,300
6,400
";

#[derive(Debug, Serialize, Deserialize)]
struct CookingRow {
    #[serde(rename = "CookingID")]
    cooking_id: CookingId,
    #[serde(rename = "CookingName")]
    cooking_name: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "IsFavorite")]
    is_favorite: bool,
    #[serde(rename = "LastUpdateDate")]
    last_update_date: DateTime<Utc>,
    /// JSON array of food attributes, so one cooking is one appended row.
    #[serde(rename = "FoodAttributes")]
    food_attributes: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct RefrigeratorRow {
    #[serde(rename = "FoodDataID")]
    food_id: FoodId,
    #[serde(rename = "Grams")]
    grams: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct CookingHistoryRow {
    #[serde(rename = "CookingID")]
    cooking_id: CookingId,
    #[serde(rename = "IssuedDate")]
    issued_date: DateTime<Utc>,
}

/// One CSV file per table inside a data directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Opens (and creates if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(CsvStore { dir })
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(table)
    }

    /// Writes sample food and refrigerator tables where none exist yet.
    /// Returns the names of the tables written.
    pub fn seed_sample_tables(&self) -> Result<Vec<&'static str>, StoreError> {
        let mut written = Vec::new();
        for (table, content) in [
            (FOOD_DATA_TABLE, SAMPLE_FOOD_DATA),
            (REFRIGERATOR_TABLE, SAMPLE_REFRIGERATOR),
        ] {
            let path = self.table_path(table);
            if path.exists() {
                continue;
            }
            fs::write(&path, content)?;
            info!("Wrote sample table {:?}", path);
            written.push(table);
        }
        Ok(written)
    }

    /// Rows of a table, or `None` when its file does not exist.
    /// Tables holding free text are read with `Trim::Headers` so their fields come back as written.
    fn read_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        trim: Trim,
    ) -> Result<Option<Vec<T>>, StoreError> {
        let path = self.table_path(table);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(trim)
            .from_reader(file);

        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            rows.push(result?);
        }
        debug!("Read {} row(s) from {:?}", rows.len(), path);
        Ok(Some(rows))
    }

    fn append_row<T: Serialize>(&self, table: &str, row: &T) -> Result<(), StoreError> {
        let path = self.table_path(table);
        let needs_header = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => return Err(err.into()),
        };
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}

impl CookingStore for CsvStore {
    fn food_catalog(&self) -> Result<FoodCatalog, StoreError> {
        let rows: Vec<FoodDataRow> = self
            .read_rows(FOOD_DATA_TABLE, Trim::All)?
            .ok_or_else(|| StoreError::MissingTable(self.table_path(FOOD_DATA_TABLE)))?;

        let mut catalog = FoodCatalog::new();
        for (row_index, row) in rows.into_iter().enumerate() {
            let food_id = row.food_id;
            let item = FoodItem::try_from(row).map_err(|message| StoreError::Malformed {
                table: FOOD_DATA_TABLE,
                row: row_index,
                message,
            })?;
            if catalog.insert(item).is_some() {
                return Err(StoreError::Malformed {
                    table: FOOD_DATA_TABLE,
                    row: row_index,
                    message: format!("duplicate FoodDataID {}", food_id),
                });
            }
        }
        Ok(catalog)
    }

    fn cookings(&self) -> Result<Vec<Cooking>, StoreError> {
        let rows: Vec<CookingRow> = self
            .read_rows(COOKING_TABLE, Trim::Headers)?
            .unwrap_or_default();
        rows.into_iter()
            .enumerate()
            .map(|(row_index, row)| -> Result<Cooking, StoreError> {
                let food_attributes: Vec<FoodAttribute> =
                    serde_json::from_str(&row.food_attributes).map_err(|err| {
                        StoreError::Malformed {
                            table: COOKING_TABLE,
                            row: row_index,
                            message: format!("FoodAttributes: {}", err),
                        }
                    })?;
                Ok(Cooking {
                    cooking_id: row.cooking_id,
                    cooking_name: row.cooking_name,
                    description: row.description,
                    is_favorite: row.is_favorite,
                    last_update_date: row.last_update_date,
                    food_attributes,
                })
            })
            .collect()
    }

    fn refrigerator_stock(&self) -> Result<RefrigeratorStock, StoreError> {
        let rows: Vec<RefrigeratorRow> = self
            .read_rows(REFRIGERATOR_TABLE, Trim::All)?
            .unwrap_or_default();
        Ok(rows.into_iter().map(|row| (row.food_id, row.grams)).collect())
    }

    fn cooking_history(&self) -> Result<Vec<CookingHistoryEntry>, StoreError> {
        let rows: Vec<CookingHistoryRow> =
            self.read_rows(COOKING_HISTORY_TABLE, Trim::All)?.unwrap_or_default();
        Ok(rows
            .into_iter()
            .map(|row| CookingHistoryEntry {
                cooking_id: row.cooking_id,
                issued_date: row.issued_date,
            })
            .collect())
    }

    fn insert_cooking(&mut self, record: &Cooking) -> Result<(), StoreError> {
        let row = CookingRow {
            cooking_id: record.cooking_id,
            cooking_name: record.cooking_name.clone(),
            description: record.description.clone(),
            is_favorite: record.is_favorite,
            last_update_date: record.last_update_date,
            food_attributes: serde_json::to_string(&record.food_attributes)?,
        };
        self.append_row(COOKING_TABLE, &row)
    }

    fn append_cooking_history(&mut self, entry: &CookingHistoryEntry) -> Result<(), StoreError> {
        let row = CookingHistoryRow {
            cooking_id: entry.cooking_id,
            issued_date: entry.issued_date,
        };
        self.append_row(COOKING_HISTORY_TABLE, &row)
    }
}
