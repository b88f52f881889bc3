use std::env;
use std::path::PathBuf;

pub const DATA_DIR_ENV_VAR: &str = "COOKING_DATA_DIR";
pub const DRAFT_FILE_ENV_VAR: &str = "COOKING_DRAFT_FILE";
pub const SESSION_ENV_VAR: &str = "COOKING_SESSION";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DRAFT_FILE_NAME: &str = "drafts.bin";
const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Explicit draft file; falls back to `<data_dir>/drafts.bin`.
    pub draft_file: Option<PathBuf>,
    pub session: String,
}

impl AppConfig {
    /// Reads the environment after loading `.env`.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        AppConfig {
            data_dir: non_empty(DATA_DIR_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            draft_file: non_empty(DRAFT_FILE_ENV_VAR).map(PathBuf::from),
            session: non_empty(SESSION_ENV_VAR).unwrap_or_else(|| DEFAULT_SESSION.to_string()),
        }
    }

    /// Command-line values win over the environment.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, session: Option<String>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(session) = session {
            self.session = session;
        }
        self
    }

    pub fn draft_path(&self) -> PathBuf {
        self.draft_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_DRAFT_FILE_NAME))
    }
}
