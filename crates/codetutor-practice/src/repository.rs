//! Problem repository

use crate::error::{PracticeError, Result};
use crate::models::{ProblemDetail, ProblemSummary};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const BRIEF_FILE: &str = "problems_brief.json";
pub const DETAILED_FILE: &str = "problems_detailed.json";
pub const SCAFFOLD_FILE: &str = "problems_gold_code.json";

/// Read-only lookups over the practice problem set
pub trait ProblemRepository: Send + Sync {
    /// All problem summaries, in stored order
    fn list_problems(&self) -> &[ProblemSummary];

    /// Detailed record for a problem
    fn get_problem(&self, id: &str) -> Option<&ProblemDetail>;

    /// Test scaffold for a problem in one language
    fn get_solution_scaffold(&self, id: &str, language: &str) -> Option<&str>;

    /// Summaries whose topic contains `needle`, ignoring case
    fn filter_by_topic(&self, needle: &str) -> Vec<&ProblemSummary> {
        let needle = needle.to_lowercase();
        self.list_problems()
            .iter()
            .filter(|p| p.topic.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Repository loaded from JSON fixture files
#[derive(Debug, Clone)]
pub struct JsonFixtureRepository {
    data_dir: PathBuf,
    summaries: Vec<ProblemSummary>,
    details: HashMap<String, ProblemDetail>,
    scaffolds: HashMap<String, HashMap<String, String>>,
}

impl JsonFixtureRepository {
    /// Load all fixtures from `data_dir`
    ///
    /// The summary list is required. Missing or unreadable detail and
    /// scaffold files leave those lookups empty.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if !data_dir.is_dir() {
            return Err(PracticeError::MissingDataDir(data_dir));
        }

        let summaries: Vec<ProblemSummary> = read_json(&data_dir.join(BRIEF_FILE))?;
        let details = read_details(&data_dir.join(DETAILED_FILE));
        let scaffolds: HashMap<String, HashMap<String, String>> =
            read_optional(&data_dir.join(SCAFFOLD_FILE));

        info!(
            "Loaded {} problems ({} detailed, {} with scaffolds) from {}",
            summaries.len(),
            details.len(),
            scaffolds.len(),
            data_dir.display()
        );

        Ok(Self {
            data_dir,
            summaries,
            details,
            scaffolds,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Languages with a scaffold for a problem, sorted
    pub fn scaffold_languages(&self, id: &str) -> Vec<&str> {
        let mut languages: Vec<&str> = self
            .scaffolds
            .get(id)
            .map(|by_lang| by_lang.keys().map(String::as_str).collect())
            .unwrap_or_default();
        languages.sort_unstable();
        languages
    }
}

impl ProblemRepository for JsonFixtureRepository {
    fn list_problems(&self) -> &[ProblemSummary] {
        &self.summaries
    }

    fn get_problem(&self, id: &str) -> Option<&ProblemDetail> {
        self.details.get(id)
    }

    fn get_solution_scaffold(&self, id: &str, language: &str) -> Option<&str> {
        self.scaffolds
            .get(id)
            .and_then(|by_lang| by_lang.get(language))
            .map(String::as_str)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading fixture {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| PracticeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| PracticeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json(path) {
        Ok(value) => value,
        Err(e) => {
            warn!("{}; lookups against it will return not found", e);
            T::default()
        }
    }
}

/// Decode detail records one by one so a malformed entry only hides itself
fn read_details(path: &Path) -> HashMap<String, ProblemDetail> {
    let records: HashMap<String, Value> = read_optional(path);
    let mut details = HashMap::with_capacity(records.len());

    for (id, record) in records {
        match serde_json::from_value::<ProblemDetail>(record) {
            Ok(detail) => {
                details.insert(id, detail);
            }
            Err(e) => warn!("Skipping problem '{}' in {}: {}", id, path.display(), e),
        }
    }

    details
}
