pub mod dir;
pub mod embedded;
#[cfg(feature = "network")]
pub mod http;

use crate::quiz::category::{Category, REQUIRED_CATEGORIES};
use crate::quiz::problem::{Problem, ProblemSet};

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("problem data for {category} is missing")]
    Missing { category: Category },
    #[error("failed to read problem data for {category}: {source}")]
    Io {
        category: Category,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed problem data for {category}: {source}")]
    Parse {
        category: Category,
        #[source]
        source: serde_json::Error,
    },
    #[cfg(feature = "network")]
    #[error("failed to fetch problem data for {category}: {source}")]
    Http {
        category: Category,
        #[source]
        source: reqwest::Error,
    },
}

/// Where problem data comes from.
pub trait ProblemSource {
    /// Raw JSON for one category, or `None` if the source has no such file.
    fn fetch_category(&self, category: Category) -> Result<Option<Vec<u8>>, DataLoadError>;

    /// Fetch every required category, plus the debug category when asked
    /// for and available. Any required category missing or malformed fails
    /// the whole load.
    fn fetch_problem_set(&self, include_debug: bool) -> Result<ProblemSet, DataLoadError> {
        let mut set = ProblemSet::new();
        for category in REQUIRED_CATEGORIES {
            let bytes = self
                .fetch_category(category)?
                .ok_or(DataLoadError::Missing { category })?;
            set.insert(category, parse_category(category, &bytes)?);
        }
        if include_debug {
            match self.fetch_category(Category::Debug)? {
                Some(bytes) => set.insert(Category::Debug, parse_category(Category::Debug, &bytes)?),
                None => log::debug!("debug category requested but not present"),
            }
        }
        log::info!(
            "loaded {} problems across {} categories",
            set.categories().iter().map(|&c| set.problems(c).len()).sum::<usize>(),
            set.categories().len()
        );
        Ok(set)
    }
}

pub fn parse_category(category: Category, bytes: &[u8]) -> Result<Vec<Problem>, DataLoadError> {
    serde_json::from_slice(bytes).map_err(|source| DataLoadError::Parse { category, source })
}
