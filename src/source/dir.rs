use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::quiz::category::Category;
use crate::source::{DataLoadError, ProblemSource};

/// Problem files read from a directory laid out like `data/`.
#[derive(Clone, Debug)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ProblemSource for DirSource {
    fn fetch_category(&self, category: Category) -> Result<Option<Vec<u8>>, DataLoadError> {
        let path = self.dir.join(category.file_name());
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DataLoadError::Io { category, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn reads_category_files() {
        let dir = TempDir::new().unwrap();
        let one = r#"[{"lesson": 2, "type": "fill-in-the-blank", "question": "?", "answer": "b"}]"#;
        for category in crate::quiz::category::REQUIRED_CATEGORIES {
            fs::write(dir.path().join(category.file_name()), one).unwrap();
        }
        let set = DirSource::new(dir.path()).fetch_problem_set(false).unwrap();
        assert_eq!(set.problems(Category::Text).len(), 1);
    }

    #[test]
    fn empty_dir_reports_missing_grammar() {
        let dir = TempDir::new().unwrap();
        let err = DirSource::new(dir.path()).fetch_problem_set(false).unwrap_err();
        assert!(matches!(err, DataLoadError::Missing { category: Category::Grammar }));
    }
}
