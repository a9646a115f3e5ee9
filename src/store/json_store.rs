use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::Utc;

use crate::config::Config;
use crate::store::ProgressStore;
use crate::store::schema::{EXPORT_VERSION, ExportData, ProgressData};

const PROGRESS_FILE: &str = "progress.json";

/// Progress persisted as pretty-printed JSON in a data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn write_synced(path: &Path, json: &str) -> Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Bundle stored progress and the active config for export.
    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            quizdr_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            progress: self.load_progress(),
        }
    }

    /// Replace stored progress with an export bundle.
    ///
    /// The new file is staged as `.tmp`; the existing file is moved to `.bak`
    /// before the staged file takes its place, and restored if that fails.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.quizdr_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.quizdr_export_version,
                EXPORT_VERSION
            );
        }

        let json = serde_json::to_string_pretty(&data.progress)?;
        let final_path = self.file_path(PROGRESS_FILE);
        let tmp_path = final_path.with_extension("json.tmp");
        let bak_path = final_path.with_extension("json.bak");

        if let Err(e) = Self::write_synced(&tmp_path, &json) {
            let _ = fs::remove_file(&tmp_path);
            bail!("Import failed during staging: {e}");
        }

        let had_original = final_path.exists();
        if had_original && let Err(e) = fs::rename(&final_path, &bak_path) {
            let _ = fs::remove_file(&tmp_path);
            bail!("Import failed during commit (backup): {e}");
        }

        if let Err(e) = fs::rename(&tmp_path, &final_path) {
            if had_original {
                let _ = fs::rename(&bak_path, &final_path);
            }
            let _ = fs::remove_file(&tmp_path);
            bail!("Import failed during commit (rename): {e}");
        }

        if had_original {
            let _ = fs::remove_file(&bak_path);
        }
        log::info!("imported progress from export of {}", data.exported_at);
        Ok(())
    }

    /// Check for a leftover backup from an interrupted import, removing it.
    pub fn check_interrupted_import(&self) -> bool {
        let bak_path = self.file_path(PROGRESS_FILE).with_extension("json.bak");
        if bak_path.exists() {
            let _ = fs::remove_file(&bak_path);
            true
        } else {
            false
        }
    }
}

impl ProgressStore for JsonStore {
    fn load_progress(&self) -> ProgressData {
        let path = self.file_path(PROGRESS_FILE);
        if !path.exists() {
            return ProgressData::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable progress file {}: {e}", path.display());
                ProgressData::default()
            }),
            Err(e) => {
                log::warn!("failed to read {}: {e}", path.display());
                ProgressData::default()
            }
        }
    }

    fn save_progress(&self, data: &ProgressData) -> Result<()> {
        let path = self.file_path(PROGRESS_FILE);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        Self::write_synced(&tmp_path, &json)?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::category::Category;
    use crate::quiz::lesson::LessonKey;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn sample_progress() -> ProgressData {
        let mut progress = ProgressData::default();
        progress.record(Category::Grammar, &LessonKey::Number(1), 1, 2);
        progress.record(Category::Vocabulary, &LessonKey::Number(4), 3, 3);
        progress
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_dir, store) = make_test_store();
        assert!(store.load_progress().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = make_test_store();
        let progress = sample_progress();
        store.save_progress(&progress).unwrap();
        assert_eq!(store.load_progress(), progress);
        assert!(!store.file_path("progress.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(PROGRESS_FILE), "{not json").unwrap();
        assert!(store.load_progress().is_empty());
    }

    #[test]
    fn test_round_trip_export_import() {
        let (_dir, store) = make_test_store();
        let config = Config::default();
        store.save_progress(&sample_progress()).unwrap();

        let export = store.export_all(&config);
        assert_eq!(export.quizdr_export_version, EXPORT_VERSION);

        let (_dir2, store2) = make_test_store();
        store2.import_all(&export).unwrap();
        assert_eq!(store2.load_progress(), sample_progress());
    }

    #[test]
    fn test_import_replaces_existing_progress() {
        let (_dir, store) = make_test_store();
        store.save_progress(&sample_progress()).unwrap();

        let export = ExportData {
            quizdr_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: Config::default(),
            progress: ProgressData::default(),
        };
        store.import_all(&export).unwrap();
        assert!(store.load_progress().is_empty());
        assert!(!store.check_interrupted_import());
    }

    #[test]
    fn test_version_rejection() {
        let (_dir, store) = make_test_store();
        let mut export = store.export_all(&Config::default());
        export.quizdr_export_version = 99;

        let result = store.import_all(&export);
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Unsupported export version"));
        assert!(err_msg.contains("99"));
    }

    #[test]
    fn test_import_staging_failure_preserves_originals() {
        let (dir, store) = make_test_store();
        store.save_progress(&sample_progress()).unwrap();
        let original = fs::read_to_string(store.file_path(PROGRESS_FILE)).unwrap();

        let bad_dir = dir.path().join("nonexistent_subdir");
        let bad_store = JsonStore {
            base_dir: bad_dir.clone(),
        };
        let export = store.export_all(&Config::default());
        let result = bad_store.import_all(&export);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Import failed during staging")
        );
        assert!(!bad_dir.exists());

        let after = fs::read_to_string(store.file_path(PROGRESS_FILE)).unwrap();
        assert_eq!(original, after);
    }

    #[test]
    fn test_check_interrupted_import_detects_bak_files() {
        let (_dir, store) = make_test_store();
        assert!(!store.check_interrupted_import());

        fs::write(store.file_path("progress.json.bak"), "{}").unwrap();
        assert!(store.check_interrupted_import());
        assert!(!store.file_path("progress.json.bak").exists());
    }
}
