//! Persistence for fitted models.
//!
//! One JSON blob per path holding the schema version, the ordered feature
//! names, and the estimator state. Loading validates the schema; a corrupt or
//! incompatible blob is an error and is never silently replaced.
//!
//! `load_or_train` is read-then-write: concurrent first-time calls on the same
//! path may both bootstrap and both write. Writes are atomic (temp file then
//! rename), so readers see one complete model, but callers that need exactly
//! one bootstrap must serialise calls themselves.

use crate::application::ml::bootstrap::bootstrap_model;
use crate::application::ml::model::Model;
use crate::config::ModelConfig;
use crate::domain::errors::PersistenceError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the stored model; `None` when no file exists.
    pub fn load(&self) -> Result<Option<Model>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read(&self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let model: Model =
            serde_json::from_slice(&content).map_err(|source| PersistenceError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        model.validate_schema()?;

        info!("Loaded {:?} model from {:?}", model.kind(), self.path);
        Ok(Some(model))
    }

    /// Writes the model, creating parent directories as needed.
    pub fn save(&self, model: &Model) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io(source))?;
            }
        }

        let content = serde_json::to_vec(model).map_err(PersistenceError::Serialize)?;

        // Atomic write: write to temp file then rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(|source| self.io(source))?;
        fs::rename(&temp_path, &self.path).map_err(|source| self.io(source))?;

        info!("Saved {:?} model to {:?}", model.kind(), self.path);
        Ok(())
    }

    /// Returns the stored model unchanged, or bootstraps, saves and returns a
    /// new ridge model when none exists.
    pub fn load_or_train(&self, config: &ModelConfig) -> Result<Model, PersistenceError> {
        if let Some(model) = self.load()? {
            return Ok(model);
        }

        warn!(
            "No model at {:?}; bootstrapping from synthetic data",
            self.path
        );
        let model = bootstrap_model(config)?;
        self.save(&model)?;
        Ok(model)
    }

    fn io(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::model::ModelKind;

    fn seeded() -> ModelConfig {
        ModelConfig {
            bootstrap_seed: Some(11),
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_or_train_bootstraps_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        let store = ModelStore::new(&path);

        let first = store.load_or_train(&seeded()).unwrap();
        assert!(path.exists());
        assert_eq!(first.kind(), ModelKind::Ridge);

        // A different seed would give different coefficients if it retrained.
        let other = ModelConfig {
            bootstrap_seed: Some(99),
            ..ModelConfig::default()
        };
        let second = store.load_or_train(&other).unwrap();
        assert_eq!(first.coefficients(), second.coefficients());
    }

    #[test]
    fn test_corrupt_file_is_error_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"not json").unwrap();

        let store = ModelStore::new(&path);
        assert!(matches!(
            store.load_or_train(&seeded()),
            Err(PersistenceError::Corrupt { .. })
        ));
        assert_eq!(fs::read(&path).unwrap(), b"not json");
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let store = ModelStore::new(&path);
        let mut model = bootstrap_model(&seeded()).unwrap();
        model.schema_version = 99;
        store.save(&model).unwrap();

        assert!(matches!(
            store.load(),
            Err(PersistenceError::UnsupportedVersion {
                found: 99,
                expected: 1
            })
        ));
    }
}
