use rustcast::application::ml::bootstrap::synthetic_training_set;
use rustcast::application::ml::model::{Model, ModelKind};
use rustcast::config::ModelConfig;
use rustcast::domain::errors::PersistenceError;
use rustcast::infrastructure::persistence::ModelStore;
use std::fs;

fn config() -> ModelConfig {
    ModelConfig {
        bootstrap_seed: Some(7),
        forest_trees: 10,
        ..ModelConfig::default()
    }
}

#[test]
fn test_saved_models_predict_bit_identically_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (x, y) = synthetic_training_set(120, Some(3)).unwrap();

    for kind in [ModelKind::Ridge, ModelKind::Forest, ModelKind::Mean] {
        let model = Model::fit(kind, &config(), &x, &y).unwrap();
        let store = ModelStore::new(dir.path().join(format!("{:?}.json", kind)));
        store.save(&model).unwrap();

        let reloaded = store.load().unwrap().unwrap();
        assert_eq!(reloaded.kind(), kind);
        let before = model.predict(&x[..20]).unwrap();
        let after = reloaded.predict(&x[..20]).unwrap();
        // Floats round-trip exactly through the JSON blob.
        assert_eq!(before, after, "{:?} predictions changed after reload", kind);
    }
}

#[test]
fn test_feature_order_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let store = ModelStore::new(&path);
    let (x, y) = synthetic_training_set(50, Some(1)).unwrap();
    let mut model = Model::fit(ModelKind::Ridge, &config(), &x, &y).unwrap();
    model.feature_names.swap(0, 1);
    store.save(&model).unwrap();

    assert!(matches!(
        store.load_or_train(&config()),
        Err(PersistenceError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_bootstrap_writes_ridge_model_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models").join("latest_model.json");
    let store = ModelStore::new(&path);

    let model = store.load_or_train(&config()).unwrap();
    assert_eq!(model.kind(), ModelKind::Ridge);
    let written = fs::read(&path).unwrap();

    store.load_or_train(&config()).unwrap();
    assert_eq!(fs::read(&path).unwrap(), written);
}
