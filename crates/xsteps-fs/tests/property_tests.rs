use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeSet;
use tempfile::TempDir;
use xsteps_fs::{ConfigMap, ConfigStore, Error, NormalizedPath};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9_/@. -]{0,24}".prop_map(Value::from),
    ]
}

fn config_map() -> impl Strategy<Value = ConfigMap> {
    prop::collection::btree_map("[a-z_]{1,12}", scalar(), 0..8)
}

proptest! {
    #[test]
    fn test_save_load_roundtrip(map in config_map()) {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new();

        for file_name in ["config.yaml", "config.json", "config.toml"] {
            let path = NormalizedPath::new(temp.path().join(file_name));
            store.save(&path, &map).unwrap();
            let loaded = store.load_map(&path).unwrap();
            prop_assert_eq!(&loaded, &map, "format: {}", file_name);
        }
    }

    #[test]
    fn test_merge_rejects_iff_keys_intersect(existing in config_map(), incoming in config_map()) {
        let existing_keys: BTreeSet<_> = existing.keys().collect();
        let intersects = incoming.keys().any(|k| existing_keys.contains(k));

        match ConfigStore::merge(&existing, &incoming, false) {
            Ok(merged) => {
                prop_assert!(!intersects);
                let mut expected = existing.clone();
                expected.extend(incoming.clone());
                prop_assert_eq!(merged, expected);
            }
            Err(Error::OverrideRejected { collisions, .. }) => {
                prop_assert!(intersects);
                let shared = incoming.keys().filter(|k| existing_keys.contains(k)).count();
                prop_assert_eq!(collisions, shared);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_merge_with_override_is_right_biased(existing in config_map(), incoming in config_map()) {
        let merged = ConfigStore::merge(&existing, &incoming, true).unwrap();
        for (key, value) in &incoming {
            prop_assert_eq!(&merged[key], value);
        }
        for (key, value) in &existing {
            if !incoming.contains_key(key) {
                prop_assert_eq!(&merged[key], value);
            }
        }
    }
}
