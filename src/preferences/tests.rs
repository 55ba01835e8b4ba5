// src/preferences/tests.rs

#[cfg(test)]
mod store_tests {
    use crate::preferences::{PreferencesError, PreferencesStore};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = PreferencesStore::load(dir.path().join("preferences.json")).unwrap();
        assert_eq!(store.keys().count(), 0);
    }

    #[test]
    fn test_load_blank_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "  \n").unwrap();

        let store = PreferencesStore::load(&path).unwrap();
        assert_eq!(store.keys().count(), 0);
    }

    #[test]
    fn test_set_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut store = PreferencesStore::empty(&path);
        store.set("theme", "dark").unwrap();
        store.set("fontSize", 14).unwrap();
        store.save().unwrap();

        let loaded = PreferencesStore::load(&path).unwrap();
        assert_eq!(loaded.get("theme"), Some(&json!("dark")));
        assert_eq!(loaded.get_as::<u32>("fontSize").unwrap(), Some(14));
        assert_eq!(loaded.get_as::<u32>("missing").unwrap(), None);
    }

    #[test]
    fn test_remove_key() {
        let mut store = PreferencesStore::empty("unused.json");
        store.set("a", true).unwrap();

        assert_eq!(store.remove("a"), Some(json!(true)));
        assert_eq!(store.remove("a"), None);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ \"theme\": ").unwrap();

        let err = PreferencesStore::load(&path).unwrap_err();
        assert!(matches!(err, PreferencesError::Parse { .. }), "got {:?}", err);
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = PreferencesStore::load(&path).unwrap_err();
        assert!(matches!(err, PreferencesError::NotAnObject { .. }), "got {:?}", err);
    }

    #[test]
    fn test_get_as_wrong_shape() {
        let mut store = PreferencesStore::empty("unused.json");
        store.set("fontSize", "large").unwrap();

        let err = store.get_as::<u32>("fontSize").unwrap_err();
        assert!(matches!(err, PreferencesError::Shape { ref key, .. } if key == "fontSize"));
    }
}

#[cfg(test)]
mod config_tests {
    use crate::filesystem::config::{FsConfig, DEFAULT_BATCH_WINDOW_MS, PREFERENCES_KEY};
    use crate::preferences::PreferencesStore;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_defaults_without_section() {
        let store = PreferencesStore::empty("unused.json");
        let config = FsConfig::from_preferences(&store).unwrap();

        assert_eq!(config, FsConfig::default());
        assert_eq!(config.batch_window(), Duration::from_millis(DEFAULT_BATCH_WINDOW_MS));
        assert_eq!(config.default_dir_mode, 0o755);
        assert_eq!(config.default_encoding, "utf8");
    }

    #[test]
    fn test_partial_section_overrides() {
        let mut store = PreferencesStore::empty("unused.json");
        store
            .set(
                PREFERENCES_KEY,
                json!({ "batchWindowMs": 50, "networkPathPrefixes": ["/Volumes/share"] }),
            )
            .unwrap();

        let config = FsConfig::from_preferences(&store).unwrap();
        assert_eq!(config.batch_window_ms, 50);
        assert_eq!(config.network_path_prefixes, vec!["/Volumes/share".to_string()]);
        assert_eq!(config.default_encoding, "utf8");
    }

    #[test]
    fn test_invalid_exclusion_pattern_falls_back() {
        let config = FsConfig {
            exclusions: Some("([unclosed".to_string()),
            ..Default::default()
        };
        let regex = config.exclusion_regex();
        assert!(regex.is_match(".git"));
    }
}

#[cfg(test)]
mod app_state_tests {
    use crate::filesystem::dialog::HeadlessDialogs;
    use crate::filesystem::config::PREFERENCES_KEY;
    use crate::preferences::PreferencesStore;
    use crate::AppState;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_reads_filesystem_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let mut store = PreferencesStore::empty(&path);
        store.set(PREFERENCES_KEY, json!({ "batchWindowMs": 75 })).unwrap();
        store.save().unwrap();

        let state = AppState::initialize(&path, Arc::new(HeadlessDialogs)).unwrap();
        assert_eq!(state.fs.config().batch_window_ms, 75);
        assert!(state.preferences.lock().await.get(PREFERENCES_KEY).is_some());
    }
}
