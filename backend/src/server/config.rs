//! Store configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

fn default_data_file() -> PathBuf {
    PathBuf::from("grove.json")
}

/// Configuration values controlling where the document lives.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GROVE")]
pub struct StoreSettings {
    /// Optional override for the durable document path.
    pub data_file: Option<PathBuf>,
}

impl StoreSettings {
    /// Return the configured document path, falling back to the default.
    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(default_data_file)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for store configuration parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> StoreSettings {
        StoreSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_path_is_used_when_missing() {
        let _guard = lock_env([("GROVE_DATA_FILE", None::<String>)]);
        let settings = load_from_empty_args();
        assert_eq!(settings.data_file(), default_data_file());
    }

    #[rstest]
    fn environment_override_is_respected() {
        let _guard = lock_env([("GROVE_DATA_FILE", Some("/tmp/grove-test.json".to_owned()))]);
        let settings = load_from_empty_args();
        assert_eq!(settings.data_file(), PathBuf::from("/tmp/grove-test.json"));
    }
}
