//! Scoring overrides loaded from a TOML file and `POQ__*` environment
//! variables.
//!
//! Environment variables win over the file; both sit on top of the network
//! defaults. Nested keys use `__`, e.g. `POQ__CATEGORY_IMPORTANCE__DIGITAL_ITEMS=3`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use poq_core::constants::ENV_PREFIX;
use poq_core::network::ScoringOverrides;

/// Default config file: `<config_dir>/poq/poq.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("poq").join("poq.toml"))
}

/// Load overrides from `path` (required when given) or the default path
/// (optional), then the process environment.
pub fn load_overrides(path: Option<&Path>) -> Result<ScoringOverrides> {
    load_with_env(path, None)
}

/// As [`load_overrides`], reading environment variables from `env` instead
/// of the process when `env` is `Some`.
pub fn load_with_env(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<ScoringOverrides> {
    let mut builder = Config::builder();

    match path {
        Some(p) => {
            builder = builder.add_source(File::from(p).format(FileFormat::Toml).required(true));
        }
        None => {
            if let Some(p) = default_config_path() {
                builder = builder.add_source(File::from(p).format(FileFormat::Toml).required(false));
            }
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    let overrides = builder
        .build()
        .context("failed to read configuration")?
        .try_deserialize::<ScoringOverrides>()
        .context("invalid configuration")?;
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use poq_core::types::Category;
    use std::io::Write;

    fn write_toml(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("poq.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn default_path_ends_with_poq_toml() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("poq/poq.toml"));
        }
    }

    #[test]
    fn loads_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_toml(
            &dir,
            "half_life_days = 400.0\ngrowth_rate = 0.4\n\n[category_importance]\ndigital_items = 3.0\n",
        );
        let o = load_with_env(Some(&path), Some(HashMap::new())).unwrap();
        assert_eq!(o.half_life_days, Some(400.0));
        assert_eq!(o.growth_rate, Some(0.4));
        assert_eq!(o.min_threshold, None);
        assert_eq!(o.category_importance.unwrap()[&Category::DigitalItems], 3.0);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_toml(&dir, "half_life_days = 400.0\n");
        let env = HashMap::from([("POQ__HALF_LIFE_DAYS".to_string(), "90".to_string())]);
        let o = load_with_env(Some(&path), Some(env)).unwrap();
        assert_eq!(o.half_life_days, Some(90.0));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_with_env(Some(&missing), Some(HashMap::new())).is_err());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_toml(&dir, "half_life = 10.0\n");
        assert!(load_with_env(Some(&path), Some(HashMap::new())).is_err());
    }

    #[test]
    fn empty_file_gives_no_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_toml(&dir, "");
        let o = load_with_env(Some(&path), Some(HashMap::new())).unwrap();
        assert_eq!(o, ScoringOverrides::default());
    }
}
