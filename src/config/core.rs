use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::Serialize;
use std::path::Path;

use super::{ZipsweepConfig, smart_load};

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

impl ZipsweepConfig {
    /// Load the merged configuration without command-line overrides
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        Self::load_with_overrides(custom_config, &super::ConfigOverrides::default())
    }

    /// Load the merged configuration with `overrides` on top of every other
    /// layer. Only the fields `overrides` actually serializes are applied.
    pub fn load_with_overrides<T: Serialize>(
        custom_config: Option<&str>,
        overrides: &T,
    ) -> Result<Self> {
        let figment = Self::figment(custom_config)?.merge(Serialized::defaults(overrides));
        figment
            .extract()
            .context("Failed to load zipsweep configuration")
    }

    /// Layered configuration sources, lowest priority first
    pub fn figment(custom_config: Option<&str>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // A custom config replaces the user and project files
        if let Some(custom_path) = custom_config {
            if !Path::new(custom_path).exists() {
                bail!("Configuration file not found: {}", custom_path);
            }
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            let user_config = Self::user_config_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(&user_config))
                .merge(Json::file(user_config.replace(".toml", ".json")))
                .merge(Yaml::file(user_config.replace(".toml", ".yaml")))
                .merge(Yaml::file(user_config.replace(".toml", ".yml")))
                // Project config - support multiple formats
                .merge(Toml::file("zipsweep.toml"))
                .merge(Json::file("zipsweep.json"))
                .merge(Yaml::file("zipsweep.yaml"))
                .merge(Yaml::file("zipsweep.yml"));
        }

        // Environment variables beat files; nested keys use `__`
        Ok(figment.merge(Env::prefixed("ZIPSWEEP_").split("__")))
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/zipsweep/config.toml", home),
            Err(_) => "~/.config/zipsweep/config.toml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, DEFAULT_ALPHABET};
    use figment::Jail;

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let embedded: ZipsweepConfig = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .extract()
            .unwrap();
        assert_eq!(embedded, ZipsweepConfig::default());
    }

    #[test]
    fn test_project_file_and_env_layering() {
        Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.set_env("HOME", home.display());
            jail.create_file(
                "zipsweep.toml",
                r#"
                    [search]
                    length = 4
                    batch_size = 500

                    [output]
                    result_file = "found.txt"
                "#,
            )?;
            jail.set_env("ZIPSWEEP_SEARCH__BATCH_SIZE", "250");

            let config = ZipsweepConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.search.length, 4);
            assert_eq!(config.search.batch_size, 250);
            assert_eq!(config.search.alphabet, DEFAULT_ALPHABET);
            assert_eq!(config.output.result_file.to_str(), Some("found.txt"));
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides_win() {
        Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.set_env("HOME", home.display());
            jail.set_env("ZIPSWEEP_SEARCH__LENGTH", "5");

            let mut overrides = ConfigOverrides::default();
            overrides.search.length = Some(3);
            overrides.search.alphabet = Some("ab".to_string());

            let config =
                ZipsweepConfig::load_with_overrides(None, &overrides).map_err(|e| e.to_string())?;
            assert_eq!(config.search.length, 3);
            assert_eq!(config.search.alphabet, "ab");
            // Untouched fields keep their defaults
            assert_eq!(config.search.batch_size, 100_000);
            Ok(())
        });
    }

    #[test]
    fn test_custom_config_file() {
        Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.set_env("HOME", home.display());
            jail.create_file("zipsweep.toml", "[search]\nlength = 2\n")?;
            jail.create_file(
                "custom.yaml",
                "search:\n  length: 8\narchive:\n  entry: vault.txt\n",
            )?;

            let config = ZipsweepConfig::load(Some("custom.yaml")).map_err(|e| e.to_string())?;
            // The project file is ignored when a custom file is given
            assert_eq!(config.search.length, 8);
            assert_eq!(config.archive.entry_name().as_deref(), Some("vault.txt"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        Jail::expect_with(|_jail| {
            assert!(ZipsweepConfig::load(Some("does-not-exist.toml")).is_err());
            Ok(())
        });
    }
}
