use serde::{Deserialize, Serialize};
use tessera_auth::SecurityConfig;
use tessera_cache::CacheConfig;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "tessera.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.security.validate()?;
        self.cache.validate()?;

        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::{AppConfig, DEFAULT_CONFIG_PATH};
    use config::{Config, Environment, File};
    use std::path::Path;

    /// Loads configuration from `path` (or [`DEFAULT_CONFIG_PATH`] if it
    /// exists) and applies `TESSERA__SECTION__KEY` overrides.
    pub fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(format!("config file not found: {}", p.display()));
                }
                builder = builder.add_source(File::from(p));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., TESSERA__CACHE__BACKEND=redis
        builder = builder.add_source(
            Environment::with_prefix("TESSERA")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;
    use tessera_cache::CacheBackendKind;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[security]
oat_secret = "oat-file-secret"
spt_secret = "spt-file-secret"
spt_ttl = "30m"

[cache]
backend = "local"

[logging]
level = "debug"
"#,
        );

        let cfg = loader::load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.security.oat_secret, "oat-file-secret");
        assert_eq!(cfg.security.spt_ttl, Duration::from_secs(1800));
        assert_eq!(cfg.security.oat_ttl, Duration::from_secs(86400));
        assert_eq!(cfg.cache.backend, CacheBackendKind::Local);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = loader::load_config(Some(Path::new("/nonexistent/tessera.toml"))).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_missing_secrets_fail_validation() {
        let file = write_config("[logging]\nlevel = \"info\"\n");
        let err = loader::load_config(Some(file.path())).unwrap_err();
        assert!(err.contains("oat_secret"));
    }

    #[test]
    fn test_invalid_log_level() {
        let cfg = AppConfig {
            security: SecurityConfig {
                oat_secret: "a".into(),
                spt_secret: "b".into(),
                ..SecurityConfig::default()
            },
            logging: LoggingConfig {
                level: "verbose".into(),
            },
            ..AppConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
