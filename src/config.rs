//! Configuration file parser for ~/.config/til/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`,
//! though a usable setup needs `store_url` from somewhere (file or CLI).
//! Keys we don't recognize still parse (no `deny_unknown_fields`), but each
//! one gets a warning so typos surface in the log.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file is bigger than the 1 MB cap.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Settings read from the config file.
///
/// Every field carries `#[serde(default)]`, so a file naming any subset of
/// keys parses and the rest fall back to `Default::default()`.
///
/// The hand-written Debug impl masks `store_key` so the board key cannot
/// leak into logs, error messages, or debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Facts board endpoint root, e.g. `https://abc123.supabase.co`.
    pub store_url: Option<String>,

    /// Board API key (alternative to the TIL_STORE_KEY env var).
    /// The env var takes precedence over the config file.
    pub store_key: Option<String>,

    /// Category filter selected at startup: "all" or a category name.
    pub default_category: String,

    /// Theme variant name ("dark" or "light").
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: None,
            store_key: None,
            default_category: "all".to_string(),
            theme: "dark".to_string(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("store_url", &self.store_url)
            .field("store_key", &self.store_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_category", &self.default_category)
            .field("theme", &self.theme)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Read and parse the config file.
    ///
    /// Absent, empty, and whitespace-only files all come back as
    /// `Config::default()`; malformed TOML is a `ConfigError::Parse` carrying
    /// the line number. Unrecognized keys parse fine but are logged.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Size check up front, so a runaway file never gets slurped into memory
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // The file can vanish between the metadata call and the read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // A raw-table pass first, to spot keys serde would silently drop
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["store_url", "store_key", "default_category", "theme"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            default_category = %config.default_category,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The board key to use, wrapped for in-memory protection.
    ///
    /// `env_override` is the value of `TIL_STORE_KEY` if set; it wins over
    /// the config file so a key never has to be written to disk.
    pub fn resolved_store_key(&self, env_override: Option<String>) -> Option<SecretString> {
        env_override
            .or_else(|| self.store_key.clone())
            .map(SecretString::from)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.store_url.is_none());
        assert!(config.store_key.is_none());
        assert_eq!(config.default_category, "all");
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/til_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("til_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("til_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "theme = \"light\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.default_category, "all"); // default
        assert!(config.store_url.is_none()); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("til_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
store_url = "https://abc123.supabase.co"
store_key = "anon-key-123"
default_category = "science"
theme = "light"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.store_url.as_deref(),
            Some("https://abc123.supabase.co")
        );
        assert_eq!(config.store_key.as_deref(), Some("anon-key-123"));
        assert_eq!(config.default_category, "science");
        assert_eq!(config.theme, "light");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("til_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = std::env::temp_dir().join("til_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
theme = "dark"
store_ur = "https://typo.supabase.co"
max_rows = 42
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let dir = std::env::temp_dir().join("til_config_test_wrongtype");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        // store_url holds a string
        std::fs::write(&path, "store_url = 42\n").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let dir = std::env::temp_dir().join("til_config_test_whitespace");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "   \n  \n  ").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("til_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        // One byte past the cap
        let content = "x".repeat(Config::MAX_FILE_SIZE as usize + 1);
        std::fs::write(&path, content).unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_debug_masks_store_key() {
        let config = Config {
            store_key: Some("sb-anon-key-000111".to_string()),
            ..Config::default()
        };

        let debug_output = format!("{:?}", config);
        assert!(
            !debug_output.contains("sb-anon-key-000111"),
            "Debug output should not contain the store key"
        );
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should show [REDACTED] for the store key"
        );
    }

    #[test]
    fn test_env_key_wins_over_config_key() {
        let config = Config {
            store_key: Some("from-file".to_string()),
            ..Config::default()
        };

        let resolved = config.resolved_store_key(Some("from-env".to_string()));
        assert_eq!(resolved.unwrap().expose_secret(), "from-env");

        let resolved = config.resolved_store_key(None);
        assert_eq!(resolved.unwrap().expose_secret(), "from-file");
    }

    #[test]
    fn test_no_key_anywhere_resolves_none() {
        let config = Config::default();
        assert!(config.resolved_store_key(None).is_none());
    }
}
