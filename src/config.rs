//! Runtime configuration.
//!
//! Everything has a default, so a missing config file is not an error. The
//! file is TOML:
//!
//! ```toml
//! default_lens = "hebrew"
//! language_hint = "en-us"
//!
//! [phonemizer]
//! cmudict_path = "/usr/share/cmudict/cmudict.dict"
//!
//! [translate]
//! api_key_env = "GOOGLE_TRANSLATE_API_KEY"
//!
//! [server]
//! port = 5000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::profiles::DEFAULT_LENS;
use crate::error::{ConfigError, ConfigResult};
use crate::persistence::write_atomic;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "NAME_ORACLE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Lens used when a request names none, or an unknown one.
    pub default_lens: String,
    /// Passed to the phoneme source with every word.
    pub language_hint: String,
    /// Extra `*.toml` script profiles layered over the bundled ones.
    pub profiles_dir: Option<PathBuf>,
    pub phonemizer: PhonemizerSettings,
    pub translate: TranslateSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhonemizerSettings {
    /// CMU dictionary file. Default locations are searched when unset.
    pub cmudict_path: Option<PathBuf>,
    /// Lexicon consulted before the dictionary.
    pub lexicon_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateSettings {
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub target_language: String,
    pub timeout_secs: u64,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://translation.googleapis.com/language/translate/v2".to_string(),
            api_key_env: "GOOGLE_TRANSLATE_API_KEY".to_string(),
            target_language: "en".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerSettings {
    /// `bind:port`, with `$PORT` taking precedence over the configured port.
    pub fn address(&self) -> String {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(self.port);
        format!("{}:{}", self.bind, port)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            default_lens: DEFAULT_LENS.to_string(),
            language_hint: "en-us".to_string(),
            profiles_dir: None,
            phonemizer: PhonemizerSettings::default(),
            translate: TranslateSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl OracleConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load `$NAME_ORACLE_CONFIG` if set, else the user config file if it
    /// exists, else defaults.
    pub fn discover() -> ConfigResult<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&explicit));
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Using user config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/name-oracle/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("name-oracle").join("config.toml"))
    }

    /// Save atomically to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        write_atomic(path, content.as_bytes()).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OracleConfig::default();
        assert_eq!(config.default_lens, "hebrew");
        assert_eq!(config.language_hint, "en-us");
        assert_eq!(config.translate.target_language, "en");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: OracleConfig = toml::from_str(
            r#"
            default_lens = "arabic"

            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.default_lens, "arabic");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.translate, TranslateSettings::default());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = OracleConfig::default();
        config.default_lens = "indic".into();
        config.phonemizer.lexicon_path = Some(dir.path().join("names.toml"));
        config.save(&path).unwrap();

        assert_eq!(OracleConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn bad_file_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_lens = [").unwrap();
        assert!(matches!(
            OracleConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
