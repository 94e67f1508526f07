//! Configuration loading for Aftergame.
//!
//! Reads `config.toml` from the data directory (`~/.aftergame/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the file
//! is missing or malformed. The gateway API key comes from the environment only
//! and is held as a [`SecretString`].

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use aftergame_types::config::AppConfig;

/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "AFTERGAME_DATA_DIR";

/// Primary and fallback variables for the gateway API key.
pub const GATEWAY_KEY_ENV: &str = "AFTERGAME_GATEWAY_API_KEY";
pub const GATEWAY_KEY_FALLBACK_ENV: &str = "LOVABLE_API_KEY";

/// `$AFTERGAME_DATA_DIR`, else `~/.aftergame`, else `./.aftergame`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aftergame")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparsable file: a warning, then the default.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => {
            if config.history_limit() != config.max_history {
                tracing::warn!(
                    max_history = config.max_history,
                    using = config.history_limit(),
                    "max_history out of range in {}",
                    config_path.display()
                );
            }
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Gateway API key from the environment, if set and non-empty.
pub fn gateway_api_key() -> Option<SecretString> {
    [GATEWAY_KEY_ENV, GATEWAY_KEY_FALLBACK_ENV]
        .into_iter()
        .find_map(|name| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
        })
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_app_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(tmp.path()).await;
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn load_app_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
gateway_base_url = "http://127.0.0.1:9000/v1"
chat_model = "google/gemini-2.5-pro"
stream_idle_timeout_secs = 15
max_history = 20
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.chat_model, "google/gemini-2.5-pro");
        assert_eq!(config.career_model, "google/gemini-2.5-flash");
        assert_eq!(config.stream_idle_timeout_secs, 15);
        assert_eq!(config.max_history, 20);
        assert_eq!(
            config.completions_url(),
            "http://127.0.0.1:9000/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn load_app_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config, AppConfig::default());
    }
}
