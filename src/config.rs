// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_FEEDS_PATH: &str = "FEEDS_CONFIG_PATH";
const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const ENV_CHANNEL_ID: &str = "TELEGRAM_CHANNEL_ID";
const ENV_API_BASE: &str = "TELEGRAM_API_BASE";

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// One configured feed endpoint with a topical section label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    pub name: String,
    pub section: String,
    pub url: String,
}

/// Telegram destination. Present only when both required env vars are set;
/// handlers short-circuit with a 500 envelope when it is `None`.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub channel_id: String,
    pub api_base: String,
}

/// Immutable process-wide configuration, built once in `main` and passed
/// into the router state. Nothing downstream reads env vars ad hoc.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: Option<TelegramConfig>,
    pub sources: Vec<Source>,
}

impl Config {
    pub fn from_env() -> Self {
        let telegram = match (std::env::var(ENV_BOT_TOKEN), std::env::var(ENV_CHANNEL_ID)) {
            (Ok(bot_token), Ok(channel_id)) if !bot_token.is_empty() && !channel_id.is_empty() => {
                Some(TelegramConfig {
                    bot_token,
                    channel_id,
                    api_base: std::env::var(ENV_API_BASE)
                        .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_BASE.to_string()),
                })
            }
            _ => None,
        };

        let sources = load_sources_default().unwrap_or_else(|e| {
            tracing::warn!(error = ?e, "feeds config unreadable, using built-in sources");
            default_sources()
        });

        Self { telegram, sources }
    }
}

/// Built-in source list: fashion / sneakers / music.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source {
            name: "Crisp Culture".to_string(),
            section: "Мода / streetwear".to_string(),
            url: "https://crispculture.com/feed".to_string(),
        },
        Source {
            name: "JustFreshKicks".to_string(),
            section: "Кроссовки".to_string(),
            url: "https://justfreshkicks.com/feed".to_string(),
        },
        Source {
            name: "UPROXX Music".to_string(),
            section: "Музыка".to_string(),
            url: "https://uproxx.com/music/feed".to_string(),
        },
    ]
}

/// Load sources from an explicit TOML path.
pub fn load_sources_from(path: &Path) -> Result<Vec<Source>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feeds config from {}", path.display()))?;
    parse_sources(&content)
}

/// Load sources using env var + fallbacks:
/// 1) $FEEDS_CONFIG_PATH
/// 2) config/feeds.toml
/// 3) built-in defaults
pub fn load_sources_default() -> Result<Vec<Source>> {
    if let Ok(p) = std::env::var(ENV_FEEDS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("FEEDS_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/feeds.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    Ok(default_sources())
}

fn parse_sources(s: &str) -> Result<Vec<Source>> {
    #[derive(Deserialize)]
    struct FeedsFile {
        source: Vec<Source>,
    }
    let v: FeedsFile = toml::from_str(s).context("parsing feeds config toml")?;
    let sources: Vec<Source> = v
        .source
        .into_iter()
        .filter(|s| !s.url.trim().is_empty())
        .collect();
    if sources.is_empty() {
        return Err(anyhow!("feeds config contains no usable sources"));
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn parses_toml_source_tables() {
        let toml = r#"
            [[source]]
            name = "Crisp Culture"
            section = "Мода / streetwear"
            url = "https://crispculture.com/feed"

            [[source]]
            name = "Empty"
            section = "skip me"
            url = "  "
        "#;
        let out = parse_sources(toml).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Crisp Culture");
    }

    #[test]
    fn rejects_empty_source_list() {
        assert!(parse_sources("source = []").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_FEEDS_PATH);

        // No files in temp CWD -> built-in defaults
        let v = load_sources_default().unwrap();
        assert_eq!(v, default_sources());

        // Env var takes precedence
        let p = tmp.path().join("feeds.toml");
        fs::write(
            &p,
            r#"
            [[source]]
            name = "X"
            section = "S"
            url = "https://example.test/feed"
            "#,
        )
        .unwrap();
        env::set_var(ENV_FEEDS_PATH, p.display().to_string());
        let v2 = load_sources_default().unwrap();
        assert_eq!(v2.len(), 1);
        assert_eq!(v2[0].name, "X");
        env::remove_var(ENV_FEEDS_PATH);

        env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn telegram_config_requires_both_env_vars() {
        env::remove_var(ENV_BOT_TOKEN);
        env::remove_var(ENV_CHANNEL_ID);
        env::remove_var(ENV_FEEDS_PATH);
        assert!(Config::from_env().telegram.is_none());

        env::set_var(ENV_BOT_TOKEN, "123:abc");
        assert!(Config::from_env().telegram.is_none());

        env::set_var(ENV_CHANNEL_ID, "@channel");
        let cfg = Config::from_env();
        let tg = cfg.telegram.expect("both vars set");
        assert_eq!(tg.bot_token, "123:abc");
        assert_eq!(tg.channel_id, "@channel");
        assert_eq!(tg.api_base, DEFAULT_TELEGRAM_API_BASE);

        env::remove_var(ENV_BOT_TOKEN);
        env::remove_var(ENV_CHANNEL_ID);
    }
}
