//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::PlaylistSource;

pub const APP_DIR: &str = "channel_deck";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<PlaylistSource>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_player")]
    pub external_player: String,
    #[serde(default = "default_true")]
    pub pass_user_agent_to_player: bool,
}

fn default_sources() -> Vec<PlaylistSource> {
    vec![
        PlaylistSource::new("https://iptv-org.github.io/iptv/languages/hin.m3u", "Hindi"),
        PlaylistSource::new("https://iptv-org.github.io/iptv/languages/ben.m3u", "Bengali"),
        PlaylistSource::new("https://iptv-org.github.io/iptv/languages/eng.m3u", "English"),
    ]
}
fn default_user_agent() -> String { DEFAULT_USER_AGENT.to_string() }
fn default_connect_timeout() -> u64 { 30 }
fn default_request_timeout() -> u64 { 120 }
fn default_player() -> String { "mpv".to_string() }
fn default_true() -> bool { true }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            external_player: default_player(),
            pass_user_agent_to_player: true,
        }
    }
}

/// `<config dir>/channel_deck`, created if missing
pub fn app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    fs::create_dir_all(&path).ok();
    path
}

impl AppConfig {
    fn config_path() -> PathBuf {
        app_dir().join("config.json")
    }

    /// Load the config, writing the defaults out first when no file exists
    /// yet. An unreadable or invalid file is left untouched.
    pub fn load_or_create() -> Self {
        Self::load_or_create_at(&Self::config_path())
    }

    fn load_or_create_at(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path);
            return config;
        }
        Self::load_from(path)
    }

    fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config"),
            }
        }

        Self::default()
    }

    fn save_to(&self, path: &Path) {
        if let Ok(content) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, content);
        }
    }
}
