use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowMeError};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub const API_URL_ENV: &str = "SHOWME_API_URL";
pub const UPSTREAM_URL_ENV: &str = "SHOWME_UPSTREAM_URL";
pub const CONFIG_DIR_ENV: &str = "SHOWME_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            upstream_url: default_upstream_url(),
            page_size: default_page_size(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("showme")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn log_path() -> PathBuf {
    config_dir().join("showme.log")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ShowMeError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

/// Flag, then environment, then settings file.
fn resolve(flag: Option<&str>, env: Option<String>, file: &str) -> String {
    flag.map(str::to_string)
        .or(env.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| file.to_string())
}

/// Base URL of the balance-sheet API the viewer talks to.
pub fn api_url(flag: Option<&str>) -> String {
    resolve(flag, std::env::var(API_URL_ENV).ok(), &load_settings().api_url)
}

/// Base URL of the upstream accounting API the backend proxies.
pub fn upstream_url(flag: Option<&str>) -> String {
    resolve(flag, std::env::var(UPSTREAM_URL_ENV).ok(), &load_settings().upstream_url)
}
