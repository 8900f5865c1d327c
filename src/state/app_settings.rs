use crate::locale::Locale;
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const APP_DIR: &str = "picklescore";
pub const SETTINGS_FILE: &str = "settings.json";
pub const LOG_ENV: &str = "PICKLESCORE_LOG";
pub const CONFIG_DIR_ENV: &str = "PICKLESCORE_CONFIG_DIR";

pub const MIN_FONT_LEVEL: u8 = 1;
pub const MAX_FONT_LEVEL: u8 = 5;
pub const DEFAULT_FONT_LEVEL: u8 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub locale: Locale,
    pub compact_mode: bool,
    pub score_font_level: u8,
    /// Prefix for share links. Empty means share the bare payload.
    pub share_base_url: String,
    pub config_dir: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            locale: Locale::default(),
            compact_mode: false,
            score_font_level: DEFAULT_FONT_LEVEL,
            share_base_url: String::new(),
            config_dir: PathBuf::from("."),
        }
    }
}

/// On-disk shape of `settings.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SettingsFile {
    locale: Locale,
    compact_mode: bool,
    score_font_level: Option<u8>,
    log_level: Option<String>,
    share_base_url: String,
}

impl AppSettings {
    pub fn load() -> Self {
        let mut settings = Self::load_from(&config_dir());
        if let Ok(level) = std::env::var(LOG_ENV)
            && let Ok(level) = LevelFilter::from_str(level.trim())
        {
            settings.log_level = Some(level);
        }
        settings
    }

    /// Missing or malformed settings fall back to defaults.
    pub fn load_from(dir: &Path) -> Self {
        let mut settings = Self {
            config_dir: dir.to_path_buf(),
            ..Self::default()
        };
        let path = dir.join(SETTINGS_FILE);
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<SettingsFile>(&content) {
                Ok(file) => file,
                Err(e) => {
                    warn!("ignoring malformed {}: {e}", path.display());
                    return settings;
                }
            },
            Err(_) => return settings,
        };

        settings.locale = file.locale;
        settings.compact_mode = file.compact_mode;
        settings.score_font_level = file
            .score_font_level
            .unwrap_or(DEFAULT_FONT_LEVEL)
            .clamp(MIN_FONT_LEVEL, MAX_FONT_LEVEL);
        settings.log_level = file
            .log_level
            .as_deref()
            .and_then(|l| LevelFilter::from_str(l.trim()).ok());
        settings.share_base_url = file.share_base_url.trim().to_string();
        settings
    }

    pub fn save(&self) -> Result<(), String> {
        let file = SettingsFile {
            locale: self.locale,
            compact_mode: self.compact_mode,
            score_font_level: Some(self.score_font_level),
            log_level: self.log_level.map(|l| l.to_string()),
            share_base_url: self.share_base_url.clone(),
        };
        std::fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("create dir failed: {e}"))?;
        let payload = serde_json::to_string_pretty(&file)
            .map_err(|e| format!("serialize settings failed: {e}"))?;
        std::fs::write(self.config_dir.join(SETTINGS_FILE), payload)
            .map_err(|e| format!("write settings failed: {e}"))
    }

    /// Score glyph size after the compact-mode shrink.
    pub fn effective_font_level(&self) -> u8 {
        let shift = u8::from(self.compact_mode);
        self.score_font_level.saturating_sub(shift).max(MIN_FONT_LEVEL)
    }

    pub fn increase_font(&mut self) -> bool {
        let next = (self.score_font_level + 1).min(MAX_FONT_LEVEL);
        let changed = next != self.score_font_level;
        self.score_font_level = next;
        changed
    }

    pub fn decrease_font(&mut self) -> bool {
        let next = self.score_font_level.saturating_sub(1).max(MIN_FONT_LEVEL);
        let changed = next != self.score_font_level;
        self.score_font_level = next;
        changed
    }
}

pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join(APP_DIR);
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    PathBuf::from(".")
}
