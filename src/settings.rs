//! Persistent settings for the issues browser.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A saved issue search. The label becomes the top grouping key in the
/// sidebar tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub label: String,
    /// GitHub search syntax, e.g. `"is:open assignee:@me repo:owner/name"`.
    pub query: String,
    /// Bucket this query's results under milestone headings.
    #[serde(default)]
    pub group_by_milestone: bool,
}

impl SavedQuery {
    pub fn new(label: &str, query: &str) -> Self {
        Self {
            label: label.to_string(),
            query: query.to_string(),
            group_by_milestone: false,
        }
    }
}

/// All persistable settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_queries")]
    pub queries: Vec<SavedQuery>,

    /// Personal access token; unauthenticated search rate limits are tight.
    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_refresh_mins")]
    pub refresh_mins: u64,

    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: f32,
}

fn default_queries() -> Vec<SavedQuery> {
    vec![
        SavedQuery::new("My Issues", "is:open is:issue assignee:@me"),
        SavedQuery::new("Created Issues", "is:open is:issue author:@me"),
    ]
}

fn default_refresh_mins() -> u64 {
    5
}

fn default_sidebar_width() -> f32 {
    320.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            queries: default_queries(),
            auth_token: None,
            refresh_mins: default_refresh_mins(),
            sidebar_width: default_sidebar_width(),
        }
    }
}

impl Settings {
    /// Get the path to the settings file
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("issues-native");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, returning defaults if file doesn't exist or is invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist yet, that's fine
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory, settings not saved");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to write settings file: {}", e);
                } else {
                    tracing::info!("Saved settings to {:?}", path);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to serialize settings: {}", e);
            }
        }
    }
}
