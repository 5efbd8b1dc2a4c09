use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub storage: StorageConfig,
    pub thumbnails: ThumbnailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub thumbnail_path: PathBuf,
}

/// Target box for a named preset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresetSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    pub max_image_bytes: usize,
    pub accepted_content_types: Vec<String>,
    pub default_preset: String,
    pub presets: HashMap<String, PresetSize>,
}

impl ThumbnailConfig {
    /// Check whether a declared content-type is accepted for upload.
    ///
    /// Parameters (`; charset=...`) are stripped and the comparison is
    /// case-insensitive, so `image/PNG; foo=bar` matches `image/png`.
    pub fn is_content_type_accepted(&self, content_type: &str) -> bool {
        let normalized = normalize_content_type(content_type);
        self.accepted_content_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(&normalized))
    }
}

/// Strip parameters and lowercase a content-type string.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            storage: StorageConfig {
                thumbnail_path: PathBuf::from("./data/thumbnails"),
            },
            thumbnails: ThumbnailConfig {
                max_image_bytes: 5 * 1024 * 1024,
                accepted_content_types: vec![
                    "image/jpeg".to_string(),
                    "image/png".to_string(),
                    "image/webp".to_string(),
                ],
                default_preset: "medium".to_string(),
                presets: HashMap::from([
                    (
                        "small".to_string(),
                        PresetSize {
                            width: 64,
                            height: 64,
                        },
                    ),
                    (
                        "medium".to_string(),
                        PresetSize {
                            width: 256,
                            height: 256,
                        },
                    ),
                    (
                        "large".to_string(),
                        PresetSize {
                            width: 1024,
                            height: 1024,
                        },
                    ),
                ]),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::create_dir_all(&default_config.storage.thumbnail_path)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }
}
