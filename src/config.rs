use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub trash: TrashConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Where freshly imported shoots live, one directory per shoot.
    #[serde(default = "default_culling_root")]
    pub culling_root: PathBuf,

    /// Root of the dated tree finished culls move into.
    #[serde(default = "default_edit_root")]
    pub edit_root: PathBuf,
}

fn pictures_dir() -> PathBuf {
    dirs::picture_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_culling_root() -> PathBuf {
    pictures_dir().join("culling")
}

fn default_edit_root() -> PathBuf {
    pictures_dir().join("edit")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            culling_root: default_culling_root(),
            edit_root: default_edit_root(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Extensions scanned first; the fallback set is only consulted when
    /// none of these match.
    #[serde(default = "default_raw_extensions")]
    pub raw_extensions: Vec<String>,

    #[serde(default = "default_fallback_extensions")]
    pub fallback_extensions: Vec<String>,

    /// Capture-time gap (seconds) that starts a new burst group.
    #[serde(default = "default_burst_gap_secs")]
    pub burst_gap_secs: i64,
}

fn default_raw_extensions() -> Vec<String> {
    vec![
        "arw".to_string(),
        "cr2".to_string(),
        "cr3".to_string(),
        "nef".to_string(),
        "dng".to_string(),
        "raf".to_string(),
        "orf".to_string(),
        "rw2".to_string(),
    ]
}

fn default_fallback_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
}

fn default_burst_gap_secs() -> i64 {
    2
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            raw_extensions: default_raw_extensions(),
            fallback_extensions: default_fallback_extensions(),
            burst_gap_secs: default_burst_gap_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Most thumbnails rendered at once.
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,

    /// Thumbnails kept before the cursor when its group is clipped.
    #[serde(default = "default_look_behind")]
    pub look_behind: usize,
}

fn default_max_visible() -> usize {
    25
}

fn default_look_behind() -> usize {
    10
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_visible: default_max_visible(),
            look_behind: default_look_behind(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageProtocol {
    #[default]
    Auto,
    Sixel,
    Kitty,
    ITerm2,
    Halfblocks,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_enabled")]
    pub image_preview: bool,

    #[serde(default)]
    pub protocol: ImageProtocol,

    /// Long-edge pixel size of generated previews.
    #[serde(default = "default_max_edge")]
    pub max_edge: u32,
}

fn default_preview_enabled() -> bool {
    true
}

fn default_max_edge() -> u32 {
    1600
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            image_preview: default_preview_enabled(),
            protocol: ImageProtocol::default(),
            max_edge: default_max_edge(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashConfig {
    #[serde(default = "default_trash_path")]
    pub path: PathBuf,
}

fn default_trash_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("culpho/.trash")
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            path: default_trash_path(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // First run: write the defaults so they are easy to edit.
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CULPHO_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("culpho")
            .join("config.toml")
    }
}
