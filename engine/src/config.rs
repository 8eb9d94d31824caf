use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub overlay: OverlaySettings,
}

/// Playback engine settings.
///
/// Updatable between starts; an armed display countdown keeps the delay it
/// was armed with.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Seconds each image or animated image stays on screen
    #[serde(default = "default_photo_delay")]
    pub photo_delay_secs: u64,

    /// Silence video audio regardless of volume
    #[serde(default)]
    pub mute_video: bool,

    /// Video volume, 0.0 to 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Wrap to the first item after the last one finishes
    #[serde(default = "default_true")]
    pub repeat: bool,

    /// Optional media sources (files, directories, glob patterns) to scan
    /// into the initial playlist
    #[serde(default)]
    pub sources: Vec<String>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            photo_delay_secs: default_photo_delay(),
            mute_video: false,
            volume: default_volume(),
            repeat: true,
            sources: Vec::new(),
        }
    }
}

fn default_photo_delay() -> u64 {
    10
}
fn default_volume() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}

/// Fullscreen overlay dimensions used by the presentation shell
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverlaySettings {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    1920 // FHD
}
fn default_height() -> u32 {
    1080
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded configuration from {}", path.display());
        config.validate()?;

        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("kioskshow");

        Ok(config_dir.join("config.toml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.playback.validate()?;

        if self.overlay.width == 0 || self.overlay.height == 0 {
            anyhow::bail!(
                "Invalid overlay size: {}x{} (both dimensions must be positive)",
                self.overlay.width,
                self.overlay.height
            );
        }

        Ok(())
    }
}

impl PlaybackSettings {
    /// Validate playback settings
    pub fn validate(&self) -> Result<()> {
        if self.photo_delay_secs == 0 {
            anyhow::bail!("Invalid photo delay: must be at least 1 second");
        }

        if !(0.0..=1.0).contains(&self.volume) {
            anyhow::bail!("Invalid volume: {} (expected 0.0 to 1.0)", self.volume);
        }

        Ok(())
    }

    /// Volume to hand to the video surface, with the mute flag folded in
    pub fn effective_volume(&self) -> f32 {
        if self.mute_video { 0.0 } else { self.volume }
    }
}
