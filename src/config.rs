//! Configuration for the frame decorations
//!
//! Loads configuration from TOML file at `~/.config/area/frame.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::wm::frame::decorations::TitleLayout;
use crate::wm::style::{Justify, RenderStyle, Texture, TexturePair};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: StyleConfig,
    pub colors: ColorConfig,
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            // Auto-generate default config file
            if let Err(e) = Self::save_default(&config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        info!("Configuration loaded from {:?}", path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("area");

        Ok(config_dir.join("frame.toml"))
    }

    /// Save default configuration to file
    pub fn save_default(path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;

        fs::write(path, toml_string)
            .context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }

    /// The style frames are decorated with
    pub fn to_style(&self) -> RenderStyle {
        let s = &self.style;
        let c = &self.colors;
        let pair = |focused: &Texture, unfocused: &Texture, bg: [u32; 2]| TexturePair {
            focused: Texture {
                color: bg[0],
                ..*focused
            },
            unfocused: Texture {
                color: bg[1],
                ..*unfocused
            },
        };
        let base = RenderStyle::default();

        RenderStyle {
            frame_border_width: s.frame_border_width,
            client_border_width: s.client_border_width,
            bevel: s.bevel,
            button_size: s.button_size,
            handle_height: s.handle_height,
            font: s.font.clone(),
            font_height: s.font_height,
            font_char_width: s.font_char_width,
            label_justify: s.label_justify,
            frame_border_color: c.frame_border,
            client_border_color: c.client_border,
            title: pair(&base.title.focused, &base.title.unfocused, c.title),
            label: pair(&base.label.focused, &base.label.unfocused, c.label),
            handle: pair(&base.handle.focused, &base.handle.unfocused, c.handle),
            grip: pair(&base.grip.focused, &base.grip.unfocused, c.grip),
            button: pair(&base.button.focused, &base.button.unfocused, c.button),
            text_focus: c.text[0],
            text_unfocus: c.text[1],
        }
        .clamped()
    }

    /// Parsed titlebar layout
    pub fn title_layout(&self) -> Result<TitleLayout> {
        TitleLayout::parse(&self.style.title_layout)
            .with_context(|| format!("Bad title_layout {:?}", self.style.title_layout))
    }
}

/// Frame metrics and label font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub frame_border_width: u32,
    pub client_border_width: u32,
    pub bevel: u32,
    pub button_size: u32,
    pub handle_height: u32,
    /// X core font name
    pub font: String,
    pub font_height: u32,
    /// Advance per character when the font can't be loaded
    pub font_char_width: u32,
    pub label_justify: Justify,
    /// Titlebar elements left to right: I(conify) M(aximize) C(lose)
    /// S(ticky) L(abel). A reload only changes windows framed after it.
    pub title_layout: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            frame_border_width: style.frame_border_width,
            client_border_width: style.client_border_width,
            bevel: style.bevel,
            button_size: style.button_size,
            handle_height: style.handle_height,
            font: style.font,
            font_height: style.font_height,
            font_char_width: style.font_char_width,
            label_justify: style.label_justify,
            title_layout: "ILMC".to_string(),
        }
    }
}

/// Pixel values; pairs are `[focused, unfocused]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub frame_border: u32,
    pub client_border: u32,
    pub title: [u32; 2],
    pub label: [u32; 2],
    pub handle: [u32; 2],
    pub grip: [u32; 2],
    pub button: [u32; 2],
    pub text: [u32; 2],
}

impl Default for ColorConfig {
    fn default() -> Self {
        let style = RenderStyle::default();
        let pair = |p: &TexturePair| [p.focused.color, p.unfocused.color];
        Self {
            frame_border: style.frame_border_color,
            client_border: style.client_border_color,
            title: pair(&style.title),
            label: pair(&style.label),
            handle: pair(&style.handle),
            grip: pair(&style.grip),
            button: pair(&style.button),
            text: [style.text_focus, style.text_unfocus],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_matches_default_style() {
        let config = Config::default();
        assert_eq!(config.to_style(), RenderStyle::default());
        assert_eq!(config.title_layout().unwrap(), TitleLayout::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[style]
bevel = 3
font = "9x15"
label_justify = "center"
title_layout = "LC"

[colors]
label = [0x112233, 0x445566]
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        let style = config.to_style();
        assert_eq!(style.bevel, 3);
        assert_eq!(style.font, "9x15");
        assert_eq!(style.label_justify, Justify::Center);
        assert_eq!(style.label.focused.color, 0x112233);
        assert_eq!(style.label.unfocused.color, 0x445566);
        // untouched keys keep their defaults
        assert_eq!(style.button_size, RenderStyle::default().button_size);
        assert_eq!(config.title_layout().unwrap().buttons().len(), 1);
    }

    #[test]
    fn test_zero_metrics_are_clamped() {
        let mut config = Config::default();
        config.style.font_height = 0;
        config.style.button_size = 0;
        config.style.handle_height = 0;
        let style = config.to_style();
        assert_eq!(style.font_height, 1);
        assert_eq!(style.button_size, 1);
        assert_eq!(style.handle_height, 1);
    }

    #[test]
    fn test_bad_layout_and_bad_toml_fail() {
        let mut config = Config::default();
        config.style.title_layout = "IMC".into();
        assert!(config.title_layout().is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[style]\nbevel = \"wide\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_save_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("area").join("frame.toml");
        Config::save_default(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
