use log::LevelFilter;
use serde::Deserialize;
use tessera_graphic::{Color, ResolutionStyle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Engine settings, every field is optional in YAML
///
/// ```yaml
/// title: Tower
/// width: 320
/// height: 180
/// resolution_style: ContainInteger
/// clear_color: [0.1, 0.1, 0.2, 1.0]
/// debug: true
/// log_level: debug
/// target_fps: 60
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    /// Width of the off-screen buffer the scene is rendered into
    pub width: u32,
    pub height: u32,
    pub resolution_style: ResolutionStyle,
    pub clear_color: Color,
    pub border_color: Color,
    /// Draws the debug overlay of every entity
    pub debug: bool,
    pub log_level: LevelFilter,
    /// Caps the frame delta to `1 / target_fps` seconds
    pub target_fps: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_owned(),
            width: 320,
            height: 180,
            resolution_style: ResolutionStyle::Contain,
            clear_color: Color::BLACK,
            border_color: Color::BLACK,
            debug: false,
            log_level: LevelFilter::Info,
            target_fps: Some(60),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml(
            "
title: Tower
width: 256
resolution_style: FillInteger
clear_color: [1.0, 0.5, 0.0, 1.0]
log_level: debug
target_fps: ~
",
        )
        .unwrap();

        assert_eq!(config.title, "Tower");
        assert_eq!(config.width, 256);
        assert_eq!(config.height, 180);
        assert_eq!(config.resolution_style, ResolutionStyle::FillInteger);
        assert_eq!(config.clear_color, Color::new(1.0, 0.5, 0.0, 1.0));
        assert_eq!(config.border_color, Color::BLACK);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.target_fps, None);
        assert!(!config.debug);
    }

    #[test]
    fn colors_are_clamped() {
        let config = EngineConfig::from_yaml("border_color: [2.0, -1.0, 0.5, 1.0]").unwrap();

        assert_eq!(config.border_color, Color::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let error = EngineConfig::from_yaml("width: wide").unwrap_err();

        assert!(matches!(error, ConfigError::Yaml(_)));
        assert!(error.to_string().starts_with("invalid engine configuration"));
    }
}
