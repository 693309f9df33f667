use crate::error::SettingsError;
use crate::model;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::surface::SurfaceConfig;

const MIN_BLOCK_EDGE: f32 = 8.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppSettings {
    pub block_size: model::Size,
    pub block_style: model::BlockStyle,
    pub connector_style: model::ConnectorStyle,
    pub highlight: model::Rgba,
    pub hit_threshold: f32,
    pub show_help_on_start: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            block_size: model::Size::default(),
            block_style: model::BlockStyle::default(),
            connector_style: model::ConnectorStyle::default(),
            highlight: model::Rgba::rgb(90, 160, 255),
            hit_threshold: 4.0,
            show_help_on_start: false,
        }
    }
}

impl AppSettings {
    pub(crate) fn surface_config(&self) -> SurfaceConfig {
        let mut block_size = self.block_size;
        if !(block_size.width >= MIN_BLOCK_EDGE && block_size.height >= MIN_BLOCK_EDGE) {
            warn!(
                "block size {}x{} is too small, using the default",
                block_size.width, block_size.height
            );
            block_size = model::Size::default();
        }
        SurfaceConfig {
            block_size,
            block_style: self.block_style,
            connector_style: self.connector_style,
            highlight: self.highlight.to_color32(),
            hit_threshold: self.hit_threshold.max(0.0),
        }
    }
}

/// `$HOME/.config/blockdraw.toml`, then `settings.toml`, then
/// `settings.json` in the working directory.
pub(crate) fn settings_path() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config").join("blockdraw.toml");
        if path.exists() {
            return Some(path);
        }
    }
    ["settings.toml", "settings.json"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

pub(crate) fn load_settings(path: &Path) -> Result<AppSettings, SettingsError> {
    let s = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_settings(path, &s)
}

/// Parses by extension first and falls back to the other format.
pub(crate) fn parse_settings(path: &Path, s: &str) -> Result<AppSettings, SettingsError> {
    let as_toml = || toml::from_str::<AppSettings>(s).map_err(|e| e.to_string());
    let as_json = || serde_json::from_str::<AppSettings>(s).map_err(|e| e.to_string());
    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let parsed = if is_toml {
        as_toml().or_else(|_| as_json())
    } else {
        as_json().or_else(|_| as_toml())
    };
    parsed.map_err(|reason| SettingsError::Parse {
        path: path.display().to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings = parse_settings(
            Path::new("settings.toml"),
            "hit_threshold = 6.5\n\n[block_size]\nwidth = 140.0\nheight = 80.0\n",
        )
        .unwrap();
        assert_eq!(settings.hit_threshold, 6.5);
        assert_eq!(settings.block_size, model::Size::new(140.0, 80.0));
        assert_eq!(settings.block_style, model::BlockStyle::default());
        assert!(!settings.show_help_on_start);
    }

    #[test]
    fn json_is_accepted_under_a_toml_name() {
        let settings = parse_settings(
            Path::new("settings.toml"),
            r#"{ "show_help_on_start": true, "highlight": { "r": 1, "g": 2, "b": 3, "a": 255 } }"#,
        )
        .unwrap();
        assert!(settings.show_help_on_start);
        assert_eq!(settings.highlight, model::Rgba::rgb(1, 2, 3));
    }

    #[rstest]
    #[case("settings.toml")]
    #[case("settings.json")]
    fn garbage_is_a_parse_error(#[case] name: &str) {
        let err = parse_settings(Path::new(name), "block_size = [[[").unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join("blockdraw-no-such-settings.toml");
        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[rstest]
    #[case(model::Size::new(2.0, 60.0))]
    #[case(model::Size::new(100.0, f32::NAN))]
    fn tiny_block_size_falls_back_to_default(#[case] size: model::Size) {
        let settings = AppSettings {
            block_size: size,
            ..AppSettings::default()
        };
        assert_eq!(settings.surface_config().block_size, model::Size::default());
    }

    #[test]
    fn negative_threshold_is_clamped() {
        let settings = AppSettings {
            hit_threshold: -3.0,
            ..AppSettings::default()
        };
        assert_eq!(settings.surface_config().hit_threshold, 0.0);
    }
}
