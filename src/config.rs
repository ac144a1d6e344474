//! User settings shared by every tutorial program.
//!
//! Settings live in a JSON file. `$LEARNGL_SETTINGS` overrides the location, otherwise
//! `<config dir>/learngl/settings.json` is used. A missing file means defaults, and
//! every field may be omitted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const SETTINGS_ENV: &str = "LEARNGL_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "LearnOpenGL".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees per pixel of mouse movement.
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    /// Root directory textures and models are resolved against.
    pub asset_dir: PathBuf,
    /// Model opened by `model_loading` when no path is passed on the command line.
    pub default_model: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            asset_dir: PathBuf::from("assets"),
            default_model: PathBuf::from("models/crate/crate.obj"),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Where the settings file is expected, if a location can be determined at all.
    pub fn locate() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("learngl").join("settings.json"))
    }

    /// Loads the settings from [`Settings::locate`], falling back to defaults.
    pub fn load() -> Result<Self> {
        match Self::locate() {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads the settings at `path`. A missing file yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolves a path relative to the asset directory.
    pub fn asset(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.asset_dir.join(relative)
    }

    /// The configured log level, `Info` if it does not parse.
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "window": { "width": 800 }, "log_level": "debug" }"#)
                .unwrap();
        assert_eq!(settings.window.width, 800);
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.window.title, "LearnOpenGL");
        assert_eq!(settings.camera, CameraSettings::default());
        assert_eq!(settings.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_bad_log_level_falls_back_to_info() {
        let settings = Settings {
            log_level: "loud".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("learngl-settings-does-not-exist.json");
        assert_eq!(Settings::from_path(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "learngl-settings-malformed-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ window: ").unwrap();
        let result = Settings::from_path(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(Error::Settings { .. })));
    }

    #[test]
    fn test_env_var_overrides_location() {
        // The only test that touches the variable; the previous value is restored.
        let previous = std::env::var_os(SETTINGS_ENV);
        let path = std::env::temp_dir().join(format!(
            "learngl-settings-env-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "asset_dir": "/opt/learngl", "camera": { "fov": 60 } }"#)
            .unwrap();

        unsafe { std::env::set_var(SETTINGS_ENV, &path) };
        let located = Settings::locate();
        let loaded = Settings::load();
        match previous {
            Some(value) => unsafe { std::env::set_var(SETTINGS_ENV, value) },
            None => unsafe { std::env::remove_var(SETTINGS_ENV) },
        }
        std::fs::remove_file(&path).ok();

        assert_eq!(located, Some(path));
        let loaded = loaded.unwrap();
        assert_eq!(loaded.asset_dir, PathBuf::from("/opt/learngl"));
        assert_eq!(loaded.camera.fov, 60.0);
        assert_eq!(loaded.window, WindowSettings::default());
    }

    #[test]
    fn test_asset_paths_are_relative_to_asset_dir() {
        let settings = Settings::default();
        assert_eq!(
            settings.asset("textures/wall.jpg"),
            PathBuf::from("assets/textures/wall.jpg")
        );
    }
}
