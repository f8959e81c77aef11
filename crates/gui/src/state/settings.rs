//! Application settings

use serde::{Deserialize, Serialize};

use crate::annotations::LabelStyle;
use crate::i18n::Lang;

/// Grid display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Show grid
    pub visible: bool,
    /// Grid cell size in world units
    pub size: f32,
    /// Number of grid lines in each direction from origin
    pub range: i32,
    /// Grid line opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 0.5,
            range: 10,
            opacity: 0.6,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
        }
    }
}

/// Camera and orbit controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the pending motion applied per frame (0..=1)
    pub damping_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            min_distance: 1.0,
            max_distance: 50.0,
            damping_factor: 0.1,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    pub language: Lang,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Lang::Ru,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub grid: GridSettings,
    pub viewport: ViewportSettings,
    pub camera: CameraSettings,
    /// Dimension label style
    pub labels: LabelStyle,
    pub ui: UiSettings,
}

impl AppSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "shape-viewer", "shape-viewer")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Cannot create config dir {}: {}", dir.display(), e);
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Cannot save settings to {}: {}", path.display(), e);
                }
            }
            Err(e) => tracing::warn!("Cannot serialize settings: {}", e),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
