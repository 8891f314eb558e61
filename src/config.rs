//! Application configuration.
//!
//! Read once at startup from a TOML file. A missing file is not an error:
//! the built-in default layout is used instead. Control geometry goes through
//! the same checks the control constructors apply, so a bad layout is
//! reported as a [`ConfigError`] instead of a panic while building the device.
//!
//! ```toml
//! [device]
//! name = "flexi-stick"
//! which = 0
//! poll_interval_ms = 10
//!
//! [[controls]]
//! type = "button"
//! x = 40.0
//! y = 40.0
//! radius = 18.0
//! sticky = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::controls::hat::{check_dead_zone, DEFAULT_HAT_DEAD_ZONE};
use crate::controls::slider::{check_ratio, DEFAULT_SLIDER_RATIO};
use crate::device::event::DeviceId;
use crate::geometry::{checks, Point};

const CONFIG_DIR: &str = "flexistick";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid control #{index}: {reason}")]
    InvalidControl { index: usize, reason: String },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DeviceConfig {
    /// Display name of the simulated device
    pub name: String,
    /// Joystick id stamped on every event
    pub which: DeviceId,
    /// How often the event pump drains the queue
    pub poll_interval_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "flexi-stick".to_string(),
            which: 0,
            poll_interval_ms: 10,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 320.0,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Show a real gamepad next to the simulated one
    pub hardware: bool,
    /// Dead-zone applied to hardware axes
    pub joystick_deadzone: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            hardware: true,
            joystick_deadzone: 0.05,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Result<tracing::Level, ConfigError> {
        self.level.parse().map_err(|_| {
            ConfigError::InvalidSetting(format!("unknown log level '{}'", self.level))
        })
    }
}

fn default_ratio() -> f64 {
    DEFAULT_SLIDER_RATIO
}

fn default_dead_zone() -> f64 {
    DEFAULT_HAT_DEAD_ZONE
}

/// One control of the layout, in canvas coordinates.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlConfig {
    Button {
        x: f64,
        y: f64,
        radius: f64,
        #[serde(default)]
        sticky: bool,
    },
    Slider {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        radius: f64,
        #[serde(default)]
        sticky: bool,
        #[serde(default = "default_ratio")]
        ratio: f64,
    },
    #[serde(rename = "slider2d")]
    Slider2D {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        radius: f64,
        #[serde(default)]
        sticky: bool,
    },
    Hat {
        x: f64,
        y: f64,
        radius: f64,
        #[serde(default)]
        sticky: bool,
        #[serde(default = "default_dead_zone")]
        dead_zone: f64,
    },
}

impl ControlConfig {
    fn validate(&self) -> Result<(), String> {
        match *self {
            ControlConfig::Button { x, y, radius, .. } => {
                checks::point("center", Point::new(x, y))?;
                checks::radius(radius)
            }
            ControlConfig::Hat {
                x,
                y,
                radius,
                dead_zone,
                ..
            } => {
                checks::point("center", Point::new(x, y))?;
                checks::radius(radius)?;
                check_dead_zone(dead_zone)
            }
            ControlConfig::Slider {
                x0,
                y0,
                x1,
                y1,
                radius,
                ratio,
                ..
            } => {
                checks::segment(Point::new(x0, y0), Point::new(x1, y1))?;
                checks::radius(radius)?;
                check_ratio(ratio)
            }
            ControlConfig::Slider2D {
                x0,
                y0,
                x1,
                y1,
                radius,
                ..
            } => {
                checks::rect(Point::new(x0, y0), Point::new(x1, y1))?;
                checks::radius(radius)
            }
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub device: DeviceConfig,
    pub canvas: CanvasConfig,
    pub view: ViewConfig,
    pub logging: LoggingConfig,
    pub controls: Vec<ControlConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            canvas: CanvasConfig::default(),
            view: ViewConfig::default(),
            logging: LoggingConfig::default(),
            controls: default_layout(),
        }
    }
}

/// A stick, a throttle, a hat and four buttons.
fn default_layout() -> Vec<ControlConfig> {
    let mut controls = vec![
        ControlConfig::Slider2D {
            x0: 30.0,
            y0: 290.0,
            x1: 230.0,
            y1: 90.0,
            radius: 10.0,
            sticky: false,
        },
        ControlConfig::Slider {
            x0: 270.0,
            y0: 290.0,
            x1: 270.0,
            y1: 90.0,
            radius: 12.0,
            sticky: false,
            ratio: DEFAULT_SLIDER_RATIO,
        },
        ControlConfig::Hat {
            x: 380.0,
            y: 150.0,
            radius: 50.0,
            sticky: false,
            dead_zone: DEFAULT_HAT_DEAD_ZONE,
        },
    ];
    for (i, x) in [40.0, 100.0, 160.0, 220.0].into_iter().enumerate() {
        controls.push(ControlConfig::Button {
            x,
            y: 40.0,
            radius: 20.0,
            sticky: i == 3,
        });
    }
    controls
}

impl AppConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content, path)?;
        info!(
            "Loaded config from {} with {} controls",
            path.display(),
            config.controls.len()
        );
        Ok(config)
    }

    /// Loads `path`, or the default layout if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("No config at {}, using default layout", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidSetting(
                "device.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(ConfigError::InvalidSetting(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if !(0.0..1.0).contains(&self.view.joystick_deadzone) {
            return Err(ConfigError::InvalidSetting(format!(
                "view.joystick_deadzone must be in [0, 1), got {}",
                self.view.joystick_deadzone
            )));
        }
        self.logging.level()?;
        for (index, control) in self.controls.iter().enumerate() {
            control
                .validate()
                .map_err(|reason| ConfigError::InvalidControl { index, reason })?;
        }
        Ok(())
    }
}

/// `<config dir>/flexistick/config.toml`, falling back to the working
/// directory when the platform has no config dir.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| {
        warn!("Could not determine config directory, using current directory");
        PathBuf::from(".")
    });
    path.push(CONFIG_DIR);
    path.push(CONFIG_FILE);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [device]
        name = "test-stick"
        which = 4

        [logging]
        level = "debug"

        [[controls]]
        type = "button"
        x = 10.0
        y = 10.0
        radius = 5.0

        [[controls]]
        type = "slider"
        x0 = 0.0
        y0 = 0.0
        x1 = 0.0
        y1 = 100.0
        radius = 6.0
        sticky = true

        [[controls]]
        type = "slider2d"
        x0 = 0.0
        y0 = 0.0
        x1 = 50.0
        y1 = 50.0
        radius = 4.0

        [[controls]]
        type = "hat"
        x = 200.0
        y = 50.0
        radius = 30.0
        dead_zone = 0.1
    "#;

    #[test]
    fn test_parse_sample() {
        let config =
            AppConfig::from_toml(SAMPLE, Path::new("sample.toml")).expect("valid config");
        assert_eq!(config.device.name, "test-stick");
        assert_eq!(config.device.which, 4);
        assert_eq!(config.device.poll_interval_ms, 10);
        assert_eq!(config.canvas, CanvasConfig::default());
        assert_eq!(config.logging.level().ok(), Some(tracing::Level::DEBUG));
        assert_eq!(config.controls.len(), 4);
        assert_eq!(
            config.controls[1],
            ControlConfig::Slider {
                x0: 0.0,
                y0: 0.0,
                x1: 0.0,
                y1: 100.0,
                radius: 6.0,
                sticky: true,
                ratio: DEFAULT_SLIDER_RATIO,
            }
        );
        assert!(matches!(
            config.controls[3],
            ControlConfig::Hat { dead_zone, .. } if dead_zone == 0.1
        ));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = AppConfig::from_toml("", Path::new("empty.toml")).expect("valid config");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_default_layout_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_radius_is_rejected() {
        let toml = r#"
            [[controls]]
            type = "button"
            x = 1.0
            y = 1.0
            radius = 5.0

            [[controls]]
            type = "hat"
            x = 1.0
            y = 1.0
            radius = 0.0
        "#;
        let err = AppConfig::from_toml(toml, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidControl { index: 1, .. }));
    }

    #[test]
    fn test_degenerate_slider_is_rejected() {
        let toml = r#"
            [[controls]]
            type = "slider"
            x0 = 3.0
            y0 = 3.0
            x1 = 3.0
            y1 = 3.0
            radius = 5.0
        "#;
        assert!(matches!(
            AppConfig::from_toml(toml, Path::new("bad.toml")),
            Err(ConfigError::InvalidControl { index: 0, .. })
        ));
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        let toml = r#"
            [[controls]]
            type = "slider"
            x0 = nan
            y0 = 0.0
            x1 = 100.0
            y1 = 0.0
            radius = 5.0

            [[controls]]
            type = "slider2d"
            x0 = 0.0
            y0 = 0.0
            x1 = inf
            y1 = 50.0
            radius = 5.0
        "#;
        let config: AppConfig = toml::from_str(toml).expect("nan and inf are valid TOML");
        assert!(config.controls[0].validate().is_err());
        assert!(config.controls[1].validate().is_err());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidControl { index: 0, .. })
        ));
    }

    #[test]
    fn test_tiny_slider_track_is_rejected() {
        // both components exceed EPSILON, the squared length does not
        let toml = r#"
            [[controls]]
            type = "slider"
            x0 = 0.0
            y0 = 0.0
            x1 = 1e-9
            y1 = 1e-9
            radius = 5.0
        "#;
        assert!(matches!(
            AppConfig::from_toml(toml, Path::new("bad.toml")),
            Err(ConfigError::InvalidControl { index: 0, .. })
        ));
    }

    #[test]
    fn test_non_finite_button_center_is_rejected() {
        let toml = r#"
            [[controls]]
            type = "button"
            x = -inf
            y = 10.0
            radius = 5.0
        "#;
        assert!(matches!(
            AppConfig::from_toml(toml, Path::new("bad.toml")),
            Err(ConfigError::InvalidControl { index: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_control_type_is_parse_error() {
        let toml = r#"
            [[controls]]
            type = "wheel"
            x = 1.0
        "#;
        assert!(matches!(
            AppConfig::from_toml(toml, Path::new("bad.toml")),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_bad_log_level_is_rejected() {
        let toml = "[logging]\nlevel = \"chatty\"\n";
        assert!(matches!(
            AppConfig::from_toml(toml, Path::new("bad.toml")),
            Err(ConfigError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = std::env::temp_dir().join("flexistick-does-not-exist/config.toml");
        let config = AppConfig::load_or_default(&path).expect("default config");
        assert_eq!(config.controls.len(), 7);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("flexistick-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("config.toml");
        std::fs::write(&path, SAMPLE).expect("write sample");
        let config = AppConfig::load_or_default(&path).expect("valid config");
        assert_eq!(config.device.which, 4);
        std::fs::remove_dir_all(&dir).ok();
    }
}
