use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

const APP_DIR_NAME: &str = "InterfaceOficial";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Launch-related settings owned by the configuration store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// Passed through as `-Xms<min_ram>`, e.g. `"2G"`.
    pub min_ram: String,
    /// Passed through as `-Xmx<max_ram>`.
    pub max_ram: String,
    pub jvm_options: Vec<String>,
    pub resolution: Resolution,
    pub fullscreen: bool,
    pub java8_executable: PathBuf,
    pub java17_executable: PathBuf,
    pub launch_detached: bool,
    /// Parent of every per-server game directory.
    pub instance_dir: PathBuf,
    /// Shared libraries/assets/versions/modstore root.
    pub common_dir: PathBuf,
    /// Folder under the system temp dir holding native staging directories.
    pub temp_native_folder: String,
    /// Dock icon used on macOS.
    pub dock_icon: Option<PathBuf>,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            min_ram: "2G".into(),
            max_ram: "4G".into(),
            jvm_options: vec![
                "-XX:+UseConcMarkSweepGC".into(),
                "-XX:+CMSIncrementalMode".into(),
                "-XX:-UseAdaptiveSizePolicy".into(),
                "-Xmn128M".into(),
            ],
            resolution: Resolution::default(),
            fullscreen: false,
            java8_executable: PathBuf::from(java_binary_name()),
            java17_executable: PathBuf::from(java_binary_name()),
            launch_detached: true,
            instance_dir: data_dir.join("instances"),
            common_dir: data_dir.join("common"),
            temp_native_folder: "WCNatives".into(),
            dock_icon: None,
        }
    }
}

impl LaunchSettings {
    /// Read settings from a JSON file. A missing file yields defaults;
    /// missing fields fall back to their defaults.
    pub fn load(path: &Path) -> LauncherResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(LauncherError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// `<common>/versions/<id>/<id>.jar`
    pub fn version_jar(&self, version_id: &str) -> PathBuf {
        self.common_dir
            .join("versions")
            .join(version_id)
            .join(format!("{}.jar", version_id))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn java_binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "javaw.exe"
    } else {
        "java"
    }
}
