// ─── Launch Context ───
// Per-launch directories and runtime environment.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::core::config::{LaunchSettings, Resolution};
use crate::core::platform::{Arch, Platform};

use super::rules::{FeatureSet, RuleEnvironment};

/// Everything about the current launch attempt that is not manifest data.
/// Built once per launch.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub game_dir: PathBuf,
    pub common_dir: PathBuf,
    /// Fresh staging directory for extracted natives, unique per launch.
    pub natives_dir: PathBuf,
    pub platform: Platform,
    pub arch: Arch,
    /// OS release string matched by `rules[].os.version`.
    pub os_release: String,
    pub resolution: Resolution,
    pub fullscreen: bool,
}

impl LaunchContext {
    /// Derive the context for `server_id` on the machine running this process.
    pub fn new(settings: &LaunchSettings, server_id: &str) -> Self {
        let os_release = current_os_release();
        let natives_dir = fresh_natives_dir(&std::env::temp_dir(), &settings.temp_native_folder);
        debug!("Native staging directory: {:?}", natives_dir);

        Self {
            game_dir: settings.instance_dir.join(server_id),
            common_dir: settings.common_dir.clone(),
            natives_dir,
            platform: Platform::current(),
            arch: Arch::current(),
            os_release,
            resolution: settings.resolution,
            fullscreen: settings.fullscreen,
        }
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.common_dir.join("libraries")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.common_dir.join("assets")
    }

    /// `<common>/modstore/<server>/required/`, always ending in a separator.
    pub fn required_mods_dir(&self, server_id: &str) -> String {
        let dir = self.common_dir.join("modstore").join(server_id).join("required");
        format!("{}{}", dir.to_string_lossy(), std::path::MAIN_SEPARATOR)
    }

    pub fn rule_environment(&self) -> RuleEnvironment {
        RuleEnvironment {
            platform: self.platform,
            arch: self.arch,
            os_release: self.os_release.clone(),
            // A resolution is always configured, so every launch requests one.
            features: FeatureSet {
                has_custom_resolution: true,
            },
            fullscreen: self.fullscreen,
        }
    }
}

/// First build number of each Windows NT version, newest first.
const WINDOWS_NT_VERSIONS: [(u32, &str); 5] = [
    (10240, "10.0"),
    (9600, "6.3"),
    (9200, "6.2"),
    (7600, "6.1"),
    (6000, "6.0"),
];

/// Release string in the `major.minor.build` form that `os.version` rules
/// are written against.
fn current_os_release() -> String {
    let kernel = sysinfo::System::kernel_version().unwrap_or_default();
    match Platform::current() {
        Platform::Windows => windows_release(&kernel),
        _ => kernel,
    }
}

/// Windows only reports its build number; prefix the NT version it belongs to.
pub fn windows_release(build: &str) -> String {
    let build = build.trim();
    let Ok(number) = build.parse::<u32>() else {
        return build.to_string();
    };
    let nt = WINDOWS_NT_VERSIONS
        .iter()
        .find(|(since, _)| number >= *since)
        .map(|(_, nt)| *nt)
        .unwrap_or("5.1");
    format!("{}.{}", nt, number)
}

/// `<base>/<folder>/<random token>`
pub fn fresh_natives_dir(base: &Path, folder: &str) -> PathBuf {
    base.join(folder).join(Uuid::new_v4().simple().to_string())
}
