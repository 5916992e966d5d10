// ─── Platform ───
// Operating system family and CPU architecture as seen by version manifests.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Osx,
    Linux,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Osx
        } else {
            Platform::Linux
        }
    }

    /// Canonical name used in `rules[].os.name` and `natives` maps.
    pub fn mojang_name(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Osx => "osx",
            Platform::Linux => "linux",
        }
    }

    /// Separator between classpath (and other path-list) entries.
    pub fn classpath_separator(self) -> &'static str {
        match self {
            Platform::Windows => ";",
            _ => ":",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mojang_name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    X86,
    Arm64,
}

impl Arch {
    pub fn current() -> Self {
        if cfg!(target_arch = "aarch64") {
            Arch::Arm64
        } else if cfg!(target_pointer_width = "64") {
            Arch::X64
        } else {
            Arch::X86
        }
    }

    /// Token substituted for `${arch}` in native classifier names.
    pub fn bitness_token(self) -> &'static str {
        match self {
            Arch::X86 => "32",
            Arch::X64 | Arch::Arm64 => "64",
        }
    }

    /// Name used in `rules[].os.arch`.
    pub fn mojang_name(self) -> &'static str {
        match self {
            Arch::X64 => "x86_64",
            Arch::X86 => "x86",
            Arch::Arm64 => "arm64",
        }
    }
}
