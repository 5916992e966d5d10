// ─── Version Era ───
// Decides which argument schema a Minecraft version uses.

use std::cmp::Ordering;
use std::fmt;

use crate::core::error::{LauncherError, LauncherResult};

/// First release using the templated `arguments` block.
pub const TEMPLATED_ARGUMENTS_SINCE: MinecraftVersion = MinecraftVersion::new(1, 13, 0);

/// Numeric release id such as `1.12.2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinecraftVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl MinecraftVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `major.minor[.patch][-suffix]`.
    ///
    /// Snapshot ids and anything else without two numeric components are
    /// rejected as an unsupported schema.
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let unsupported = || LauncherError::UnsupportedVersionSchema(raw.to_string());

        let release = raw.trim().split('-').next().unwrap_or_default();
        let parts = release
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                part.parse::<u32>().ok()
            })
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(unsupported)?;

        match parts.as_slice() {
            [major, minor] => Ok(Self::new(*major, *minor, 0)),
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            _ => Err(unsupported()),
        }
    }

    pub fn at_least(&self, other: &MinecraftVersion) -> bool {
        self >= other
    }
}

impl PartialOrd for MinecraftVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinecraftVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for MinecraftVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Argument schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentEra {
    /// Pre-1.13: flat flag list built by hand.
    Legacy,
    /// 1.13+: rule-annotated templates with `${...}` placeholders.
    Templated,
}

impl ArgumentEra {
    pub fn for_version(minecraft_version: &str) -> LauncherResult<Self> {
        let version = MinecraftVersion::parse(minecraft_version)?;
        Ok(if version.at_least(&TEMPLATED_ARGUMENTS_SINCE) {
            ArgumentEra::Templated
        } else {
            ArgumentEra::Legacy
        })
    }
}
