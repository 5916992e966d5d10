// ─── Java Runtime Selection ───
// Picks the configured Java executable for a Minecraft version.

use std::path::Path;

use crate::core::config::LaunchSettings;
use crate::core::error::LauncherResult;
use crate::core::version::MinecraftVersion;

/// First release that needs a Java 17 runtime in this launcher.
pub const JAVA17_SINCE: MinecraftVersion = MinecraftVersion::new(1, 16, 0);

pub fn required_java_major(minecraft_version: &str) -> LauncherResult<u32> {
    let version = MinecraftVersion::parse(minecraft_version)?;
    Ok(if version.at_least(&JAVA17_SINCE) { 17 } else { 8 })
}

/// Executable configured for the runtime the version needs.
pub fn select_java_executable<'a>(
    settings: &'a LaunchSettings,
    minecraft_version: &str,
) -> LauncherResult<&'a Path> {
    Ok(match required_java_major(minecraft_version)? {
        17 => settings.java17_executable.as_path(),
        _ => settings.java8_executable.as_path(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn java_major_detection() {
        assert_eq!(required_java_major("1.20.1").unwrap(), 17);
        assert_eq!(required_java_major("1.16").unwrap(), 17);
        assert_eq!(required_java_major("1.12.2").unwrap(), 8);
        assert!(required_java_major("21w37a").is_err());
    }

    #[test]
    fn selects_configured_executable() {
        let settings = LaunchSettings {
            java8_executable: PathBuf::from("/opt/jre8/bin/java"),
            java17_executable: PathBuf::from("/opt/jre17/bin/java"),
            ..LaunchSettings::default()
        };

        assert_eq!(
            select_java_executable(&settings, "1.19.2").unwrap(),
            Path::new("/opt/jre17/bin/java")
        );
        assert_eq!(
            select_java_executable(&settings, "1.8.9").unwrap(),
            Path::new("/opt/jre8/bin/java")
        );
    }
}
