// ─── Classpath Builder ───
// Joins the version jar and the merged libraries into one classpath string.

use std::path::Path;

use crate::core::platform::Platform;

use super::libraries::LibraryMap;

/// Primary artifact first, then every merged library in map order, joined by
/// the platform separator. No trailing separator.
pub fn build_classpath(version_jar: &Path, libraries: &LibraryMap, platform: Platform) -> String {
    std::iter::once(version_jar)
        .chain(libraries.values().map(|path| path.as_path()))
        .map(path_str)
        .collect::<Vec<_>>()
        .join(platform.classpath_separator())
}

/// Lossy string form of a path as passed to the JVM.
pub fn path_str(path: &Path) -> String {
    let text = path.to_string_lossy().to_string();

    // Java fails to load jars from extended-length paths (`\\?\C:\...`).
    match text.strip_prefix(r"\\?\") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}
