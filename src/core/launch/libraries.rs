// ─── Library Resolution ───
// Merges vendor-declared libraries with the distribution's module tree.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::core::distribution::{DistributionServer, Module, ModuleKind};
use crate::core::error::LaunchWarning;
use crate::core::maven::versionless_id;
use crate::core::version::VersionManifest;

use super::rules::RuleEnvironment;

/// Versionless id → absolute artifact path, in first-declaration order.
pub type LibraryMap = IndexMap<String, PathBuf>;

/// A native-classified library whose archive must be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeLibrary {
    pub name: String,
    pub archive: PathBuf,
    pub sha1: Option<String>,
    /// Entries whose path contains any of these substrings are skipped.
    pub exclusions: Vec<String>,
}

#[derive(Debug, Default)]
pub struct VendorLibraries {
    pub classpath: LibraryMap,
    pub natives: Vec<NativeLibrary>,
    pub warnings: Vec<LaunchWarning>,
}

#[derive(Debug, Default)]
pub struct ResolvedLibraries {
    /// Merged classpath libraries; distribution entries override vendor ones.
    pub libraries: LibraryMap,
    pub natives: Vec<NativeLibrary>,
    pub warnings: Vec<LaunchWarning>,
}

/// Resolve both library sources and merge them by versionless id.
pub fn resolve_libraries(
    server: &DistributionServer,
    enabled_mods: &[&Module],
    version: &VersionManifest,
    env: &RuleEnvironment,
    libraries_dir: &Path,
) -> ResolvedLibraries {
    let vendor = resolve_vendor_libraries(version, env, libraries_dir);
    let mut warnings = vendor.warnings;
    let server_libs = resolve_server_libraries(server, enabled_mods, &mut warnings);

    let mut libraries = vendor.classpath;
    for (id, path) in server_libs {
        if let Some(previous) = libraries.insert(id.clone(), path) {
            debug!("Server library {} overrides {:?}", id, previous);
        }
    }

    info!(
        "Resolved {} classpath libraries and {} native archives",
        libraries.len(),
        vendor.natives.len()
    );

    ResolvedLibraries {
        libraries,
        natives: vendor.natives,
        warnings,
    }
}

/// Vendor pass: plain libraries go to the classpath map, native-classified
/// libraries are collected for extraction instead.
pub fn resolve_vendor_libraries(
    version: &VersionManifest,
    env: &RuleEnvironment,
    libraries_dir: &Path,
) -> VendorLibraries {
    let mut out = VendorLibraries::default();

    for lib in &version.libraries {
        if !env.library_applies(lib, &mut out.warnings) {
            continue;
        }

        if !lib.is_native() {
            match lib.artifact_path() {
                Some(path) => {
                    out.classpath
                        .insert(versionless_id(&lib.name), libraries_dir.join(path));
                }
                None => {
                    warn!("Library {} has no artifact path", lib.name);
                    out.warnings.push(LaunchWarning::MissingArtifact {
                        id: lib.name.clone(),
                    });
                }
            }
            continue;
        }

        let classifier = lib
            .native_classifier(env.platform, env.arch)
            .unwrap_or_default();
        let artifact = lib
            .native_artifact(env.platform, env.arch)
            .and_then(|a| a.path.as_deref().map(|path| (path, a.sha1.clone())));

        match artifact {
            Some((path, sha1)) => out.natives.push(NativeLibrary {
                name: lib.name.clone(),
                archive: libraries_dir.join(path),
                sha1,
                exclusions: lib.extract_exclusions(),
            }),
            None => {
                warn!("Native library {} has no {} artifact", lib.name, classifier);
                out.warnings.push(LaunchWarning::MissingNativeClassifier {
                    name: lib.name.clone(),
                    classifier,
                });
            }
        }
    }

    out
}

/// Distribution pass over the server's modules and the enabled mods.
pub fn resolve_server_libraries(
    server: &DistributionServer,
    enabled_mods: &[&Module],
    warnings: &mut Vec<LaunchWarning>,
) -> LibraryMap {
    let mut libs = LibraryMap::new();

    for module in &server.modules {
        if matches!(module.kind, ModuleKind::Loader | ModuleKind::Library) {
            record_module(module, &mut libs, warnings);
            collect_module_libraries(module, &mut libs, warnings);
        }
    }

    // Mods may declare their own libraries.
    for module in enabled_mods {
        if module.has_sub_modules() {
            collect_module_libraries(module, &mut libs, warnings);
        }
    }

    libs
}

/// Depth-first walk recording every descendant of kind `Library`.
fn collect_module_libraries(
    module: &Module,
    libs: &mut LibraryMap,
    warnings: &mut Vec<LaunchWarning>,
) {
    for sub in &module.sub_modules {
        if sub.kind == ModuleKind::Library {
            record_module(sub, libs, warnings);
        }
        collect_module_libraries(sub, libs, warnings);
    }
}

fn record_module(module: &Module, libs: &mut LibraryMap, warnings: &mut Vec<LaunchWarning>) {
    match module.artifact_path() {
        Some(path) => {
            libs.insert(module.versionless_id(), PathBuf::from(path));
        }
        None => {
            warn!("Module {} has no artifact path", module.id);
            warnings.push(LaunchWarning::MissingArtifact {
                id: module.id.clone(),
            });
        }
    }
}
