// ─── Version File ───
// Parses the runtime vendor's version JSON: argument templates, libraries and rules.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::{Arch, Platform};

/// Entries excluded from native archives when a library declares no `extract` block.
pub const DEFAULT_NATIVE_EXCLUSIONS: &[&str] = &["META-INF/"];

/// A fully parsed version JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionManifest {
    /// Primary artifact id, e.g. `1.20.1`.
    pub id: String,
    pub main_class: String,
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    /// Templated argument schema (1.13+).
    #[serde(default)]
    pub arguments: Option<Arguments>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetIndexInfo {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<ArgumentEntry>,
    #[serde(default)]
    pub jvm: Vec<ArgumentEntry>,
}

/// One slot of an argument template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArgumentEntry {
    Plain(String),
    Conditional(ConditionalArgument),
    /// Anything that is neither a string nor a well-formed conditional
    /// object. Never emitted.
    Malformed(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionalArgument {
    #[serde(default)]
    pub rules: Vec<Rule>,
    pub value: ArgumentValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Many(Vec<String>),
}

impl ArgumentValue {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ArgumentValue::Single(value) => vec![value],
            ArgumentValue::Many(values) => values,
        }
    }
}

// ─── Rules ───

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
    #[serde(default)]
    pub features: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    /// Regular expression matched against the OS release string.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
}

// ─── Libraries ───

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Platform name → classifier template (may contain `${arch}`).
    #[serde(default)]
    pub natives: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub extract: Option<ExtractRules>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibraryArtifact>,
    #[serde(default)]
    pub classifiers: BTreeMap<String, LibraryArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryArtifact {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractRules {
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl LibraryEntry {
    /// Whether this library ships platform natives instead of a classpath jar.
    pub fn is_native(&self) -> bool {
        self.natives.is_some()
    }

    /// Classifier name for the given platform, with `${arch}` substituted.
    pub fn native_classifier(&self, platform: Platform, arch: Arch) -> Option<String> {
        self.natives
            .as_ref()?
            .get(platform.mojang_name())
            .map(|template| template.replace("${arch}", arch.bitness_token()))
    }

    /// Classifier artifact for the given platform.
    pub fn native_artifact(&self, platform: Platform, arch: Arch) -> Option<&LibraryArtifact> {
        let classifier = self.native_classifier(platform, arch)?;
        self.downloads.as_ref()?.classifiers.get(&classifier)
    }

    /// Main artifact path relative to the libraries directory.
    pub fn artifact_path(&self) -> Option<&str> {
        self.downloads
            .as_ref()?
            .artifact
            .as_ref()?
            .path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }

    /// Substrings that exclude archive entries from extraction.
    pub fn extract_exclusions(&self) -> Vec<String> {
        match &self.extract {
            Some(rules) => rules.exclude.clone(),
            None => DEFAULT_NATIVE_EXCLUSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl VersionManifest {
    pub fn from_json_str(raw: &str) -> LauncherResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a version JSON from disk.
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        let manifest = Self::from_json_str(&raw)?;
        debug!(
            "Loaded version {} ({} libraries)",
            manifest.id,
            manifest.libraries.len()
        );
        Ok(manifest)
    }

    /// Asset index id, falling back to `legacy` when the manifest names none.
    pub fn asset_index_id(&self) -> &str {
        self.assets
            .as_deref()
            .or_else(|| self.asset_index.as_ref().map(|index| index.id.as_str()))
            .unwrap_or("legacy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VersionManifest {
        serde_json::from_value(serde_json::json!({
            "id": "1.20.1",
            "mainClass": "net.minecraft.client.main.Main",
            "assetIndex": { "id": "5" },
            "arguments": {
                "game": [
                    "--username",
                    "${auth_player_name}",
                    {
                        "rules": [{"action": "allow", "features": {"has_custom_resolution": true}}],
                        "value": ["--width", "${resolution_width}"]
                    },
                    { "rules": [{"action": "sometimes"}], "value": "--broken" },
                    42
                ],
                "jvm": [
                    {
                        "rules": [{"action": "allow", "os": {"name": "osx"}}],
                        "value": "-XstartOnFirstThread"
                    }
                ]
            },
            "libraries": [
                {
                    "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
                    "natives": { "linux": "natives-linux", "windows": "natives-windows-${arch}" },
                    "extract": { "exclude": ["META-INF/", "notes/"] },
                    "downloads": {
                        "classifiers": {
                            "natives-linux": { "path": "lwjgl-platform-natives-linux.jar", "sha1": "abc" },
                            "natives-windows-64": { "path": "lwjgl-platform-natives-windows-64.jar" }
                        }
                    }
                },
                {
                    "name": "com.google.guava:guava:17.0",
                    "downloads": { "artifact": { "path": "com/google/guava/guava/17.0/guava-17.0.jar" } }
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn parses_templated_arguments_into_typed_entries() {
        let manifest = sample();
        let args = manifest.arguments.unwrap();

        assert_eq!(args.game[0], ArgumentEntry::Plain("--username".into()));
        match &args.game[2] {
            ArgumentEntry::Conditional(cond) => {
                assert_eq!(cond.rules.len(), 1);
                assert_eq!(
                    cond.value,
                    ArgumentValue::Many(vec!["--width".into(), "${resolution_width}".into()])
                );
            }
            other => panic!("expected conditional, got {other:?}"),
        }
        assert!(matches!(args.game[3], ArgumentEntry::Malformed(_)));
        assert!(matches!(args.game[4], ArgumentEntry::Malformed(_)));
    }

    #[test]
    fn asset_index_falls_back_to_asset_index_block() {
        assert_eq!(sample().asset_index_id(), "5");
    }

    #[test]
    fn native_classifier_substitutes_arch() {
        let manifest = sample();
        let lib = &manifest.libraries[0];
        assert!(lib.is_native());
        assert_eq!(
            lib.native_classifier(Platform::Windows, Arch::X64).as_deref(),
            Some("natives-windows-64")
        );
        assert_eq!(
            lib.native_artifact(Platform::Linux, Arch::X64)
                .and_then(|a| a.path.as_deref()),
            Some("lwjgl-platform-natives-linux.jar")
        );
        assert!(lib.native_artifact(Platform::Osx, Arch::X64).is_none());
        assert_eq!(lib.extract_exclusions(), vec!["META-INF/", "notes/"]);
    }

    #[test]
    fn plain_library_uses_default_exclusions() {
        let manifest = sample();
        let lib = &manifest.libraries[1];
        assert!(!lib.is_native());
        assert_eq!(
            lib.artifact_path(),
            Some("com/google/guava/guava/17.0/guava-17.0.jar")
        );
        assert_eq!(lib.extract_exclusions(), vec!["META-INF/"]);
    }
}
