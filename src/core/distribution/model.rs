use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::versionless_id;

/// Module kinds declared by the distribution index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModuleKind {
    Loader,
    Library,
    FabricMod,
    ForgeMod,
    File,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleArtifact {
    /// Absolute path of the artifact on disk, resolved by the distribution provider.
    #[serde(default)]
    pub path: Option<String>,
}

/// A distribution-declared unit. Sub-modules form a plain tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Maven-style coordinate, e.g. `net.fabricmc:fabric-loader:0.14.21`.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ModuleKind,
    #[serde(default)]
    pub artifact: Option<ModuleArtifact>,
    #[serde(default)]
    pub sub_modules: Vec<Module>,
}

impl Module {
    pub fn versionless_id(&self) -> String {
        versionless_id(&self.id)
    }

    pub fn artifact_path(&self) -> Option<&str> {
        self.artifact
            .as_ref()?
            .path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }

    pub fn has_sub_modules(&self) -> bool {
        !self.sub_modules.is_empty()
    }
}

/// One server entry of the distribution index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionServer {
    pub id: String,
    pub minecraft_version: String,
    /// Loader entry point overriding the vanilla main class.
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl DistributionServer {
    pub fn from_json_str(raw: &str) -> LauncherResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::from_json_str(&raw)
    }

    /// Artifact path of the last top-level module carrying `name`.
    pub fn resolve_mod(&self, name: &str) -> Option<&str> {
        self.modules
            .iter()
            .rev()
            .find(|module| module.name == name)
            .and_then(Module::artifact_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_module_tree_and_unknown_kinds() {
        let server = DistributionServer::from_json_str(
            r#"{
                "id": "sewer-1.19",
                "minecraftVersion": "1.19.2",
                "modules": [
                    {
                        "id": "net.fabricmc:fabric-loader:0.14.9",
                        "name": "Fabric Loader",
                        "type": "Loader",
                        "artifact": { "path": "/common/libraries/fabric-loader-0.14.9.jar" },
                        "subModules": [
                            { "id": "org.ow2.asm:asm:9.3", "type": "Library",
                              "artifact": { "path": "/common/libraries/asm-9.3.jar" } }
                        ]
                    },
                    { "id": "com.example:shader:1.0", "name": "Shaders", "type": "ShaderPack" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(server.modules.len(), 2);
        let loader = &server.modules[0];
        assert_eq!(loader.kind, ModuleKind::Loader);
        assert_eq!(loader.versionless_id(), "net.fabricmc:fabric-loader");
        assert!(loader.has_sub_modules());
        assert_eq!(loader.sub_modules[0].kind, ModuleKind::Library);
        assert_eq!(server.modules[1].kind, ModuleKind::Other);
        assert_eq!(server.modules[1].artifact_path(), None);
    }

    #[test]
    fn resolve_mod_prefers_last_declaration() {
        let module = |name: &str, path: &str| Module {
            id: format!("com.example:{name}:1.0"),
            name: name.into(),
            kind: ModuleKind::FabricMod,
            artifact: Some(ModuleArtifact {
                path: Some(path.into()),
            }),
            sub_modules: Vec::new(),
        };
        let server = DistributionServer {
            id: "srv".into(),
            minecraft_version: "1.19.2".into(),
            main_class: None,
            modules: vec![module("sodium", "/a.jar"), module("sodium", "/b.jar")],
        };

        assert_eq!(server.resolve_mod("sodium"), Some("/b.jar"));
        assert_eq!(server.resolve_mod("iris"), None);
    }
}
