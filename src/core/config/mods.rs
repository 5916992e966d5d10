use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::distribution::{DistributionServer, Module};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModState {
    Required,
    Enabled,
    Disabled,
}

impl ModState {
    pub fn is_active(self) -> bool {
        !matches!(self, ModState::Disabled)
    }

    /// Required mods ship inside the server's `required/` directory, so only
    /// user-enabled optional mods are injected individually.
    pub fn is_optional_enabled(self) -> bool {
        matches!(self, ModState::Enabled)
    }
}

/// Per-server mod selection, keyed by the module's logical name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModConfiguration {
    #[serde(default)]
    pub mods: BTreeMap<String, ModState>,
}

impl ModConfiguration {
    pub fn is_active(&self, name: &str) -> bool {
        self.mods.get(name).is_some_and(|state| state.is_active())
    }

    /// Names of enabled optional mods, in name order.
    pub fn optional_names(&self) -> impl Iterator<Item = &str> {
        self.mods
            .iter()
            .filter(|(_, state)| state.is_optional_enabled())
            .map(|(name, _)| name.as_str())
    }

    /// Top-level server modules selected by this configuration, in declaration order.
    pub fn enabled_modules<'a>(&self, server: &'a DistributionServer) -> Vec<&'a Module> {
        server
            .modules
            .iter()
            .filter(|module| self.is_active(&module.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distribution::ModuleKind;

    #[test]
    fn enabled_modules_follow_declaration_order() {
        let config: ModConfiguration = serde_json::from_str(
            r#"{ "mods": { "zoom": "enabled", "sodium": "required", "iris": "disabled" } }"#,
        )
        .unwrap();
        let module = |name: &str| Module {
            id: format!("com.example:{name}:1.0"),
            name: name.into(),
            kind: ModuleKind::FabricMod,
            artifact: None,
            sub_modules: Vec::new(),
        };
        let server = DistributionServer {
            id: "srv".into(),
            minecraft_version: "1.19.2".into(),
            main_class: None,
            modules: vec![module("sodium"), module("iris"), module("zoom")],
        };

        let names: Vec<_> = config
            .enabled_modules(&server)
            .into_iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["sodium", "zoom"]);
        assert_eq!(config.optional_names().collect::<Vec<_>>(), vec!["zoom"]);
    }
}
