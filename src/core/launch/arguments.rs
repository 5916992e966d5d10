// ─── Argument Resolution ───
// Builds the ordered JVM + game argument list for both argument schemas.

use std::collections::VecDeque;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::core::auth::AuthContext;
use crate::core::config::{LaunchSettings, ModConfiguration};
use crate::core::distribution::DistributionServer;
use crate::core::error::{LaunchWarning, LauncherError, LauncherResult};
use crate::core::platform::Platform;
use crate::core::version::{ArgumentEntry, ArgumentEra, VersionManifest};

use super::classpath::path_str;
use super::context::LaunchContext;
use super::rules::RuleEnvironment;

pub const LAUNCHER_NAME: &str = "InterfaceOficial";
pub const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_TYPE: &str = "InterfaceOficial";
pub const USER_TYPE: &str = "mojang";
/// System property through which the loader picks up extra mod jars.
pub const MOD_INJECTION_PROPERTY: &str = "-Dfabric.addMods=";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern is valid"))
}

/// Build the mod injection flag value: every enabled optional mod's artifact,
/// then the server's required mod directory.
pub fn build_mod_argument(
    server: &DistributionServer,
    mods: &ModConfiguration,
    context: &LaunchContext,
    warnings: &mut Vec<LaunchWarning>,
) -> String {
    let mut entries = Vec::new();
    for name in mods.optional_names() {
        match server.resolve_mod(name) {
            Some(path) => entries.push(path.to_string()),
            None => {
                warn!("Enabled mod {} is not declared by server {}", name, server.id);
                warnings.push(LaunchWarning::UnresolvedMod {
                    name: name.to_string(),
                });
            }
        }
    }
    entries.push(context.required_mods_dir(&server.id));
    entries.join(context.platform.classpath_separator())
}

/// How a known placeholder is substituted.
enum Substitution<'a> {
    /// The whole argument becomes the value.
    Whole(&'a str),
    /// Only the `${...}` token is replaced; surrounding text is kept.
    Embedded(&'a str),
}

/// Values for the `${...}` placeholders of templated arguments.
#[derive(Debug, Clone)]
pub struct PlaceholderTable {
    pub auth_player_name: String,
    pub version_name: String,
    pub game_directory: String,
    pub assets_root: String,
    pub assets_index_name: String,
    pub auth_uuid: String,
    pub auth_access_token: String,
    pub resolution_width: String,
    pub resolution_height: String,
    pub natives_directory: String,
    pub classpath: String,
}

impl PlaceholderTable {
    fn lookup(&self, identifier: &str) -> Option<Substitution<'_>> {
        use Substitution::{Embedded, Whole};

        Some(match identifier {
            "auth_player_name" => Whole(&self.auth_player_name),
            "version_name" => Whole(&self.version_name),
            "game_directory" => Whole(&self.game_directory),
            "assets_root" => Whole(&self.assets_root),
            "assets_index_name" => Whole(&self.assets_index_name),
            "auth_uuid" => Whole(&self.auth_uuid),
            "auth_access_token" => Whole(&self.auth_access_token),
            "user_type" => Whole(USER_TYPE),
            "version_type" => Whole(VERSION_TYPE),
            "resolution_width" => Whole(&self.resolution_width),
            "resolution_height" => Whole(&self.resolution_height),
            "classpath" => Whole(&self.classpath),
            "natives_directory" => Embedded(&self.natives_directory),
            "launcher_name" => Embedded(LAUNCHER_NAME),
            "launcher_version" => Embedded(LAUNCHER_VERSION),
            _ => return None,
        })
    }

    /// Substitute the first placeholder of `arg`. Unknown identifiers are
    /// passed through verbatim.
    pub fn resolve(&self, arg: &str) -> String {
        let Some(caps) = placeholder_regex().captures(arg) else {
            return arg.to_string();
        };
        let (Some(token), Some(identifier)) = (caps.get(0), caps.get(1)) else {
            return arg.to_string();
        };

        match self.lookup(identifier.as_str()) {
            Some(Substitution::Whole(value)) => value.to_string(),
            Some(Substitution::Embedded(value)) => {
                let mut resolved = String::with_capacity(arg.len() + value.len());
                resolved.push_str(&arg[..token.start()]);
                resolved.push_str(value);
                resolved.push_str(&arg[token.end()..]);
                resolved
            }
            None => {
                debug!("Leaving unknown placeholder in {:?}", arg);
                arg.to_string()
            }
        }
    }
}

/// Everything the argument strategies read.
pub struct ArgumentResolver<'a> {
    pub server: &'a DistributionServer,
    pub version: &'a VersionManifest,
    pub main_class: &'a str,
    pub auth: &'a AuthContext,
    pub settings: &'a LaunchSettings,
    pub context: &'a LaunchContext,
    pub classpath: &'a str,
    pub mod_argument: &'a str,
}

impl ArgumentResolver<'_> {
    /// Produce the final argument list for the server's Minecraft version.
    pub fn resolve(&self, warnings: &mut Vec<LaunchWarning>) -> LauncherResult<Vec<String>> {
        match ArgumentEra::for_version(&self.server.minecraft_version)? {
            ArgumentEra::Legacy => {
                debug!("Using legacy arguments for {}", self.server.minecraft_version);
                Ok(self.legacy())
            }
            ArgumentEra::Templated => {
                debug!("Using templated arguments for {}", self.server.minecraft_version);
                self.templated(warnings)
            }
        }
    }

    /// Fixed flag list used before the templated schema existed.
    pub fn legacy(&self) -> Vec<String> {
        let ctx = self.context;
        let mut args = vec![
            format!("{}{}", MOD_INJECTION_PROPERTY, self.mod_argument),
            "-cp".to_string(),
            self.classpath.to_string(),
        ];
        args.extend(self.dock_flags());
        args.extend(self.heap_flags());
        args.extend(self.settings.jvm_options.iter().cloned());
        args.push(format!("-Djava.library.path={}", path_str(&ctx.natives_dir)));
        args.push(self.main_class.to_string());

        let pairs = [
            ("--username", self.auth.display_name().to_string()),
            ("--version", self.server.id.clone()),
            ("--versionType", VERSION_TYPE.to_string()),
            ("--gameDir", path_str(&ctx.game_dir)),
            ("--assetsDir", path_str(&ctx.assets_dir())),
            ("--assetIndex", self.version.asset_index_id().to_string()),
            ("--accessToken", self.auth.access_token().to_string()),
            ("--uuid", self.auth.uuid().to_string()),
        ];
        for (flag, value) in pairs {
            args.push(flag.to_string());
            args.push(value);
        }

        if ctx.fullscreen {
            args.push("--fullscreen".into());
            args.push("true".into());
        } else {
            args.push("--width".into());
            args.push(ctx.resolution.width.to_string());
            args.push("--height".into());
            args.push(ctx.resolution.height.to_string());
        }

        args
    }

    /// Expand the manifest's rule-annotated templates.
    pub fn templated(&self, warnings: &mut Vec<LaunchWarning>) -> LauncherResult<Vec<String>> {
        let templates = self
            .version
            .arguments
            .as_ref()
            .ok_or_else(|| LauncherError::MissingArguments(self.version.id.clone()))?;

        let mut entries = templates.jvm.clone();
        entries.push(ArgumentEntry::Plain(format!(
            "{}{}",
            MOD_INJECTION_PROPERTY, self.mod_argument
        )));
        entries.extend(self.dock_flags().into_iter().map(ArgumentEntry::Plain));
        entries.extend(self.heap_flags().into_iter().map(ArgumentEntry::Plain));
        entries.extend(
            self.settings
                .jvm_options
                .iter()
                .cloned()
                .map(ArgumentEntry::Plain),
        );
        entries.push(ArgumentEntry::Plain(self.main_class.to_string()));
        entries.extend(templates.game.iter().cloned());

        Ok(expand_templates(
            entries,
            &self.context.rule_environment(),
            &self.placeholders(),
            warnings,
        ))
    }

    pub fn placeholders(&self) -> PlaceholderTable {
        let ctx = self.context;
        PlaceholderTable {
            auth_player_name: self.auth.display_name().to_string(),
            version_name: self.server.id.clone(),
            game_directory: path_str(&ctx.game_dir),
            assets_root: path_str(&ctx.assets_dir()),
            assets_index_name: self.version.asset_index_id().to_string(),
            auth_uuid: self.auth.uuid().to_string(),
            auth_access_token: self.auth.access_token().to_string(),
            resolution_width: ctx.resolution.width.to_string(),
            resolution_height: ctx.resolution.height.to_string(),
            natives_directory: path_str(&ctx.natives_dir),
            classpath: self.classpath.to_string(),
        }
    }

    fn dock_flags(&self) -> Vec<String> {
        if self.context.platform != Platform::Osx {
            return Vec::new();
        }
        let mut flags = vec![format!("-Xdock:name={}", LAUNCHER_NAME)];
        if let Some(icon) = &self.settings.dock_icon {
            flags.push(format!("-Xdock:icon={}", path_str(icon)));
        }
        flags
    }

    fn heap_flags(&self) -> Vec<String> {
        vec![
            format!("-Xmx{}", self.settings.max_ram),
            format!("-Xms{}", self.settings.min_ram),
        ]
    }
}

/// Worklist expansion of template entries.
///
/// Activated conditionals are replaced by their value(s), pushed back to the
/// front of the queue so spliced values get placeholder resolution like any
/// other element. Inactive and malformed entries are dropped.
pub fn expand_templates(
    entries: Vec<ArgumentEntry>,
    env: &RuleEnvironment,
    table: &PlaceholderTable,
    warnings: &mut Vec<LaunchWarning>,
) -> Vec<String> {
    let mut queue: VecDeque<ArgumentEntry> = entries.into();
    let mut args = Vec::with_capacity(queue.len());

    while let Some(entry) = queue.pop_front() {
        match entry {
            ArgumentEntry::Plain(arg) => args.push(table.resolve(&arg)),
            ArgumentEntry::Conditional(conditional) => {
                let verdict = env.evaluate(&conditional.rules);
                warnings.extend(verdict.warnings);
                if !verdict.activates {
                    continue;
                }
                let value = verdict.value_override.unwrap_or(conditional.value);
                for arg in value.into_vec().into_iter().rev() {
                    queue.push_front(ArgumentEntry::Plain(arg));
                }
            }
            ArgumentEntry::Malformed(raw) => {
                debug!("Dropping malformed argument entry: {}", raw);
            }
        }
    }

    args
}
