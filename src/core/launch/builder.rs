// ─── Launch Builder ───
// Runs the whole resolution pipeline and produces a ready-to-spawn plan.

use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::auth::AuthContext;
use crate::core::config::{LaunchSettings, ModConfiguration};
use crate::core::distribution::DistributionServer;
use crate::core::error::{LaunchWarning, LauncherError, LauncherResult};
use crate::core::java;
use crate::core::version::{ArgumentEra, VersionManifest};

use super::arguments::{build_mod_argument, ArgumentResolver};
use super::classpath::build_classpath;
use super::context::LaunchContext;
use super::libraries::resolve_libraries;
use super::natives::extract_natives;

/// Result of a launch preparation, handed to the process launcher.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchPlan {
    pub executable: PathBuf,
    pub args: Vec<String>,
    /// Working directory of the game process.
    pub working_dir: PathBuf,
    /// Staging directory to delete once the process exits.
    pub natives_dir: PathBuf,
    pub detached: bool,
    pub prepared_at: DateTime<Utc>,
    pub warnings: Vec<LaunchWarning>,
}

impl LaunchPlan {
    /// Copy/paste friendly rendering of the command for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.executable.to_string_lossy().to_string())
            .chain(self.args.iter().cloned())
            .map(|arg| quote_arg(&arg).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub struct LaunchBuilder<'a> {
    server: &'a DistributionServer,
    version: &'a VersionManifest,
    mods: &'a ModConfiguration,
    auth: &'a AuthContext,
    settings: &'a LaunchSettings,
    context: LaunchContext,
}

impl<'a> LaunchBuilder<'a> {
    pub fn new(
        server: &'a DistributionServer,
        version: &'a VersionManifest,
        mods: &'a ModConfiguration,
        auth: &'a AuthContext,
        settings: &'a LaunchSettings,
        context: LaunchContext,
    ) -> Self {
        Self {
            server,
            version,
            mods,
            auth,
            settings,
            context,
        }
    }

    /// Resolve libraries, stage natives and build the final argument list.
    pub async fn build(self) -> LauncherResult<LaunchPlan> {
        let ctx = &self.context;

        // Fail before touching the filesystem on an unknown schema.
        let era = ArgumentEra::for_version(&self.server.minecraft_version)?;
        let executable = java::select_java_executable(self.settings, &self.server.minecraft_version)?
            .to_path_buf();
        info!(
            "Preparing launch of {} (Minecraft {}, {:?} arguments)",
            self.server.id, self.server.minecraft_version, era
        );

        tokio::fs::create_dir_all(&ctx.game_dir)
            .await
            .map_err(|e| LauncherError::Io {
                path: ctx.game_dir.clone(),
                source: e,
            })?;

        let enabled_mods = self.mods.enabled_modules(self.server);
        let resolved = resolve_libraries(
            self.server,
            &enabled_mods,
            self.version,
            &ctx.rule_environment(),
            &ctx.libraries_dir(),
        );
        let mut warnings = resolved.warnings;

        let extraction = extract_natives(&resolved.natives, &ctx.natives_dir).await?;
        warnings.extend(extraction.warnings);

        let classpath = build_classpath(
            &self.settings.version_jar(&self.version.id),
            &resolved.libraries,
            ctx.platform,
        );
        debug!("Classpath: {}", classpath);

        let mod_argument = build_mod_argument(self.server, self.mods, ctx, &mut warnings);
        let main_class = self
            .server
            .main_class
            .as_deref()
            .unwrap_or(self.version.main_class.as_str());

        let args = ArgumentResolver {
            server: self.server,
            version: self.version,
            main_class,
            auth: self.auth,
            settings: self.settings,
            context: ctx,
            classpath: &classpath,
            mod_argument: &mod_argument,
        }
        .resolve(&mut warnings)?;

        for warning in &warnings {
            warn!("{}", warning);
        }

        let plan = LaunchPlan {
            executable,
            args,
            working_dir: ctx.game_dir.clone(),
            natives_dir: ctx.natives_dir.clone(),
            detached: self.settings.launch_detached,
            prepared_at: Utc::now(),
            warnings,
        };
        debug!("Command (copy/paste): {}", plan.command_line());
        Ok(plan)
    }
}

/// POSIX single-quote an argument unless it is made of path-safe characters.
fn quote_arg(arg: &str) -> Cow<'_, str> {
    const PLAIN: &[char] = &['-', '_', '.', '/', ':', '\\', '=', ',', '+', '@'];

    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || PLAIN.contains(&ch));
    if plain {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}
