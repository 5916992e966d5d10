use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Deserialize;
use tracing::{error, info};

use interface_launch::{
    init_tracing, AuthContext, DistributionServer, LaunchBuilder, LaunchContext, LaunchSettings,
    LauncherError, LauncherResult, ModConfiguration, VersionManifest,
};

/// Everything the collaborators hand over for one launch attempt.
///
/// `server` and `version` point at the distribution and version JSON files,
/// relative to the request file unless absolute.
#[derive(Debug, Deserialize)]
struct LaunchRequest {
    #[serde(default)]
    settings: LaunchSettings,
    server: PathBuf,
    version: PathBuf,
    #[serde(default)]
    mods: ModConfiguration,
    auth: AuthContext,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(request_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: interface-launch <request.json> [settings.json]");
        return ExitCode::from(2);
    };
    let settings_path = args.next().map(PathBuf::from);

    match run(&request_path, settings_path.as_deref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Launch preparation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(request_path: &Path, settings_path: Option<&Path>) -> LauncherResult<()> {
    let raw = tokio::fs::read_to_string(request_path)
        .await
        .map_err(|e| LauncherError::Io {
            path: request_path.to_path_buf(),
            source: e,
        })?;
    let mut request: LaunchRequest = serde_json::from_str(&raw)?;
    if let Some(path) = settings_path {
        request.settings = LaunchSettings::load(path)?;
    }

    let base = request_path.parent().unwrap_or_else(|| Path::new("."));
    let server_path = base.join(&request.server);
    let version_path = base.join(&request.version);
    let (server, version) = tokio::try_join!(
        DistributionServer::load(&server_path),
        VersionManifest::load(&version_path),
    )?;

    let context = LaunchContext::new(&request.settings, &server.id);
    let plan = LaunchBuilder::new(
        &server,
        &version,
        &request.mods,
        &request.auth,
        &request.settings,
        context,
    )
    .build()
    .await?;

    info!(
        "Prepared {} arguments with {} warnings",
        plan.args.len(),
        plan.warnings.len()
    );
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
