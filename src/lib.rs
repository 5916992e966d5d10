pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::auth::AuthContext;
pub use crate::core::config::{LaunchSettings, ModConfiguration, ModState, Resolution};
pub use crate::core::distribution::{DistributionServer, Module, ModuleKind};
pub use crate::core::error::{LaunchWarning, LauncherError, LauncherResult};
pub use crate::core::launch::{LaunchBuilder, LaunchContext, LaunchPlan};
pub use crate::core::version::VersionManifest;

/// Install the structured logging subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,interface_launch=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}
