use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the launch engine.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Maven ───────────────────────────────────────────
    #[error("Invalid Maven coordinate: {0}")]
    InvalidMavenCoordinate(String),

    // ── Version schema ──────────────────────────────────
    #[error("Unsupported version schema: {0}")]
    UnsupportedVersionSchema(String),

    #[error("Version {0} requires templated arguments but the manifest has none")]
    MissingArguments(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl serde::Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Non-fatal diagnostics collected while preparing a launch.
///
/// A launch with warnings is still attempted; the game process fails fast
/// on its own if something critical turns out to be missing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LaunchWarning {
    #[error("Library {id} has no artifact path, omitted from classpath")]
    MissingArtifact { id: String },

    #[error("Enabled mod {name} is not declared by the server")]
    UnresolvedMod { name: String },

    #[error("Native library {name} has no classifier artifact for {classifier}")]
    MissingNativeClassifier { name: String, classifier: String },

    #[error("Cannot open native archive {path:?}: {reason}")]
    NativeArchive { path: PathBuf, reason: String },

    #[error("Skipped native entry {entry}: {reason}")]
    NativeEntry { entry: String, reason: String },

    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Invalid OS version pattern {pattern:?}: {reason}")]
    InvalidOsPattern { pattern: String, reason: String },
}

impl serde::Serialize for LaunchWarning {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
