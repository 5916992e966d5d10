mod artifact;

pub use artifact::{versionless_id, MavenArtifact};
