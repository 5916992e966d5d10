pub mod model;

pub use model::{DistributionServer, Module, ModuleArtifact, ModuleKind};
