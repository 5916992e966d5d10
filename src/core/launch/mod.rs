pub mod arguments;
pub mod builder;
pub mod classpath;
pub mod context;
pub mod libraries;
pub mod natives;
pub mod rules;

pub use arguments::{build_mod_argument, expand_templates, ArgumentResolver, PlaceholderTable};
pub use builder::{LaunchBuilder, LaunchPlan};
pub use classpath::build_classpath;
pub use context::LaunchContext;
pub use libraries::{resolve_libraries, LibraryMap, NativeLibrary, ResolvedLibraries};
pub use natives::{cleanup_natives, extract_natives, ExtractionReport};
pub use rules::{FeatureSet, RuleEnvironment, RuleVerdict};
