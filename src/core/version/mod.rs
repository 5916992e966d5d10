pub mod era;
pub mod version_file;

pub use era::{ArgumentEra, MinecraftVersion, TEMPLATED_ARGUMENTS_SINCE};
pub use version_file::{
    ArgumentEntry, ArgumentValue, Arguments, ConditionalArgument, LibraryArtifact,
    LibraryEntry, OsRule, Rule, RuleAction, VersionManifest, DEFAULT_NATIVE_EXCLUSIONS,
};
