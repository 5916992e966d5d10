pub mod mods;
pub mod settings;

pub use mods::{ModConfiguration, ModState};
pub use settings::{LaunchSettings, Resolution};
