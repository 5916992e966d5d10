// ─── InterfaceOficial Launch Core ───
// Resolves everything needed to start a modded Minecraft client.
//
// Architecture:
//   core/
//     auth/         — Credentials handed over by the auth provider
//     config/       — Launch settings + per-server mod selection
//     distribution/ — Server module tree from the distribution index
//     maven/        — Coordinate parsing, versionless ids
//     version/      — Version JSON, rules, argument schema era
//     java/         — Java executable selection
//     launch/       — Rules, libraries, natives, classpath, arguments

pub mod auth;
pub mod config;
pub mod distribution;
pub mod error;
pub mod java;
pub mod launch;
pub mod maven;
pub mod platform;
pub mod version;
