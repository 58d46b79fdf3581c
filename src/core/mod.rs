// ─── Espresso Core ───
// Resolution and launch pipeline for descriptor-driven applications.
//
// Architecture:
//   core/
//     config        Explicit run configuration + persisted settings
//     descriptor/   JNLP model, fetch and text decoding
//     downloader/   Length-checked cache reconciliation
//     materialize/  Archive unpacking + self-extracting runtimes
//     resolve/      Concurrent resolution engine + error aggregation
//     launch/       Classpath builder + process spawner
//     platform      OS / arch naming and runtime conventions

pub mod config;
pub mod descriptor;
pub mod downloader;
pub mod error;
pub mod http;
pub mod launch;
pub mod materialize;
pub mod platform;
pub mod resolve;
