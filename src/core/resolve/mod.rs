pub mod artifact;
pub mod engine;
pub mod errors;

pub use artifact::{
    derive_codebase, host_dir_name, resolve, resolve_private_runtime, runtime_executable,
    ResolveBase, ResolvedArtifact,
};
pub use engine::{ResolvedApplication, Resolver};
pub use errors::ErrorCollector;
