pub mod classpath;
pub mod task;

pub use classpath::{build_classpath, build_library_path};
pub use task::LaunchCommand;
