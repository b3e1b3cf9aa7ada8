mod clean;
mod compile;
mod version_data;

pub use clean::clean;
pub use compile::{BUILD_DIR, BuildRequest, SOURCES_DIR, SourceFiles, build_package, collect_sources};
pub use version_data::generate_version_data;
