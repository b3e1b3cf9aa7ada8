use super::Session;
use crate::build::{BUILD_DIR, BuildRequest, build_package, generate_version_data};
use crate::cli::{Configuration, Options};
use crate::manifest::project_root;
use crate::toolchain::Toolchain;
use crate::{deps, lock};
use anyhow::Result;

/// Fetch, lock, record version data, compile.
///
/// With `enforce_lock` unset the lockfile is neither required nor rewritten.
pub fn build(
    configuration: Configuration,
    toolchain: &Toolchain,
    opts: &Options,
    session: &Session,
    enforce_lock: bool,
) -> Result<()> {
    let root = project_root()?;
    if enforce_lock {
        lock::check(&root)?;
    }

    let (package, external) = deps::fetch(&root)?;
    if enforce_lock {
        lock::generate(&root)?;
    }
    generate_version_data(&root.join(BUILD_DIR), &package, &external)?;

    build_package(&BuildRequest {
        root: &root,
        package: &package,
        external: &external,
        configuration,
        toolchain,
        xcc: &opts.xcc,
        xld: &opts.xld,
        xswiftc: &opts.xswiftc,
        verbosity: session.verbosity,
    })?;
    Ok(())
}
