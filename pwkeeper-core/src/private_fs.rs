//! Owner-only files and directories for the data directory.
//!
//! The credential database holds secrets in the clear and the preferences
//! file holds the PIN hash, so both are kept unreadable to other users.
//! On non-unix targets these fall back to the platform defaults.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::error::Result;

#[cfg(unix)]
const DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Create `dir` and any missing parents. Directories created here are
/// owner-only; existing ones are left alone.
pub(crate) fn create_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)?;
    Ok(())
}

/// Create the parent directory of `path`, if it has one.
pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}

/// Make sure `path` exists and is owner-only, keeping its contents.
pub(crate) fn touch(path: &Path) -> Result<()> {
    open(path, OpenOptions::new().append(true).create(true))?;
    Ok(())
}

/// Create or truncate `path` for writing, owner-only.
pub(crate) fn create_file(path: &Path) -> Result<File> {
    open(path, OpenOptions::new().write(true).create(true).truncate(true))
}

fn open(path: &Path, options: &mut OpenOptions) -> Result<File> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        let file = options.mode(FILE_MODE).open(path)?;
        // mode only applies on creation; tighten files left by older versions
        file.set_permissions(fs::Permissions::from_mode(FILE_MODE))?;
        Ok(file)
    }
    #[cfg(not(unix))]
    {
        Ok(options.open(path)?)
    }
}
