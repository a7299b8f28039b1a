//! Small filesystem helpers shared by the marker and the log

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Set the permission bits of `path` to `mode`, ignoring the process umask
#[cfg(unix)]
pub fn relax_permissions(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn relax_permissions(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Open `path` for appending, creating it if missing
pub fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
