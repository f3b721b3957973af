//! Platform-specific helpers.

use crate::config::Packager;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the executable to spawn for a package manager.
///
/// npm and yarn ship as `.cmd` shims on Windows, which `CreateProcess` does not
/// resolve from a bare name.
#[must_use]
pub const fn packager_command(packager: Packager) -> &'static str {
    match (packager, is_windows()) {
        (Packager::Npm, true) => "npm.cmd",
        (Packager::Npm, false) => "npm",
        (Packager::Yarn, true) => "yarn.cmd",
        (Packager::Yarn, false) => "yarn",
    }
}

/// Checks whether `cmd` resolves to an executable in `PATH`.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}
