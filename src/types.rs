use std::path::PathBuf;

/// A directory to look in for the config file.
///
/// Search paths are listed in priority-ascending order: a file found in a
/// later directory overrides keys from earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}
