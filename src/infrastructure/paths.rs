//! Platform path utilities.
//!
//! Resolves where the client keeps its durable state (the token file and,
//! optionally, the log file) and expands `~` in user-supplied paths.

use std::path::PathBuf;

/// Name of the token file inside the data directory.
const TOKEN_FILE_NAME: &str = "credentials.json";

/// Returns the data directory for applytrack state.
///
/// Resolves to the platform data directory (for example
/// `~/.local/share/applytrack` on Linux). Falls back to `./.applytrack` when the
/// platform reports no data directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".applytrack"), |dir| dir.join("applytrack"))
}

/// Returns the default location of the durable token file.
#[must_use]
pub fn default_token_path() -> PathBuf {
    get_data_dir().join(TOKEN_FILE_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or on platforms without a home directory, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use applytrack::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
