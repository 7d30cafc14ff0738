//! Filesystem locations for persisted data.
//!
//! The data directory resolves from `BOOKEXPLORER_DATA_DIR` when set, and
//! otherwise from `$HOME/.local/share/bookexplorer`. Paths given in
//! configuration may start with `~`, which expands to `$HOME`.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BOOKEXPLORER_DATA_DIR";

/// File name of the favorites store inside the data directory.
pub const FAVORITES_FILE: &str = "favorites.json";

/// Returns the directory holding persisted application data.
///
/// Falls back to a relative `.bookexplorer` directory when neither the
/// override nor `HOME` is set.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".bookexplorer"),
        |home| PathBuf::from(home).join(".local").join("share").join("bookexplorer"),
    )
}

/// Default location of the favorites file.
#[must_use]
pub fn default_favorites_path() -> PathBuf {
    data_dir().join(FAVORITES_FILE)
}

/// Expands a leading `~` to the current user's home directory.
///
/// Paths without a leading `~`, or when `HOME` is unset, are returned as is.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var("HOME").ok();
    expand_tilde_with(path, home.as_deref())
}

/// [`expand_tilde`] against an explicit home directory.
///
/// # Examples
///
/// ```
/// use bookexplorer::infrastructure::paths::expand_tilde_with;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde_with("~/books.json", Some("/home/ada")), PathBuf::from("/home/ada/books.json"));
/// assert_eq!(expand_tilde_with("~", Some("/home/ada")), PathBuf::from("/home/ada"));
/// assert_eq!(expand_tilde_with("/srv/books.json", Some("/home/ada")), PathBuf::from("/srv/books.json"));
/// ```
#[must_use]
pub fn expand_tilde_with(path: &str, home: Option<&str>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => PathBuf::from(home),
        (p, Some(home)) if p.starts_with("~/") => PathBuf::from(home).join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_without_home_is_left_alone() {
        assert_eq!(expand_tilde_with("~/favorites.json", None), PathBuf::from("~/favorites.json"));
    }

    #[test]
    fn tilde_inside_path_is_not_expanded() {
        assert_eq!(
            expand_tilde_with("/data/~/favorites.json", Some("/home/ada")),
            PathBuf::from("/data/~/favorites.json")
        );
    }

    #[test]
    fn favorites_live_in_data_dir() {
        assert!(default_favorites_path().ends_with(FAVORITES_FILE));
    }
}
