//! Virtual path resolution.
//!
//! A virtual path is `container[/key]`. Only the *first* delimiter separates
//! the container from the key; every later delimiter belongs to the key.
//!
//! Nothing here validates names. An empty container (for example from a
//! path with a leading `/`) is passed through and rejected by the store.

/// The hierarchy delimiter.
pub const DELIMITER: char = '/';

/// The container component: everything before the first delimiter, or the
/// whole path when there is none.
///
/// ```
/// use azfs_namespace::container_of;
///
/// assert_eq!(container_of("C/a/b/c"), "C");
/// assert_eq!(container_of("C"), "C");
/// ```
pub fn container_of(path: &str) -> &str {
    match path.split_once(DELIMITER) {
        Some((container, _)) => container,
        None => path,
    }
}

/// The blob key: everything after the first delimiter, or `""`.
///
/// ```
/// use azfs_namespace::blob_key_of;
///
/// assert_eq!(blob_key_of("C/a/b/c"), "a/b/c");
/// assert_eq!(blob_key_of("C"), "");
/// ```
pub fn blob_key_of(path: &str) -> &str {
    match path.split_once(DELIMITER) {
        Some((_, key)) => key,
        None => "",
    }
}

/// The "directory" part of the path's blob key.
///
/// Returns `None` when the key has no delimiter at all (it sits at the top
/// level of its container). `Some("")` is a different state: the key starts
/// with a delimiter, so it does have a (nameless) parent.
///
/// ```
/// use azfs_namespace::parent_prefix_of;
///
/// assert_eq!(parent_prefix_of("C/a/b/c"), Some("a/b"));
/// assert_eq!(parent_prefix_of("C/file.txt"), None);
/// assert_eq!(parent_prefix_of("C"), None);
/// ```
pub fn parent_prefix_of(path: &str) -> Option<&str> {
    parent_prefix_of_key(blob_key_of(path))
}

/// [`parent_prefix_of`] for a bare blob key (no container component).
pub fn parent_prefix_of_key(key: &str) -> Option<&str> {
    key.rsplit_once(DELIMITER).map(|(prefix, _)| prefix)
}

/// Strip trailing delimiters: `"C/docs//"` becomes `"C/docs"`.
pub fn trim_trailing(path: &str) -> &str {
    path.trim_end_matches(DELIMITER)
}

/// Normalize a path to directory form: no leading delimiters, exactly one
/// trailing delimiter.
///
/// ```
/// use azfs_namespace::as_directory;
///
/// assert_eq!(as_directory("/C/docs"), "C/docs/");
/// assert_eq!(as_directory("C"), "C/");
/// ```
pub fn as_directory(path: &str) -> String {
    let mut dir = path.trim_matches(DELIMITER).to_string();
    dir.push(DELIMITER);
    dir
}

/// A virtual path split into its container and blob key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPath<'a> {
    pub container: &'a str,
    pub key: &'a str,
}

impl<'a> ResolvedPath<'a> {
    pub fn parse(path: &'a str) -> Self {
        Self {
            container: container_of(path),
            key: blob_key_of(path),
        }
    }

    /// `true` when the path names a container and nothing inside it.
    pub fn is_container(&self) -> bool {
        self.key.is_empty()
    }

    /// The directory part of the key; see [`parent_prefix_of`].
    pub fn parent_prefix(&self) -> Option<&'a str> {
        parent_prefix_of_key(self.key)
    }
}
