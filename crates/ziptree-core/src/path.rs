//! Pure path arithmetic: normalization, relative names and comparison.
//!
//! Nothing in this module touches the filesystem. Callers that need
//! symlink-resolved paths canonicalize first and hand the result in.

use std::ffi::OsStr;
use std::path::Component;
use std::path::Path;

/// Case-sensitivity policy used when comparing filesystem paths.
///
/// Selected once per process with [`PathComparator::host`] and passed to
/// every component that compares canonical paths.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::path::PathComparator;
///
/// let cmp = PathComparator::CaseInsensitive;
/// assert!(cmp.is_within(Path::new("/Data/Src"), Path::new("/data/src/a.txt")));
///
/// let cmp = PathComparator::CaseSensitive;
/// assert!(!cmp.is_within(Path::new("/Data/Src"), Path::new("/data/src/a.txt")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathComparator {
    /// Components must match byte for byte.
    CaseSensitive,
    /// Components are compared ignoring case.
    CaseInsensitive,
}

impl PathComparator {
    /// Returns the comparator matching the default filesystem of the host.
    ///
    /// Windows and macOS ship case-insensitive filesystems by default.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::CaseInsensitive
        } else {
            Self::CaseSensitive
        }
    }

    /// Compares two path components.
    #[must_use]
    pub fn component_eq(self, a: &OsStr, b: &OsStr) -> bool {
        match self {
            Self::CaseSensitive => a == b,
            Self::CaseInsensitive => {
                a == b || a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
            }
        }
    }

    /// Returns `true` if `candidate` equals `root` or lies below it.
    ///
    /// Comparison is per path component, so `/data/src2` is not within
    /// `/data/src`.
    #[must_use]
    pub fn is_within(self, root: &Path, candidate: &Path) -> bool {
        let mut candidate_components = candidate.components();
        for root_component in root.components() {
            if matches!(root_component, Component::CurDir) {
                continue;
            }
            let next = loop {
                match candidate_components.next() {
                    Some(Component::CurDir) => {}
                    other => break other,
                }
            };
            match next {
                Some(c) if self.component_eq(c.as_os_str(), root_component.as_os_str()) => {}
                _ => return false,
            }
        }
        true
    }

    /// Strips `root` from the front of `path`, both in normalized `/` form.
    ///
    /// The match must end on a segment boundary. The returned remainder has
    /// no leading separator.
    #[must_use]
    pub fn strip_prefix<'a>(self, path: &'a str, root: &str) -> Option<&'a str> {
        let root = root.trim_end_matches('/');
        if root.is_empty() {
            return Some(path.trim_start_matches('/'));
        }
        let head = path.get(..root.len())?;
        let matched = match self {
            Self::CaseSensitive => head == root,
            Self::CaseInsensitive => head.to_lowercase() == root.to_lowercase(),
        };
        if !matched {
            return None;
        }
        let rest = &path[root.len()..];
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest.trim_start_matches('/'))
        } else {
            None
        }
    }
}

impl Default for PathComparator {
    fn default() -> Self {
        Self::host()
    }
}

/// Normalizes a path string.
///
/// - `\` is reconciled to `/` and repeated separators collapse
/// - `.` segments are dropped
/// - `..` segments cancel the preceding normal segment; any left over at the
///   front are dropped rather than escaping the prefix
/// - a drive or scheme prefix (`C:`, `file:`) and a leading `/` are kept
///
/// The function is idempotent.
///
/// # Examples
///
/// ```
/// use ziptree_core::path::normalize;
///
/// assert_eq!(normalize("a/./b/"), "a/b");
/// assert_eq!(normalize("/a/../b"), "/b");
/// assert_eq!(normalize("C:\\dir\\..\\file.txt"), "C:/file.txt");
/// assert_eq!(normalize("../../etc"), "etc");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");

    let (prefix, rest) = match unified.find(':') {
        Some(idx) if !unified[..idx].contains('/') => unified.split_at(idx + 1),
        _ => ("", unified.as_str()),
    };
    let absolute = rest.starts_with('/');

    let mut ascend = 0usize;
    let mut kept: Vec<&str> = Vec::new();
    for segment in rest.split('/').rev() {
        match segment {
            "" | "." => {}
            ".." => ascend += 1,
            _ if ascend > 0 => ascend -= 1,
            _ => kept.push(segment),
        }
    }
    kept.reverse();

    let mut out = String::with_capacity(unified.len());
    out.push_str(prefix);
    if absolute {
        out.push('/');
    }
    out.push_str(&kept.join("/"));
    out
}

/// Computes the `/`-separated name of `file` relative to `root`.
///
/// Both paths are normalized first; callers pass canonical absolute paths.
/// Returns `None` when `file` is not located under `root` or is not valid
/// UTF-8.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::path::PathComparator;
/// use ziptree_core::path::relative_path;
///
/// let name = relative_path(
///     Path::new("/tmp/src/sub/b.txt"),
///     Path::new("/tmp/src"),
///     PathComparator::CaseSensitive,
/// );
/// assert_eq!(name.as_deref(), Some("sub/b.txt"));
/// ```
#[must_use]
pub fn relative_path(file: &Path, root: &Path, cmp: PathComparator) -> Option<String> {
    let file = normalize(file.to_str()?);
    let root = normalize(root.to_str()?);
    cmp.strip_prefix(&file, &root).map(str::to_string)
}

/// Returns the final segment of a `/` or `\` separated path.
///
/// # Examples
///
/// ```
/// use ziptree_core::path::base_name;
///
/// assert_eq!(base_name("dir/sub/file.tar.gz"), "file.tar.gz");
/// assert_eq!(base_name("dir/sub/"), "sub");
/// ```
#[must_use]
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed
        .rfind(['/', '\\'])
        .map_or(trimmed, |idx| &trimmed[idx + 1..])
}

/// Returns the extension of the final segment, without the dot.
///
/// # Examples
///
/// ```
/// use ziptree_core::path::extension;
///
/// assert_eq!(extension("archive.zip"), Some("zip"));
/// assert_eq!(extension(".hidden"), None);
/// assert_eq!(extension("noext"), None);
/// ```
#[must_use]
pub fn extension(path: &str) -> Option<&str> {
    let name = base_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}
