//! Canonical containment checks.

use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveError;
use crate::Result;
use crate::path::PathComparator;

/// Verifies that `candidate` resolves to `root` or somewhere below it.
///
/// Both paths are canonicalized, resolving symlinks and relative segments.
/// `candidate` does not need to exist yet: its deepest existing ancestor is
/// canonicalized and the remaining components are resolved lexically.
///
/// # Errors
///
/// Returns `ArchiveError::PathTraversal` (carrying `entry_name`) if the
/// candidate escapes the root, or `ArchiveError::Io` if canonicalization of
/// an existing path fails.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ziptree_core::path::PathComparator;
/// use ziptree_core::security::check_containment;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = Path::new("/tmp/dst");
/// check_containment(root, &root.join("a/b.txt"), "a/b.txt", PathComparator::host())?;
/// assert!(check_containment(root, &root.join("../evil"), "../evil", PathComparator::host()).is_err());
/// # Ok(())
/// # }
/// ```
pub fn check_containment(
    root: &Path,
    candidate: &Path,
    entry_name: &str,
    cmp: PathComparator,
) -> Result<()> {
    let traversal = || ArchiveError::PathTraversal {
        path: PathBuf::from(entry_name),
    };

    let canonical_root = root.canonicalize()?;
    let canonical_candidate = match canonicalize_lenient(candidate) {
        Ok(path) => path,
        // dangling symlink on the way: its target cannot be verified
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => return Err(traversal()),
        Err(e) => return Err(e.into()),
    };

    if cmp.is_within(&canonical_root, &canonical_candidate) {
        Ok(())
    } else {
        Err(traversal())
    }
}

/// Canonicalizes a path that may not exist yet.
///
/// Walks up to the deepest existing ancestor, canonicalizes it, then
/// re-applies the missing tail with `.` dropped and `..` popping. Any tail
/// component that turns out to exist is canonicalized again, so a symlink
/// reached through `missing/..` is still resolved.
///
/// # Errors
///
/// Returns an I/O error if an existing ancestor cannot be canonicalized for
/// any reason other than not existing, and `InvalidInput` if a dangling
/// symlink sits on the path.
pub fn canonicalize_lenient(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut tail: Vec<Component<'_>> = Vec::new();
    let base = loop {
        match existing.canonicalize() {
            Ok(canonical) => break canonical,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if existing.symlink_metadata().is_ok() {
                    return Err(dangling(existing));
                }
            }
            Err(e) => return Err(e),
        }
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                tail.push(last);
                existing = parent;
            }
            _ => return Err(io::Error::new(io::ErrorKind::NotFound, "no existing ancestor")),
        }
    };

    let mut resolved = base;
    for component in tail.into_iter().rev() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(part) => {
                resolved.push(part);
                // after a `..` the path may lead back onto an existing symlink
                if resolved.symlink_metadata().is_ok() {
                    resolved = match resolved.canonicalize() {
                        Ok(canonical) => canonical,
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {
                            return Err(dangling(&resolved));
                        }
                        Err(e) => return Err(e),
                    };
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Ok(resolved)
}

fn dangling(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("dangling symlink: {}", path.display()),
    )
}
