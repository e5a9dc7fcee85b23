//! Python module discovery.
//!
//! Recursively walks a directory of the installed diagrams library and maps
//! every `.py` file to a module: its dotted import path (what Python's
//! `pkgutil.walk_packages` would report) and its file path relative to the
//! library root. No Python code is executed; the walk is pure filesystem
//! traversal.

use std::collections::HashSet;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// A Python module discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PyModule {
    /// Dotted import path, e.g. `diagrams.aws.compute`. An `__init__.py`
    /// maps to its package path (`aws/__init__.py` -> `diagrams.aws`).
    pub dotted: String,

    /// Path relative to the library root, always `/`-separated, e.g.
    /// `aws/compute.py`. Falls back to the bare file name if the path
    /// cannot be made relative.
    pub relative: String,

    /// Absolute path of the source file.
    pub source: Utf8PathBuf,
}

/// Discover all Python modules under `dir`, which must live inside
/// `library_root`. `package` is the library's top-level package name
/// (normally `diagrams`), used as the first dotted segment.
///
/// Modules are deduplicated by dotted name. Entries that are unreadable or
/// would not be importable (non-identifier components, `__pycache__`) are
/// skipped with a warning; only a `dir` that cannot be walked at all is an
/// error, which callers treat as a provider-level failure.
pub(crate) fn discover(
    library_root: &Utf8Path,
    package: &str,
    dir: &Utf8Path,
) -> io::Result<Vec<PyModule>> {
    let mut modules = Vec::new();
    let mut seen = HashSet::new();

    // Sorting by file name keeps discovery order stable across runs, which
    // makes dedup-by-first-occurrence deterministic.
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_walkable);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // Depth 0 means the provider directory itself is unreadable.
            Err(e) if e.depth() == 0 => return Err(io::Error::other(e)),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => path,
            Err(path) => {
                warn!(path = %path.display(), "skipping non-UTF-8 path");
                continue;
            }
        };
        if path.extension() != Some("py") {
            continue;
        }

        if let Some(module) = module_for(library_root, package, &path) {
            if seen.insert(module.dotted.clone()) {
                modules.push(module);
            }
        }
    }

    Ok(modules)
}

/// Walk filter: descend everywhere except `__pycache__` and hidden
/// directories. The walk root itself (depth 0) always passes so provider
/// directories named oddly still error rather than silently vanish.
fn is_walkable(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    name != "__pycache__" && !name.starts_with('.')
}

/// Map a `.py` file path to its module, or None if any path component is
/// not a valid Python identifier (such a module could never be imported,
/// so reflection would never have seen it either).
fn module_for(
    library_root: &Utf8Path,
    package: &str,
    path: &Utf8Path,
) -> Option<PyModule> {
    let stem = path.file_stem()?;

    let Ok(rel) = path.strip_prefix(library_root) else {
        // Outside the library root (symlink escape): fall back to the bare
        // file name rather than failing the module.
        if !is_identifier(stem) {
            warn!(path = %path, "skipping module with non-identifier name");
            return None;
        }
        let dotted = if stem == "__init__" {
            package.to_owned()
        } else {
            format!("{package}.{stem}")
        };
        return Some(PyModule {
            dotted,
            relative: path.file_name()?.to_owned(),
            source: path.to_owned(),
        });
    };

    let components: Vec<&str> = rel.components().map(|c| c.as_str()).collect();
    let (_file, dirs) = components.split_last()?;

    let mut segments = Vec::with_capacity(dirs.len() + 2);
    segments.push(package);
    for dir in dirs {
        if !is_identifier(dir) {
            warn!(path = %path, component = %dir, "skipping module under non-identifier package");
            return None;
        }
        segments.push(dir);
    }
    if stem != "__init__" {
        if !is_identifier(stem) {
            warn!(path = %path, "skipping module with non-identifier name");
            return None;
        }
        segments.push(stem);
    }

    Some(PyModule {
        dotted: segments.join("."),
        // Joining components manually normalizes platform separators to `/`.
        relative: components.join("/"),
        source: path.to_owned(),
    })
}

/// Returns true for strings that are plausible Python identifiers.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
