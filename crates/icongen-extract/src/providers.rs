//! Provider discovery for icongen.
//!
//! Providers are the top-level grouping of icons by vendor/platform: each
//! immediate subdirectory of the diagrams library root whose name does not
//! start with an underscore is one provider namespace (`aws`, `gcp`, ...).

use camino::Utf8Path;
use tracing::warn;

use crate::ExtractError;

/// List the provider directories under the library root, sorted
/// lexicographically.
///
/// Underscore-prefixed directories (`__pycache__`, `_internal`, ...) and
/// plain files are not providers. Entries whose metadata cannot be read
/// are skipped with a warning; a root that cannot be listed at all is a
/// fatal error since nothing can be extracted from it.
pub(crate) fn discover(
    library_root: &Utf8Path,
) -> Result<Vec<String>, ExtractError> {
    let mut providers = Vec::new();

    for entry in library_root.read_dir_utf8()? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!(path = %entry.path(), error = %e, "skipping entry without file type");
                continue;
            }
        };

        let name = entry.file_name();
        if file_type.is_dir() && !name.starts_with('_') {
            providers.push(name.to_owned());
        }
    }

    providers.sort();
    Ok(providers)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use camino::Utf8Path;

    use super::*;

    #[test]
    fn test_discover_skips_underscore_dirs_and_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf-8 tempdir");

        for dir in ["gcp", "aws", "_internal", "__pycache__"] {
            fs::create_dir(root.join(dir)).expect("create dir");
        }
        fs::write(root.join("__init__.py"), "").expect("write file");

        let providers = discover(root).expect("discover should succeed");
        assert_eq!(providers, vec!["aws", "gcp"]);
    }

    #[test]
    fn test_discover_empty_root() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf-8 tempdir");

        let providers = discover(root).expect("discover should succeed");
        assert!(providers.is_empty());
    }

    #[test]
    fn test_discover_missing_root_is_fatal() {
        let err = discover(Utf8Path::new("/nonexistent/diagrams"))
            .expect_err("should fail for nonexistent root");
        assert!(err.is_io());
    }
}
