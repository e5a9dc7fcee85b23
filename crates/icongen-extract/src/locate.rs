//! Locating the installed diagrams library.
//!
//! We never import the library; a Python interpreter on `PATH` is asked
//! where the package lives, and the source tree is read directly from
//! there. Every failure along the way collapses into the single fatal
//! "missing dependency" error, whose message carries the install
//! remediation.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::ExtractError;

/// Locate the root directory of the installed `diagrams` package.
///
/// Resolves `python3` (falling back to `python`) on `PATH` and asks it for
/// `diagrams.__file__`; the package root is that file's parent directory.
///
/// # Errors
///
/// Returns [`ExtractError`] with
/// [`is_library_not_found`](ExtractError::is_library_not_found) set when
/// no interpreter is available, the import fails, or the reported path
/// does not exist.
pub fn locate_library() -> Result<Utf8PathBuf, ExtractError> {
    let python = which::which("python3")
        .or_else(|_| which::which("python"))
        .map_err(|e| {
            ExtractError::library_not_found(format!(
                "no Python interpreter on PATH: {e}"
            ))
        })?;
    debug!(python = %python.display(), "resolved interpreter");

    let output = Command::new(&python)
        .args(["-c", "import diagrams; print(diagrams.__file__)"])
        .output()
        .map_err(|e| {
            ExtractError::library_not_found(format!(
                "failed to run {}: {e}",
                python.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // The last traceback line names the actual failure
        // (e.g. "ModuleNotFoundError: No module named 'diagrams'").
        let reason = stderr
            .trim()
            .lines()
            .last()
            .unwrap_or("unknown import error")
            .to_owned();
        return Err(ExtractError::library_not_found(format!(
            "`import diagrams` failed: {reason}"
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    library_root_from_module_path(stdout.trim())
}

/// Derive the library root from the interpreter-reported `__file__` of the
/// package (`.../diagrams/__init__.py` -> `.../diagrams`).
fn library_root_from_module_path(
    module_path: &str,
) -> Result<Utf8PathBuf, ExtractError> {
    if module_path.is_empty() {
        return Err(ExtractError::library_not_found(
            "interpreter reported an empty module path",
        ));
    }

    let root = Utf8Path::new(module_path).parent().ok_or_else(|| {
        ExtractError::library_not_found(format!(
            "module path {module_path} has no parent directory"
        ))
    })?;

    if !root.is_dir() {
        return Err(ExtractError::library_not_found(format!(
            "library root {root} is not a directory"
        )));
    }

    Ok(root.to_owned())
}

#[cfg(test)]
mod tests {
    use camino::Utf8Path;

    use super::*;

    #[test]
    fn test_root_is_parent_of_init() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf-8 tempdir");
        let init = root.join("__init__.py");

        let located = library_root_from_module_path(init.as_str())
            .expect("should locate the parent directory");
        assert_eq!(located, root);
    }

    #[test]
    fn test_empty_module_path() {
        let err = library_root_from_module_path("")
            .expect_err("empty path should fail");
        assert!(err.is_library_not_found());
    }

    #[test]
    fn test_missing_root_directory() {
        let err =
            library_root_from_module_path("/nonexistent/diagrams/__init__.py")
                .expect_err("missing directory should fail");
        assert!(err.is_library_not_found());
        assert!(err.to_string().contains("pip install diagrams"));
    }
}
