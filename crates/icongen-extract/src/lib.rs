//! Icon metadata extraction from the diagrams Python library.
//!
//! This crate walks an installed copy of the `diagrams` package and emits
//! one [`IconRecord`] per icon class it finds. Everything Python runtime
//! reflection (`pkgutil.walk_packages` + `inspect`) would report is
//! recovered by static source analysis instead: no Python code is executed
//! beyond asking the interpreter where the package lives.
//!
//! ## Pipeline
//!
//! 1. [`locate_library`] finds the installed package root.
//! 2. [`extract`] enumerates providers, discovers and parses their
//!    modules, classifies classes against a whole-library index, and
//!    returns the sorted, deduplicated record set.
//! 3. [`write_icons`] serializes the records as pretty-printed JSON.
//!
//! ## Re-exports
//!
//! This crate re-exports [`IconRecord`] from `icongen-schemas` for
//! convenience.

mod classify;
mod error;
mod locate;
mod modules;
mod parse;
mod providers;

use std::collections::HashSet;
use std::fs;
use std::io::Write;

use camino::Utf8Path;
// Re-export the schema type for convenience.
#[doc(inline)]
pub use icongen_schemas::IconRecord;
use tracing::{instrument, warn};

#[doc(inline)]
pub use crate::error::ExtractError;
pub use crate::locate::locate_library;

/// Per-provider result, delivered through the progress callback of
/// [`extract`] as each provider finishes, in sorted provider order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcome {
    /// Provider directory name (`aws`, `gcp`, ...).
    pub provider: String,
    /// What happened to it.
    pub status: ProviderStatus,
}

/// Outcome of processing one provider directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    /// Processed successfully; the number of icon records it contributed
    /// (before cross-provider deduplication).
    Extracted(usize),
    /// The provider directory could not be processed and was skipped.
    Skipped,
}

/// Extract all icon records from the library rooted at `library_root`.
///
/// `progress` is invoked once per provider, in sorted order, as soon as
/// that provider completes. Provider-level failures become a
/// [`ProviderStatus::Skipped`] outcome; module- and class-level failures
/// are logged and omitted. Neither aborts the run.
///
/// The returned records are deduplicated by import path (first occurrence
/// wins) and sorted by provider, then name.
///
/// # Errors
///
/// Returns [`ExtractError`] if:
/// - The library root cannot be listed ([`ExtractError::is_io`])
/// - Zero records were produced ([`ExtractError::is_no_icons`])
#[instrument(skip(progress))]
pub fn extract(
    library_root: &Utf8Path,
    progress: &mut dyn FnMut(&ProviderOutcome),
) -> Result<Vec<IconRecord>, ExtractError> {
    let package = library_root.file_name().unwrap_or("diagrams");

    // Index every class in the library up front: the private base classes
    // (and Node/Graph themselves) live in the root package and in
    // underscore modules, outside the provider walk below.
    let index = classify::ClassIndex::build(library_root, package);

    let mut icons = Vec::new();
    for provider in providers::discover(library_root)? {
        let status =
            match extract_provider(library_root, package, &provider, &index) {
                Ok(records) => {
                    let count = records.len();
                    icons.extend(records);
                    ProviderStatus::Extracted(count)
                }
                Err(e) => {
                    warn!(provider = %provider, error = %e, "skipping provider");
                    ProviderStatus::Skipped
                }
            };
        progress(&ProviderOutcome { provider, status });
    }

    // Import paths are the identity of a record; keep the first of any
    // duplicates, then impose the output ordering.
    let mut seen = HashSet::new();
    icons.retain(|icon| seen.insert(icon.import_path.clone()));
    icons.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    if icons.is_empty() {
        return Err(ExtractError::no_icons());
    }
    Ok(icons)
}

/// Extract the records of a single provider. An error here means the
/// provider directory itself could not be walked; the caller reports it
/// as skipped and carries on.
fn extract_provider(
    library_root: &Utf8Path,
    package: &str,
    provider: &str,
    index: &classify::ClassIndex,
) -> std::io::Result<Vec<IconRecord>> {
    let provider_dir = library_root.join(provider);
    let mut records = Vec::new();

    for module in modules::discover(library_root, package, &provider_dir)? {
        let source = match fs::read_to_string(&module.source) {
            Ok(source) => source,
            Err(e) => {
                warn!(path = %module.source, error = %e, "skipping unreadable module");
                continue;
            }
        };

        for class in parse::parse_classes(&source) {
            // Private classes are never icons, whatever their attributes.
            if class.name.starts_with('_') {
                continue;
            }
            if !index.is_icon_class(&module.dotted, &class) {
                continue;
            }

            // Provider is the second dot-segment of the module path
            // (`aws` in `diagrams.aws.compute`).
            let provider_segment = module
                .dotted
                .split('.')
                .nth(1)
                .unwrap_or("unknown")
                .to_owned();

            records.push(IconRecord {
                import_path: format!("{}.{}", module.dotted, class.name),
                name: class.name,
                docstring: class.docstring,
                provider: provider_segment,
                module: module.relative.clone(),
                aliases: Vec::new(),
            });
        }
    }

    Ok(records)
}

/// Serialize records as a pretty-printed (2-space indent) JSON array,
/// fields in schema order, followed by a trailing newline.
///
/// # Errors
///
/// Returns [`ExtractError`] if serialization or the underlying write
/// fails ([`ExtractError::is_serialization`] / [`ExtractError::is_io`]).
pub fn write_icons(
    icons: &[IconRecord],
    output: &mut dyn Write,
) -> Result<(), ExtractError> {
    serde_json::to_writer_pretty(&mut *output, icons)?;
    writeln!(output)?;
    Ok(())
}
