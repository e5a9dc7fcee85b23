//! Icon classification.
//!
//! A class counts as an icon when it carries an icon attribute (directly
//! or through its ancestors) or when its inheritance chain reaches a base
//! literally named `Node` or `Graph`. Against live objects this is a
//! `hasattr` plus `inspect.getmro` check; statically we need an index of
//! every class in the library so base names can be chased across modules.
//! This stays a structural heuristic: false negatives and false positives
//! are accepted, not silently "fixed".

use std::collections::{HashMap, HashSet};
use std::fs;

use camino::Utf8Path;
use tracing::{instrument, warn};

use crate::modules;
use crate::parse::{self, PyClass};

/// Attribute names that conventionally mark icon classes.
const ICON_ATTRS: [&str; 2] = ["_icon", "icon_dir"];

/// Base class names that mark a drawable node in the diagram library.
const NODE_BASES: [&str; 2] = ["Node", "Graph"];

/// Everything the classifier needs to know about one indexed class.
#[derive(Debug)]
struct IndexedClass {
    bases: Vec<String>,
    attrs: HashSet<String>,
}

/// Index of every top-level class in the library, across all modules —
/// including underscore-prefixed ones, where the private base classes
/// (and `Node`/`Graph` themselves) are defined.
#[derive(Debug, Default)]
pub(crate) struct ClassIndex {
    /// (module dotted path, class name) -> class.
    by_module: HashMap<(String, String), IndexedClass>,
    /// Class name -> dotted path of the first module defining it. Fallback
    /// resolution for bases imported from another module.
    by_name: HashMap<String, String>,
}

impl ClassIndex {
    /// Build the index by parsing every Python module under the library
    /// root. Unreadable modules are skipped with a warning; a root that
    /// cannot be walked yields an empty index, which downstream turns into
    /// the empty-result error.
    #[instrument(skip_all, fields(library_root = %library_root))]
    pub(crate) fn build(library_root: &Utf8Path, package: &str) -> Self {
        let mut index = Self::default();

        let discovered =
            match modules::discover(library_root, package, library_root) {
                Ok(discovered) => discovered,
                Err(e) => {
                    warn!(error = %e, "failed to walk library for class index");
                    return index;
                }
            };

        for module in discovered {
            let source = match fs::read_to_string(&module.source) {
                Ok(source) => source,
                Err(e) => {
                    warn!(path = %module.source, error = %e, "skipping unreadable module");
                    continue;
                }
            };
            for class in parse::parse_classes(&source) {
                index.insert(&module.dotted, class);
            }
        }

        index
    }

    fn insert(&mut self, module: &str, class: PyClass) {
        self.by_name
            .entry(class.name.clone())
            .or_insert_with(|| module.to_owned());
        self.by_module.insert(
            (module.to_owned(), class.name.clone()),
            IndexedClass {
                bases: class.bases,
                attrs: class.attrs.into_iter().collect(),
            },
        );
    }

    /// True if `class` (defined in `module`) classifies as an icon class.
    ///
    /// Checks, in order: the class's own attributes, then each base in the
    /// resolved inheritance chain for a `Node`/`Graph` name or an icon
    /// attribute. Unresolvable bases still contribute their literal name
    /// to the chain check; cycles are cut with a visited set.
    pub(crate) fn is_icon_class(&self, module: &str, class: &PyClass) -> bool {
        if class
            .attrs
            .iter()
            .any(|attr| ICON_ATTRS.contains(&attr.as_str()))
        {
            return true;
        }

        let mut visited: HashSet<(String, String)> = HashSet::new();
        let mut pending: Vec<(String, String)> = class
            .bases
            .iter()
            .map(|base| (module.to_owned(), base.clone()))
            .collect();

        while let Some((context, base)) = pending.pop() {
            // Dotted bases like `diagrams.Node` resolve by their last segment.
            let name = base.rsplit('.').next().unwrap_or(&base);
            if NODE_BASES.contains(&name) {
                return true;
            }

            let Some((def_module, info)) = self.resolve(&context, name)
            else {
                continue;
            };
            if !visited.insert((def_module.clone(), name.to_owned())) {
                continue;
            }
            if info
                .attrs
                .iter()
                .any(|attr| ICON_ATTRS.contains(&attr.as_str()))
            {
                return true;
            }
            for parent in &info.bases {
                pending.push((def_module.clone(), parent.clone()));
            }
        }

        false
    }

    /// Resolve a base name: prefer a class defined in the same module,
    /// then fall back to the first module anywhere that defines the name.
    fn resolve(
        &self,
        module: &str,
        name: &str,
    ) -> Option<(String, &IndexedClass)> {
        let local = (module.to_owned(), name.to_owned());
        if let Some(info) = self.by_module.get(&local) {
            return Some((local.0, info));
        }

        let def_module = self.by_name.get(name)?;
        let info = self
            .by_module
            .get(&(def_module.clone(), name.to_owned()))?;
        Some((def_module.clone(), info))
    }
}
