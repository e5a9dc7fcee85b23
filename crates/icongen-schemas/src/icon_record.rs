//! The icon record schema.
//!
//! One [`IconRecord`] is emitted per discovered icon class. The JSON field
//! order is part of the output contract and follows the struct declaration
//! order below, so do not reorder fields without bumping consumers.

use serde::{Deserialize, Serialize};

/// Metadata for a single icon class discovered in the diagrams library.
///
/// `import_path` is the unique key across the output set: two records with
/// the same import path would address the same class, so extraction
/// deduplicates on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRecord {
    /// Class identifier, e.g. `"EC2"`.
    pub name: String,

    /// Dotted path uniquely addressing the class, e.g.
    /// `"diagrams.aws.compute.EC2"`.
    pub import_path: String,

    /// First line of the class docstring, or empty if the class has none.
    pub docstring: String,

    /// Provider namespace: the second dot-segment of the defining module's
    /// path (`"aws"` in `diagrams.aws.compute`), or `"unknown"`.
    pub provider: String,

    /// File path of the defining module relative to the library root,
    /// always `/`-separated, e.g. `"aws/compute.py"`.
    pub module: String,

    /// Reserved for future use; always empty today.
    pub aliases: Vec<String>,
}

impl IconRecord {
    /// Sort key for the output array: provider, then name, then import
    /// path. Consumers only rely on (provider, name); the import path is a
    /// tiebreaker so that equal-named classes in different modules still
    /// serialize in a deterministic order.
    pub fn sort_key(&self) -> (&str, &str, &str) {
        (&self.provider, &self.name, &self.import_path)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn record(provider: &str, name: &str, import_path: &str) -> IconRecord {
        IconRecord {
            name: name.to_string(),
            import_path: import_path.to_string(),
            docstring: String::new(),
            provider: provider.to_string(),
            module: format!("{provider}/x.py"),
            aliases: Vec::new(),
        }
    }

    /// JSON field order is a contract: name, import_path, docstring,
    /// provider, module, aliases, in that order, nothing omitted.
    #[test]
    fn serializes_fields_in_contract_order() {
        let rec = IconRecord {
            name: "EC2".to_string(),
            import_path: "diagrams.aws.compute.EC2".to_string(),
            docstring: "Elastic Compute Cloud".to_string(),
            provider: "aws".to_string(),
            module: "aws/compute.py".to_string(),
            aliases: Vec::new(),
        };

        let json = serde_json::to_string(&rec).expect("serialize");
        assert_eq!(
            json,
            concat!(
                r#"{"name":"EC2","import_path":"diagrams.aws.compute.EC2","#,
                r#""docstring":"Elastic Compute Cloud","provider":"aws","#,
                r#""module":"aws/compute.py","aliases":[]}"#,
            )
        );
    }

    /// Empty docstrings and alias lists are serialized explicitly, not
    /// skipped — consumers rely on the full field set being present.
    #[test]
    fn empty_fields_are_not_skipped() {
        let rec = record("aws", "EC2", "diagrams.aws.compute.EC2");
        let json = serde_json::to_string(&rec).expect("serialize");
        assert!(json.contains(r#""docstring":"""#));
        assert!(json.contains(r#""aliases":[]"#));
    }

    #[test]
    fn sort_key_orders_by_provider_then_name() {
        let mut records = vec![
            record("gcp", "Compute", "diagrams.gcp.compute.Compute"),
            record("aws", "S3", "diagrams.aws.storage.S3"),
            record("aws", "EC2", "diagrams.aws.compute.EC2"),
        ];
        records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["EC2", "S3", "Compute"]);
    }

    /// Strategy for identifier-ish strings so generated records look like
    /// real class and provider names.
    fn arb_ident() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9]{0,8}"
    }

    prop_compose! {
        fn arb_record()
            (provider in arb_ident(), name in arb_ident(), module in arb_ident())
        -> IconRecord {
            let import_path = format!("diagrams.{provider}.{module}.{name}");
            IconRecord {
                name,
                import_path,
                docstring: String::new(),
                provider: provider.clone(),
                module: format!("{provider}/{module}.py"),
                aliases: Vec::new(),
            }
        }
    }

    proptest! {
        /// Sorting by `sort_key` always yields provider-ascending,
        /// name-ascending output for every adjacent pair — the ordering
        /// the output contract promises.
        #[test]
        fn sorted_records_are_provider_then_name_ordered(
            mut records in proptest::collection::vec(arb_record(), 0..20)
        ) {
            records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
            for pair in records.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(
                    (a.provider.as_str(), a.name.as_str())
                        <= (b.provider.as_str(), b.name.as_str())
                );
            }
        }

        /// Records survive a JSON roundtrip unchanged.
        #[test]
        fn roundtrip(rec in arb_record()) {
            let json = serde_json::to_string(&rec).expect("serialize");
            let parsed: IconRecord =
                serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(parsed, rec);
        }
    }
}
