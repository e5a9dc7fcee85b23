//! Schema types for the icongen extraction pipeline.
//!
//! The extraction phase produces a flat list of [`IconRecord`]s which is
//! serialized to `icons.json`. Keeping the record type in its own crate
//! pins down the on-disk contract (field set, field order, sort order)
//! independently of how extraction is implemented.

mod icon_record;

pub use icon_record::IconRecord;
