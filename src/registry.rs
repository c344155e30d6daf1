//! The catalog of MIME type records, indexed by identifier and by
//! file extension.
//!
//! A registry is built once from definition sources and then queried;
//! `add` takes `&mut self` so population is single-writer by
//! construction, and a fully built registry can be shared freely behind
//! `Arc` for read-only querying.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use crate::grammar;
use crate::mime_type::MimeType;

/// Optional filters for the query operations, AND-composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryFlags {
    /// Keep only records with at least one extension.
    pub complete: bool,
    /// Keep only records matching the current platform.
    pub platform: bool,
}

/// A registry of MIME type definitions.
///
/// Records are shared between the identifier index and the extension
/// index; entries are never removed or mutated in place.
///
/// # Examples
///
/// ```
/// use mime_registry::{MimeType, Registry};
///
/// let mut registry = Registry::new();
/// let mut t = MimeType::new("text/plain").unwrap();
/// t.set_extensions(["txt"]);
/// registry.add(t);
///
/// assert_eq!(registry.lookup("text/plain").len(), 1);
/// assert_eq!(registry.type_for("notes.txt", false).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    data_version: Option<String>,
    by_identifier: HashMap<String, Vec<Arc<MimeType>>>,
    by_extension: HashMap<String, Vec<Arc<MimeType>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Creates an empty registry tagged with a data version.
    pub fn with_version(data_version: impl Into<String>) -> Registry {
        Registry {
            data_version: Some(data_version.into()),
            ..Registry::default()
        }
    }

    /// The data-version tag, if any.
    pub fn data_version(&self) -> Option<&str> {
        self.data_version.as_deref()
    }

    /// Registers a record under its simplified identifier and under each
    /// of its extensions.
    ///
    /// Registering a record equal to an already-present variant is
    /// permitted; it is logged at warn level and indexed anyway, since
    /// the registry is multi-valued per key.
    pub fn add(&mut self, record: MimeType) {
        self.add_shared(Arc::new(record));
    }

    fn add_shared(&mut self, record: Arc<MimeType>) {
        let key = record.simplified().to_string();
        if let Some(variants) = self.by_identifier.get(&key) {
            if variants.iter().any(|v| **v == *record) {
                warn!(
                    content_type = %record.content_type(),
                    simplified = %key,
                    "type already registered as a variant"
                );
            }
        }
        for ext in record.extensions() {
            self.by_extension
                .entry(ext.to_ascii_lowercase())
                .or_default()
                .push(Arc::clone(&record));
        }
        self.by_identifier.entry(key).or_default().push(record);
    }

    /// Registers every record of another registry, sharing the records
    /// rather than copying them.
    pub fn merge(&mut self, other: &Registry) {
        for record in other.defined_types() {
            self.add_shared(Arc::clone(record));
        }
    }

    /// Exact lookup by identifier, normalized first.
    ///
    /// Unknown or unsimplifiable identifiers give an empty result, never
    /// an error.
    pub fn lookup(&self, identifier: &str) -> Vec<Arc<MimeType>> {
        grammar::simplify(identifier)
            .and_then(|key| self.by_identifier.get(&key))
            .map(|variants| variants.to_vec())
            .unwrap_or_default()
    }

    /// Looks up the variants sharing a record's simplified identifier.
    pub fn lookup_record(&self, record: &MimeType) -> Vec<Arc<MimeType>> {
        self.by_identifier
            .get(record.simplified())
            .map(|variants| variants.to_vec())
            .unwrap_or_default()
    }

    /// All records whose simplified identifier matches the pattern.
    ///
    /// Within one identifier the insertion order is kept; the order
    /// across identifiers is unspecified.
    pub fn matching(&self, pattern: &Regex) -> Vec<Arc<MimeType>> {
        self.by_identifier
            .iter()
            .filter(|(key, _)| pattern.is_match(key))
            .flat_map(|(_, variants)| variants.iter().cloned())
            .collect()
    }

    /// Exact lookup pruned by the given flags.
    pub fn filtered(&self, identifier: &str, flags: QueryFlags) -> Vec<Arc<MimeType>> {
        prune(self.lookup(identifier), flags)
    }

    /// Pattern lookup pruned by the given flags.
    pub fn filtered_matching(&self, pattern: &Regex, flags: QueryFlags) -> Vec<Arc<MimeType>> {
        prune(self.matching(pattern), flags)
    }

    /// The types registered for a filename's extension.
    ///
    /// The extension is the substring after the final `.`, lowercased; a
    /// dotless filename is treated as an extension itself. With
    /// `platform` set, only records matching the current platform are
    /// returned.
    pub fn type_for(&self, filename: &str, platform: bool) -> Vec<Arc<MimeType>> {
        let ext = filename
            .rsplit('.')
            .next()
            .unwrap_or(filename)
            .to_lowercase();
        let mut records = self
            .by_extension
            .get(&ext)
            .map(|variants| variants.to_vec())
            .unwrap_or_default();
        if platform {
            records.retain(|t| t.is_platform());
        }
        records
    }

    /// The record ranked most reliable among an identifier's variants.
    ///
    /// Ties keep the earliest-registered variant.
    pub fn preferred(&self, identifier: &str) -> Option<Arc<MimeType>> {
        let mut best: Option<Arc<MimeType>> = None;
        for record in self.lookup(identifier) {
            match &best {
                Some(current) if record.priority_cmp(current) != Ordering::Less => {}
                _ => best = Some(record),
            }
        }
        best
    }

    /// Lazily enumerates every distinct registered record.
    pub fn defined_types(&self) -> impl Iterator<Item = &Arc<MimeType>> {
        self.by_identifier.values().flatten()
    }

    /// Total number of registered records.
    pub fn count(&self) -> usize {
        self.defined_types().count()
    }

    /// True when no records are registered.
    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }

    /// True when any registered record satisfies the predicate.
    pub fn any<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&MimeType) -> bool,
    {
        self.defined_types().any(|t| predicate(t))
    }

    /// True when every registered record satisfies the predicate.
    pub fn all<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&MimeType) -> bool,
    {
        self.defined_types().all(|t| predicate(t))
    }
}

fn prune(mut records: Vec<Arc<MimeType>>, flags: QueryFlags) -> Vec<Arc<MimeType>> {
    if flags.complete {
        records.retain(|t| t.is_complete());
    }
    if flags.platform {
        records.retain(|t| t.is_platform());
    }
    records
}
