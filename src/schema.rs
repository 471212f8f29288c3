//! Autocomplete schema slot
//!
//! The editor reads its completion dictionary from a [`SchemaSlot`] on every
//! completion request. Replacing the schema swaps an `Arc` snapshot, so it can
//! happen at any time (e.g. after the user picks another database) without
//! rebuilding the editor or interrupting typing.

use arc_swap::ArcSwap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use strsim::normalized_levenshtein;
use tracing::{debug, info};

/// Minimum similarity for a fuzzy table suggestion
const FUZZY_CUTOFF: f64 = 0.6;

/// Keywords offered alongside table names
const SQL_KEYWORDS: &[&str] = &[
    "select", "from", "where", "and", "or", "not", "null", "is", "in", "like", "between",
    "insert", "into", "values", "update", "set", "delete", "create", "drop", "alter", "table",
    "index", "view", "truncate", "grant", "revoke", "join", "inner", "left", "right", "outer",
    "full", "cross", "on", "using", "group", "by", "having", "order", "asc", "desc", "limit",
    "offset", "distinct", "as", "union", "all", "exists", "case", "when", "then", "else", "end",
    "count", "sum", "avg", "min", "max", "commit", "rollback", "with", "explain",
];

/// Immutable view of the schema at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    /// Bumped each time the table set actually changes
    pub version: u64,
    /// Table name to column names (columns may be empty)
    pub tables: BTreeMap<String, Vec<String>>,
}

impl SchemaSnapshot {
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// What a suggestion refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Table,
    Column,
    Keyword,
}

/// A single autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub label: String,
    pub kind: CompletionKind,
    pub score: f64,
}

/// Replaceable, versioned autocomplete configuration
#[derive(Debug)]
pub struct SchemaSlot {
    snap: ArcSwap<SchemaSnapshot>,
    upper_case_keywords: bool,
}

impl Default for SchemaSlot {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SchemaSlot {
    pub fn new(upper_case_keywords: bool) -> Self {
        Self {
            snap: ArcSwap::from_pointee(SchemaSnapshot::default()),
            upper_case_keywords,
        }
    }

    /// Current snapshot; cheap, lock-free
    pub fn snapshot(&self) -> Arc<SchemaSnapshot> {
        self.snap.load_full()
    }

    pub fn version(&self) -> u64 {
        self.snap.load().version
    }

    /// Replace the schema with `table_names` (no column information).
    ///
    /// Blank and duplicate names are dropped. Re-sending the same table set is
    /// a no-op and leaves the version untouched. Returns whether anything
    /// changed.
    pub fn update(&self, table_names: &[String]) -> bool {
        let tables: BTreeMap<String, Vec<String>> = table_names
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|t| (t.to_string(), Vec::new()))
            .collect();
        self.replace(tables)
    }

    /// Replace the schema including column names per table
    pub fn update_with_columns(&self, tables: BTreeMap<String, Vec<String>>) -> bool {
        self.replace(tables)
    }

    fn replace(&self, tables: BTreeMap<String, Vec<String>>) -> bool {
        let prev = self.snap.rcu(|cur| {
            if cur.tables == tables {
                Arc::clone(cur)
            } else {
                Arc::new(SchemaSnapshot {
                    version: cur.version + 1,
                    tables: tables.clone(),
                })
            }
        });

        let changed = prev.tables != tables;
        if changed {
            info!(
                "📚 Editor schema updated with {} tables (v{})",
                tables.len(),
                prev.version + 1
            );
        } else {
            debug!("Schema unchanged, keeping v{}", prev.version);
        }
        changed
    }

    /// Suggestions for the word being typed.
    ///
    /// `tbl.col` prefixes complete columns of `tbl`. Otherwise tables whose
    /// name starts with the prefix come first, then keywords, then tables that
    /// are merely similar. Matching is case-insensitive.
    pub fn complete(&self, prefix: &str, limit: usize) -> Vec<Completion> {
        let prefix = prefix.trim();
        if prefix.is_empty() || limit == 0 {
            return Vec::new();
        }

        let snap = self.snap.load();
        let needle = prefix.to_lowercase();

        if let Some((table, col)) = needle.split_once('.') {
            return Self::complete_columns(&snap, table, col, limit);
        }

        let mut out: Vec<Completion> = snap
            .table_names()
            .filter(|t| t.to_lowercase().starts_with(&needle))
            .map(|t| Completion {
                label: t.to_string(),
                kind: CompletionKind::Table,
                score: 1.0,
            })
            .collect();

        out.extend(
            SQL_KEYWORDS
                .iter()
                .filter(|k| k.starts_with(&needle))
                .map(|k| Completion {
                    label: if self.upper_case_keywords {
                        k.to_uppercase()
                    } else {
                        k.to_string()
                    },
                    kind: CompletionKind::Keyword,
                    score: 1.0,
                }),
        );

        let mut fuzzy: Vec<Completion> = snap
            .table_names()
            .filter(|t| !out.iter().any(|c| c.label == *t))
            .filter_map(|t| {
                let score = normalized_levenshtein(&needle, &t.to_lowercase());
                (score >= FUZZY_CUTOFF).then(|| Completion {
                    label: t.to_string(),
                    kind: CompletionKind::Table,
                    score,
                })
            })
            .collect();
        fuzzy.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        out.extend(fuzzy);

        out.truncate(limit);
        out
    }

    fn complete_columns(
        snap: &SchemaSnapshot,
        table: &str,
        col: &str,
        limit: usize,
    ) -> Vec<Completion> {
        snap.tables
            .iter()
            .filter(|(name, _)| name.to_lowercase() == table)
            .flat_map(|(_, cols)| cols.iter())
            .filter(|c| c.to_lowercase().starts_with(col))
            .take(limit)
            .map(|c| Completion {
                label: c.clone(),
                kind: CompletionKind::Column,
                score: 1.0,
            })
            .collect()
    }
}
