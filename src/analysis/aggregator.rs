//! Record grouping and summation.
//!
//! This module provides the in-memory aggregation primitives the dashboard
//! pipelines are built from: partitioning fetched rows under string keys and
//! summing a numeric field per group.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Error produced while grouping records.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A derived key could not be computed for a record.
    #[error("cannot derive '{key}' key: {reason}")]
    KeyDerivation { key: String, reason: String },
}

/// Extracts the grouping key from a record.
///
/// `Field` reads a named field straight off the record and cannot fail.
/// `Derive` computes the key, typically by joining against a side table, and
/// reports records the key cannot be derived for.
pub enum KeySelector<R> {
    /// A key read directly from the record.
    Field {
        /// Name of the field, used in logs and error messages.
        name: &'static str,
        /// Accessor returning the field as the group key.
        get: fn(&R) -> String,
    },
    /// A key computed from the record.
    Derive {
        /// Name of the derived key, used in logs and error messages.
        name: &'static str,
        /// Derivation returning the key, or the reason it has none.
        derive: Box<dyn Fn(&R) -> Result<String, String> + Send + Sync>,
    },
}

impl<R> KeySelector<R> {
    /// Creates a selector over a plain record field.
    pub fn field(name: &'static str, get: fn(&R) -> String) -> Self {
        KeySelector::Field { name, get }
    }

    /// Creates a selector that derives the key from the record.
    pub fn derive<F>(name: &'static str, derive: F) -> Self
    where
        F: Fn(&R) -> Result<String, String> + Send + Sync + 'static,
    {
        KeySelector::Derive {
            name,
            derive: Box::new(derive),
        }
    }

    /// Name of the key this selector produces.
    pub fn name(&self) -> &'static str {
        match self {
            KeySelector::Field { name, .. } => name,
            KeySelector::Derive { name, .. } => name,
        }
    }

    fn key_of(&self, row: &R) -> Result<String, AggregateError> {
        match self {
            KeySelector::Field { get, .. } => Ok(get(row)),
            KeySelector::Derive { name, derive } => {
                derive(row).map_err(|reason| AggregateError::KeyDerivation {
                    key: (*name).to_string(),
                    reason,
                })
            }
        }
    }
}

impl<R> fmt::Debug for KeySelector<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySelector::Field { name, .. } => f.debug_struct("Field").field("name", name).finish(),
            KeySelector::Derive { name, .. } => {
                f.debug_struct("Derive").field("name", name).finish()
            }
        }
    }
}

/// Rows partitioned under string keys.
///
/// Keys are kept in first-appearance order and rows keep their input order
/// within each group, so chart labels come out deterministic.
#[derive(Debug, Clone)]
pub struct Grouping<R> {
    keys: Vec<String>,
    groups: HashMap<String, Vec<R>>,
}

impl<R> Default for Grouping<R> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            groups: HashMap::new(),
        }
    }
}

impl<R> Grouping<R> {
    /// Group keys in first-appearance order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Rows grouped under `key`, in input order.
    pub fn group(&self, key: &str) -> Option<&[R]> {
        self.groups.get(key).map(|rows| rows.as_slice())
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the grouping holds no groups at all.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates groups in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[R])> {
        self.keys
            .iter()
            .filter_map(move |k| self.groups.get(k).map(|rows| (k.as_str(), rows.as_slice())))
    }

    fn push(&mut self, key: String, row: R) {
        if !self.groups.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.groups.entry(key).or_default().push(row);
    }
}

/// Partitions `rows` into groups keyed by `key`.
///
/// Every row lands in exactly one group. A failing `Derive` selector aborts
/// the whole grouping; there is no partial result.
pub fn group_by<R: Clone>(
    rows: &[R],
    key: &KeySelector<R>,
) -> Result<Grouping<R>, AggregateError> {
    let mut grouping = Grouping::default();

    for row in rows {
        let k = key.key_of(row)?;
        grouping.push(k, row.clone());
    }

    Ok(grouping)
}

/// Sums `value` over `rows`, starting from zero.
pub fn sum_by<R>(rows: &[R], value: fn(&R) -> f64) -> f64 {
    rows.iter().map(value).sum()
}
