//! Table fingerprinting: a deterministic content hash of an aggregated table.
//!
//! Two pipeline runs over the same source with the same settings must produce
//! the same fingerprint. Floats are hashed by bit pattern, so "equal" means
//! bit-identical, not approximately equal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{AggregatedTable, Record};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableFingerprint(pub String);

impl TableFingerprint {
    pub fn of(table: &AggregatedTable) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(table.len() as u64).to_le_bytes());
        for record in table {
            hash_record(&mut hasher, record);
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    /// First 12 hex chars, for display.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for TableFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn hash_record(hasher: &mut blake3::Hasher, record: &Record) {
    hasher.update(record.date.to_string().as_bytes());
    hash_str(hasher, Some(&record.stock));
    hash_str(hasher, record.category.as_deref());
    for value in [record.close, record.sma_50, record.sma_200] {
        match value {
            Some(v) => {
                hasher.update(&[1]);
                hasher.update(&v.to_bits().to_le_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }
    }
}

// Length-prefixed so ("AB", "C") and ("A", "BC") hash differently.
fn hash_str(hasher: &mut blake3::Hasher, s: Option<&str>) {
    match s {
        Some(s) => {
            hasher.update(&[1]);
            hasher.update(&(s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}
