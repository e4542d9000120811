//! CatalogIndex: the category → instrument hierarchy that drives selection.
//!
//! Both levels are `BTreeSet`s, so listings come out deduplicated and in
//! byte-wise (case-sensitive) ascending order. Rows with a null category
//! stay in the table but never show up here.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::AggregatedTable;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    by_category: BTreeMap<String, BTreeSet<String>>,
}

impl CatalogIndex {
    pub fn build(table: &AggregatedTable) -> Self {
        let mut by_category: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in table {
            if let Some(category) = &record.category {
                by_category
                    .entry(category.clone())
                    .or_default()
                    .insert(record.stock.clone());
            }
        }
        Self { by_category }
    }

    /// Distinct non-null categories, sorted ascending.
    pub fn categories(&self) -> Vec<&str> {
        self.by_category.keys().map(String::as_str).collect()
    }

    /// Distinct instruments whose rows carry exactly `category`, sorted ascending.
    ///
    /// Unknown categories yield an empty list.
    pub fn instruments(&self, category: &str) -> Vec<&str> {
        self.by_category
            .get(category)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, category: &str, instrument: &str) -> bool {
        self.by_category
            .get(category)
            .is_some_and(|set| set.contains(instrument))
    }

    pub fn category_count(&self) -> usize {
        self.by_category.len()
    }

    /// Distinct (category, instrument) pairs.
    pub fn pair_count(&self) -> usize {
        self.by_category.values().map(BTreeSet::len).sum()
    }

    /// Distinct instruments across all categories.
    pub fn instrument_count(&self) -> usize {
        self.by_category
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }
}
