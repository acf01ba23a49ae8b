//! Per-product activity history.
//!
//! Maps a product id to the last time it was published or scheduled.
//! A planning run copies the history once and only ever appends to its
//! copy, so the caller's snapshot is never touched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Product;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(BTreeMap<String, DateTime<Utc>>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the catalog's `last_posted_at` values with persisted history,
    /// keeping the later timestamp for each product.
    pub fn seeded(catalog: &[Product], persisted: &History) -> Self {
        let mut history = persisted.clone();
        for product in catalog {
            if let Some(posted) = product.last_posted_at {
                history.record(&product.id, posted);
            }
        }
        history
    }

    /// Record activity, never moving a product's timestamp backwards.
    pub fn record(&mut self, product_id: &str, at: DateTime<Utc>) {
        self.0
            .entry(product_id.to_string())
            .and_modify(|last| {
                if at > *last {
                    *last = at;
                }
            })
            .or_insert(at);
    }

    pub fn get(&self, product_id: &str) -> Option<DateTime<Utc>> {
        self.0.get(product_id).copied()
    }

    /// Latest known activity for a product, from history or the catalog.
    pub fn last_activity(&self, product: &Product) -> Option<DateTime<Utc>> {
        match (self.get(&product.id), product.last_posted_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DateTime<Utc>)> {
        self.0.iter().map(|(id, at)| (id.as_str(), *at))
    }
}

impl FromIterator<(String, DateTime<Utc>)> for History {
    fn from_iter<I: IntoIterator<Item = (String, DateTime<Utc>)>>(iter: I) -> Self {
        let mut history = History::new();
        for (id, at) in iter {
            history.record(&id, at);
        }
        history
    }
}
