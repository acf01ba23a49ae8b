//! Plan output — assignments plus non-fatal diagnostics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use postaja_core::Objective;

use crate::slots::Slot;

/// One filled slot: which product to feature, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSlotAssignment {
    pub slot: Slot,
    pub product_id: String,
    pub objective: Objective,
}

/// Structured note about a fallback or an unmet constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No eligible product existed for this slot.
    UnassignedSlot { slot: Slot, objective: Objective },
    /// Every candidate was inside the repetition window; the least
    /// recently used product was reused.
    RepetitionFallback {
        slot: Slot,
        product_id: String,
        /// `None` if the product had no prior activity.
        days_since_last: Option<i64>,
    },
    /// Only promotional products were left, so the weekly cap was exceeded.
    PromotionalCapOverride {
        slot: Slot,
        product_id: String,
        /// Promotional assignments in the trailing window, including this one.
        window_count: u32,
    },
}

impl Diagnostic {
    pub fn slot(&self) -> &Slot {
        match self {
            Diagnostic::UnassignedSlot { slot, .. }
            | Diagnostic::RepetitionFallback { slot, .. }
            | Diagnostic::PromotionalCapOverride { slot, .. } => slot,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Diagnostic::UnassignedSlot { slot, objective } => {
                format!("{slot}: no product in stock for a {objective} post")
            }
            Diagnostic::RepetitionFallback {
                slot,
                product_id,
                days_since_last,
            } => match days_since_last {
                Some(days) => format!(
                    "{slot}: reused {product_id} after {days} day(s), no other product available"
                ),
                None => format!("{slot}: reused {product_id}, no other product available"),
            },
            Diagnostic::PromotionalCapOverride {
                slot,
                product_id,
                window_count,
            } => format!(
                "{slot}: promotional cap exceeded with {product_id} ({window_count} this week)"
            ),
        }
    }
}

/// Ordered output of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub horizon_start: NaiveDate,
    pub horizon_days: u32,
    /// Chronological, at most one per slot.
    pub assignments: Vec<ScheduledSlotAssignment>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Plan {
    pub fn new(horizon_start: NaiveDate, horizon_days: u32) -> Self {
        Self {
            horizon_start,
            horizon_days,
            assignments: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn unassigned_slots(&self) -> Vec<&Slot> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnassignedSlot { slot, .. } => Some(slot),
                _ => None,
            })
            .collect()
    }

    pub fn fallback_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::RepetitionFallback { .. }))
            .count()
    }

    pub fn cap_override_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::PromotionalCapOverride { .. }))
            .count()
    }

    /// Assignments per objective.
    pub fn objective_counts(&self) -> BTreeMap<Objective, u32> {
        let mut counts = BTreeMap::new();
        for assignment in &self.assignments {
            *counts.entry(assignment.objective).or_insert(0) += 1;
        }
        counts
    }

    /// Every generated slot received a product.
    pub fn is_complete(&self) -> bool {
        self.unassigned_slots().is_empty()
    }

    /// One-line banner text for the store owner, if anything needs attention.
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        let unassigned = self.unassigned_slots().len();
        if unassigned > 0 {
            parts.push(format!(
                "{unassigned} slot(s) could not be filled because no product is in stock"
            ));
        }
        let fallbacks = self.fallback_count();
        if fallbacks > 0 {
            parts.push(format!(
                "{fallbacks} post(s) repeat a product inside the repetition window"
            ));
        }
        let overrides = self.cap_override_count();
        if overrides > 0 {
            parts.push(format!("{overrides} post(s) exceed the weekly promotional cap"));
        }
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}
