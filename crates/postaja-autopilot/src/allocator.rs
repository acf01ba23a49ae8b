//! Objective allocation — distribute slots across the objective mix.
//!
//! Uses the largest-remainder method so the targets always sum to the
//! slot count and each target is within 1 of its proportional share.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use postaja_core::config::validate_objectives;
use postaja_core::{ConfigError, Objective, ObjectiveMix};

use crate::error::PlanResult;

/// Percentages within this distance of 100 are used as given.
const SUM_TOLERANCE: f64 = 0.01;

/// Target slot counts per objective for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub total_slots: u32,
    pub targets: BTreeMap<Objective, u32>,
    /// Normalized percentages (summing to 100).
    pub percentages: BTreeMap<Objective, f64>,
}

impl Allocation {
    pub fn target(&self, objective: Objective) -> u32 {
        self.targets.get(&objective).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.targets.values().sum()
    }

    /// Exact proportional share before rounding.
    pub fn ideal(&self, objective: Objective) -> f64 {
        let pct = self.percentages.get(&objective).copied().unwrap_or(0.0);
        pct * f64::from(self.total_slots) / 100.0
    }

    /// Objective with the largest positive remaining deficit.
    ///
    /// Ties go to the higher configured percentage, then to the fixed
    /// objective order. `None` once every target is met.
    pub fn next_objective(&self, assigned: &BTreeMap<Objective, u32>) -> Option<Objective> {
        self.targets
            .iter()
            .filter_map(|(objective, target)| {
                let done = assigned.get(objective).copied().unwrap_or(0);
                (*target > done).then_some((*objective, target - done))
            })
            .min_by(|(a, deficit_a), (b, deficit_b)| {
                deficit_b
                    .cmp(deficit_a)
                    .then_with(|| self.compare_percentage(*a, *b))
                    .then_with(|| a.cmp(b))
            })
            .map(|(objective, _)| objective)
    }

    /// Objective for every slot in order, interleaved by deficit.
    ///
    /// Always `total()` long, one entry per generated slot.
    pub fn sequence(&self) -> Vec<Objective> {
        let mut assigned: BTreeMap<Objective, u32> = BTreeMap::new();
        let mut sequence = Vec::with_capacity(self.total() as usize);
        while let Some(objective) = self.next_objective(&assigned) {
            *assigned.entry(objective).or_insert(0) += 1;
            sequence.push(objective);
        }
        sequence
    }

    /// Higher percentage sorts first.
    fn compare_percentage(&self, a: Objective, b: Objective) -> Ordering {
        let pa = self.percentages.get(&a).copied().unwrap_or(0.0);
        let pb = self.percentages.get(&b).copied().unwrap_or(0.0);
        pb.total_cmp(&pa)
    }
}

/// Split `total_slots` across the objective mix.
///
/// Mixes that don't sum to 100 are normalized with a warning. Negative,
/// non-finite or all-zero percentages are a configuration error.
pub fn allocate(mix: &ObjectiveMix, total_slots: u32) -> PlanResult<Allocation> {
    validate_objectives(mix)?;

    let sum = mix.total();
    if total_slots == 0 {
        return Ok(Allocation {
            total_slots,
            targets: mix.iter().map(|(objective, _)| (objective, 0)).collect(),
            percentages: normalized(mix, sum),
        });
    }
    if mix.is_empty() {
        return Err(ConfigError::ZeroObjectiveSum.into());
    }
    if (sum - 100.0).abs() > SUM_TOLERANCE {
        warn!(sum, "objective percentages do not sum to 100, normalizing");
    }

    let mut allocation = Allocation {
        total_slots,
        targets: BTreeMap::new(),
        percentages: normalized(mix, sum),
    };

    let ideals: Vec<(Objective, f64, f64)> = allocation
        .percentages
        .iter()
        .map(|(objective, pct)| (*objective, allocation.ideal(*objective), *pct))
        .collect();
    let mut remainders: Vec<(Objective, f64, f64)> = Vec::with_capacity(ideals.len());
    for (objective, raw, pct) in ideals {
        let floor = raw.floor();
        allocation.targets.insert(objective, floor as u32);
        remainders.push((objective, raw - floor, pct));
    }

    let assigned: u32 = allocation.targets.values().sum();
    let leftover = total_slots.saturating_sub(assigned) as usize;

    // Largest remainder first, then larger percentage, then fixed order.
    remainders.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| b.2.total_cmp(&a.2))
            .then_with(|| a.0.cmp(&b.0))
    });
    for (objective, _, _) in remainders.iter().cycle().take(leftover) {
        if let Some(count) = allocation.targets.get_mut(objective) {
            *count += 1;
        }
    }

    Ok(allocation)
}

fn normalized(mix: &ObjectiveMix, sum: f64) -> BTreeMap<Objective, f64> {
    mix.iter()
        .map(|(objective, pct)| {
            let share = if (sum - 100.0).abs() <= SUM_TOLERANCE {
                pct
            } else if sum > 0.0 {
                pct * 100.0 / sum
            } else {
                0.0
            };
            (objective, share)
        })
        .collect()
}
