//! Scheduler — assigns a product and objective to every slot.
//!
//! A run is a fold over the chronological slot sequence:
//! 1. The slot's objective comes from the allocator's deficit sequence
//! 2. Candidates are ranked by the rotation policy as of the slot date
//! 3. Products inside the repetition window are dropped (with a
//!    least-recently-used fallback when nothing survives)
//! 4. Promotional products are dropped once the trailing 7-day cap is hit
//! 5. The best remaining candidate takes the slot and History is updated
//!
//! Policy conflicts never fail the run; they become plan diagnostics.

use chrono::{NaiveDate, TimeDelta};
use tracing::{debug, info, warn};

use postaja_core::{AutopilotConfig, History, Objective, Product};

use crate::allocator::allocate;
use crate::error::PlanResult;
use crate::plan::{Diagnostic, Plan, ScheduledSlotAssignment};
use crate::rotation::{RotationPolicy, days_since};
use crate::slots::{Slot, generate_slots};

/// Length of the rolling promotional-cap window.
const PROMO_WINDOW_DAYS: i64 = 7;

pub struct Scheduler<'a> {
    config: &'a AutopilotConfig,
    policy: RotationPolicy,
}

impl<'a> Scheduler<'a> {
    pub fn new(config: &'a AutopilotConfig) -> Self {
        Self {
            config,
            policy: RotationPolicy::new(config.product_rotation, config.avoid_repetition_days),
        }
    }

    /// Plan every slot in `horizon_days` days from `horizon_start`.
    ///
    /// `history` is copied; the caller's value is never modified.
    pub fn plan(
        &self,
        catalog: &[Product],
        history: &History,
        horizon_start: NaiveDate,
        horizon_days: u32,
    ) -> PlanResult<Plan> {
        self.config.validate()?;

        let slots = generate_slots(
            &self.config.schedule.days,
            &self.config.schedule.times,
            horizon_start,
            horizon_days,
        );
        let allocation = allocate(&self.config.objectives, slots.len() as u32)?;
        let objectives = allocation.sequence();

        let mut run = Run {
            policy: &self.policy,
            max_promotional: self.config.max_promotional_per_week,
            history: History::seeded(catalog, history),
            promotional_dates: Vec::new(),
            plan: Plan::new(horizon_start, horizon_days),
        };

        for (slot, objective) in slots.iter().zip(objectives) {
            run.assign(catalog, *slot, objective);
        }

        let plan = run.plan;
        info!(
            start = %horizon_start,
            days = horizon_days,
            slots = slots.len(),
            assigned = plan.assignments.len(),
            diagnostics = plan.diagnostics.len(),
            strategy = self.policy.strategy.label(),
            "autopilot plan computed"
        );
        Ok(plan)
    }

    /// The first `limit` assignments of the full plan.
    ///
    /// Diagnostics after the last kept assignment are dropped with it.
    pub fn preview(
        &self,
        catalog: &[Product],
        history: &History,
        horizon_start: NaiveDate,
        horizon_days: u32,
        limit: usize,
    ) -> PlanResult<Plan> {
        let mut plan = self.plan(catalog, history, horizon_start, horizon_days)?;
        if plan.assignments.len() <= limit {
            return Ok(plan);
        }

        plan.assignments.truncate(limit);
        match plan.assignments.last().map(|a| a.slot) {
            Some(cutoff) => plan.diagnostics.retain(|d| *d.slot() <= cutoff),
            None => plan.diagnostics.clear(),
        }
        Ok(plan)
    }
}

/// Plan with a one-off scheduler.
pub fn plan(
    config: &AutopilotConfig,
    catalog: &[Product],
    history: &History,
    horizon_start: NaiveDate,
    horizon_days: u32,
) -> PlanResult<Plan> {
    Scheduler::new(config).plan(catalog, history, horizon_start, horizon_days)
}

/// State threaded through one planning run.
struct Run<'p> {
    policy: &'p RotationPolicy,
    max_promotional: u32,
    history: History,
    /// Dates of promotional assignments made so far, ascending.
    promotional_dates: Vec<NaiveDate>,
    plan: Plan,
}

impl Run<'_> {
    fn assign(&mut self, catalog: &[Product], slot: Slot, objective: Objective) {
        let ranked = self.policy.rank(catalog, &self.history, slot.date);
        if ranked.is_empty() {
            warn!(slot = %slot, %objective, "no eligible product, slot left unassigned");
            self.plan.diagnostics.push(Diagnostic::UnassignedSlot { slot, objective });
            return;
        }

        // Repetition window.
        let fresh: Vec<&Product> = ranked
            .iter()
            .copied()
            .filter(|p| !self.policy.is_recent(self.history.last_activity(p), slot.date))
            .collect();
        let repetition_fallback = fresh.is_empty();
        let pool = if repetition_fallback { ranked } else { fresh };

        // Promotional cap over the trailing window ending on this slot's date.
        let window_count = self.promotional_in_window(slot.date);
        let cap_reached = window_count >= self.max_promotional;
        let regular: Vec<&Product> = if cap_reached {
            pool.iter().copied().filter(|p| !p.is_promotional()).collect()
        } else {
            pool.clone()
        };
        let cap_override = regular.is_empty();
        let candidates = if cap_override { pool } else { regular };

        let chosen = if repetition_fallback {
            self.least_recent(&candidates)
        } else {
            candidates.first().copied()
        };
        let Some(product) = chosen else {
            return;
        };

        let previous = self.history.last_activity(product);
        if repetition_fallback {
            let days_since_last = days_since(previous, slot.date);
            info!(
                slot = %slot,
                product = %product.id,
                days_since_last,
                "repetition window exhausted, reusing least recent product"
            );
            self.plan.diagnostics.push(Diagnostic::RepetitionFallback {
                slot,
                product_id: product.id.clone(),
                days_since_last,
            });
        }
        if cap_override {
            info!(
                slot = %slot,
                product = %product.id,
                window_count = window_count + 1,
                cap = self.max_promotional,
                "only promotional products left, exceeding weekly cap"
            );
            self.plan.diagnostics.push(Diagnostic::PromotionalCapOverride {
                slot,
                product_id: product.id.clone(),
                window_count: window_count + 1,
            });
        }

        if product.is_promotional() {
            self.promotional_dates.push(slot.date);
        }
        self.history.record(&product.id, slot.starts_at());
        self.plan.assignments.push(ScheduledSlotAssignment {
            slot,
            product_id: product.id.clone(),
            objective,
        });
        debug!(slot = %slot, product = %product.id, %objective, "slot assigned");
    }

    /// Least recently active candidate; never-active counts as oldest and
    /// rank order breaks ties.
    fn least_recent<'c>(&self, candidates: &[&'c Product]) -> Option<&'c Product> {
        candidates
            .iter()
            .copied()
            .min_by_key(|p| self.history.last_activity(p))
    }

    fn promotional_in_window(&self, date: NaiveDate) -> u32 {
        let window = TimeDelta::days(PROMO_WINDOW_DAYS);
        self.promotional_dates
            .iter()
            .filter(|d| **d <= date && date - **d < window)
            .count() as u32
    }
}
