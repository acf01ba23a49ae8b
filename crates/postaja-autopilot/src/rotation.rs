//! Product ranking for a single slot.
//!
//! Each rotation strategy is just a different ordering of the eligible
//! catalog; everything downstream is strategy-agnostic:
//! - **champions**: best performance first
//! - **rotate-stock**: most stock first, recently posted pushed back
//! - **new-first**: never posted, then longest idle
//! - **balanced**: weighted blend of performance, stock and idle time
//!
//! Products with no stock (or not active) are never ranked.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use postaja_core::{History, Product, RotationStrategy};

/// Weights for the balanced composite score.
#[derive(Debug, Clone)]
pub struct BalancedWeights {
    pub performance: f64,
    pub stock: f64,
    pub idle: f64,
}

impl Default for BalancedWeights {
    fn default() -> Self {
        Self {
            performance: 0.4,
            stock: 0.3,
            idle: 0.3,
        }
    }
}

/// Balanced score for one product, with its components for debugging.
#[derive(Debug, Clone)]
pub struct ProductScore<'a> {
    pub product: &'a Product,
    /// Composite score (higher = better). Range: 0.0..=1.0.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Normalized score components, each in 0.0..=1.0.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub performance: f64,
    pub stock: f64,
    pub idle: f64,
}

#[derive(Debug, Clone)]
pub struct RotationPolicy {
    pub strategy: RotationStrategy,
    pub avoid_repetition_days: u32,
    pub weights: BalancedWeights,
}

impl RotationPolicy {
    pub fn new(strategy: RotationStrategy, avoid_repetition_days: u32) -> Self {
        Self {
            strategy,
            avoid_repetition_days,
            weights: BalancedWeights::default(),
        }
    }

    /// Rank eligible products for a slot on `as_of`, best candidate first.
    pub fn rank<'a>(
        &self,
        catalog: &'a [Product],
        history: &History,
        as_of: NaiveDate,
    ) -> Vec<&'a Product> {
        let mut eligible: Vec<&Product> = catalog.iter().filter(|p| p.is_eligible()).collect();

        match self.strategy {
            RotationStrategy::Champions => {
                eligible.sort_by(|a, b| {
                    b.performance_score
                        .total_cmp(&a.performance_score)
                        .then_with(|| b.stock.cmp(&a.stock))
                        .then_with(|| a.id.cmp(&b.id))
                });
                eligible
            }
            RotationStrategy::RotateStock => {
                eligible.sort_by(|a, b| b.stock.cmp(&a.stock).then_with(|| a.id.cmp(&b.id)));
                // Stable partition: recent products go last, order kept.
                let (fresh, recent): (Vec<&Product>, Vec<&Product>) = eligible
                    .into_iter()
                    .partition(|p| !self.is_recent(history.last_activity(p), as_of));
                fresh.into_iter().chain(recent).collect()
            }
            RotationStrategy::NewFirst => {
                eligible.sort_by(|a, b| {
                    compare_new_first(a, history.last_activity(a), b, history.last_activity(b))
                });
                eligible
            }
            RotationStrategy::Balanced => self
                .balanced_scores(&eligible, history, as_of)
                .into_iter()
                .map(|s| s.product)
                .collect(),
        }
    }

    /// Score products with the balanced composite, sorted best first.
    pub fn balanced_scores<'a>(
        &self,
        eligible: &[&'a Product],
        history: &History,
        as_of: NaiveDate,
    ) -> Vec<ProductScore<'a>> {
        let (perf_min, perf_max) = bounds(eligible.iter().map(|p| p.performance_score));
        let (stock_min, stock_max) = bounds(eligible.iter().map(|p| f64::from(p.stock)));
        let window = f64::from(self.avoid_repetition_days);

        let mut scores: Vec<ProductScore<'a>> = eligible
            .iter()
            .copied()
            .map(|product| {
                let performance = normalize(product.performance_score, perf_min, perf_max);
                let stock = normalize(f64::from(product.stock), stock_min, stock_max);
                let idle = if window > 0.0 {
                    // Never posted counts as fully idle.
                    let days = days_since(history.last_activity(product), as_of)
                        .map_or(window, |d| (d.max(0) as f64).min(window));
                    days / window
                } else {
                    0.5
                };

                let score = self.weights.performance * performance
                    + self.weights.stock * stock
                    + self.weights.idle * idle;

                ProductScore {
                    product,
                    score,
                    breakdown: ScoreBreakdown {
                        performance,
                        stock,
                        idle,
                    },
                }
            })
            .collect();

        scores.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.product.id.cmp(&b.product.id))
        });
        scores
    }

    /// Active fewer than `avoid_repetition_days` days before `as_of`.
    pub fn is_recent(&self, last: Option<DateTime<Utc>>, as_of: NaiveDate) -> bool {
        match days_since(last, as_of) {
            Some(days) => days < i64::from(self.avoid_repetition_days),
            None => false,
        }
    }
}

/// Whole days from the last activity to `as_of`; `None` if never active.
pub fn days_since(last: Option<DateTime<Utc>>, as_of: NaiveDate) -> Option<i64> {
    last.map(|at| (as_of - at.date_naive()).num_days())
}

fn compare_new_first(
    a: &Product,
    a_last: Option<DateTime<Utc>>,
    b: &Product,
    b_last: Option<DateTime<Utc>>,
) -> Ordering {
    match (a_last, b_last) {
        // Never posted: newest catalog entry first; undated entries last.
        (None, None) => b
            .created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.id.cmp(&b.id)),
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Min-max normalization; 0.5 (neutral) when the range is empty.
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max - min > f64::EPSILON {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use postaja_core::ProductStatus;

    fn make_product(id: &str, stock: u32, perf: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {id}"),
            category: "moda".to_string(),
            stock,
            price: 100.0,
            original_price: None,
            status: ProductStatus::Active,
            created_at: None,
            last_posted_at: None,
            performance_score: perf,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, d, 12, 0, 0).unwrap()
    }

    fn ids(ranked: &[&Product]) -> Vec<String> {
        ranked.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn zero_stock_never_ranked() {
        let catalog = vec![make_product("a", 0, 9.0), make_product("b", 3, 1.0)];
        for strategy in [
            RotationStrategy::Champions,
            RotationStrategy::RotateStock,
            RotationStrategy::NewFirst,
            RotationStrategy::Balanced,
        ] {
            let ranked = RotationPolicy::new(strategy, 7).rank(&catalog, &History::new(), day(20));
            assert_eq!(ids(&ranked), vec!["b"], "{strategy:?}");
        }
    }

    #[test]
    fn inactive_never_ranked() {
        let mut archived = make_product("a", 5, 9.0);
        archived.status = ProductStatus::Archived;
        let catalog = vec![archived, make_product("b", 3, 1.0)];
        let policy = RotationPolicy::new(RotationStrategy::Champions, 0);
        let ranked = policy.rank(&catalog, &History::new(), day(20));
        assert_eq!(ids(&ranked), vec!["b"]);
    }

    #[test]
    fn champions_by_performance_then_stock_then_id() {
        let catalog = vec![
            make_product("c", 5, 2.0),
            make_product("b", 9, 2.0),
            make_product("a", 9, 2.0),
            make_product("d", 1, 8.0),
        ];
        let policy = RotationPolicy::new(RotationStrategy::Champions, 0);
        let ranked = policy.rank(&catalog, &History::new(), day(20));
        assert_eq!(ids(&ranked), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn rotate_stock_pushes_recent_to_back() {
        let catalog = vec![
            make_product("big", 50, 0.0),
            make_product("mid", 20, 0.0),
            make_product("small", 5, 0.0),
            make_product("tiny", 1, 0.0),
        ];
        let mut history = History::new();
        history.record("big", at(18));
        history.record("small", at(15));

        let policy = RotationPolicy::new(RotationStrategy::RotateStock, 7);
        let ranked = policy.rank(&catalog, &history, day(20));
        assert_eq!(ids(&ranked), vec!["mid", "tiny", "big", "small"]);
    }

    #[test]
    fn rotate_stock_keeps_old_posts_in_place() {
        let catalog = vec![make_product("big", 50, 0.0), make_product("mid", 20, 0.0)];
        let mut history = History::new();
        history.record("big", at(1));

        let policy = RotationPolicy::new(RotationStrategy::RotateStock, 7);
        let ranked = policy.rank(&catalog, &history, day(20));
        assert_eq!(ids(&ranked), vec!["big", "mid"]);
    }

    #[test]
    fn new_first_orders_never_posted_then_idle() {
        let mut fresh_old = make_product("fresh-old", 1, 0.0);
        fresh_old.created_at = Some(at(1));
        let mut fresh_new = make_product("fresh-new", 1, 0.0);
        fresh_new.created_at = Some(at(10));
        let mut stale = make_product("stale", 1, 0.0);
        stale.last_posted_at = Some(at(2));
        let mut recent = make_product("recent", 1, 0.0);
        recent.last_posted_at = Some(at(15));

        let catalog = vec![recent, stale, fresh_old, fresh_new];
        let policy = RotationPolicy::new(RotationStrategy::NewFirst, 7);
        let ranked = policy.rank(&catalog, &History::new(), day(20));
        assert_eq!(ids(&ranked), vec!["fresh-new", "fresh-old", "stale", "recent"]);
    }

    #[test]
    fn new_first_sees_in_run_history() {
        let catalog = vec![make_product("a", 1, 0.0), make_product("b", 1, 0.0)];
        let mut history = History::new();
        history.record("a", at(19));

        let policy = RotationPolicy::new(RotationStrategy::NewFirst, 7);
        let ranked = policy.rank(&catalog, &history, day(20));
        assert_eq!(ids(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn balanced_blends_components() {
        // "star" wins on performance, "bulk" on stock; "idle" was never posted.
        let mut star = make_product("star", 10, 10.0);
        star.last_posted_at = Some(at(19));
        let mut bulk = make_product("bulk", 100, 0.0);
        bulk.last_posted_at = Some(at(19));
        let idle = make_product("idle", 10, 0.0);

        let catalog = vec![star, bulk, idle];
        let policy = RotationPolicy::new(RotationStrategy::Balanced, 14);
        let eligible: Vec<&Product> = catalog.iter().collect();
        let scores = policy.balanced_scores(&eligible, &History::new(), day(20));

        // star: 0.4*1 + 0.3*0 + 0.3*(1/14); bulk: 0 + 0.3 + 0.3/14; idle: 0 + 0 + 0.3
        assert_eq!(scores[0].product.id, "star");
        assert_eq!(scores[1].product.id, "bulk");
        assert_eq!(scores[2].product.id, "idle");
        assert!((scores[2].breakdown.idle - 1.0).abs() < 1e-9);
        assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn balanced_is_neutral_on_uniform_catalog() {
        let catalog = vec![make_product("b", 4, 1.0), make_product("a", 4, 1.0)];
        let policy = RotationPolicy::new(RotationStrategy::Balanced, 0);
        let ranked = policy.rank(&catalog, &History::new(), day(20));
        assert_eq!(ids(&ranked), vec!["a", "b"]);
    }

    #[test]
    fn recency_uses_whole_days() {
        let policy = RotationPolicy::new(RotationStrategy::Balanced, 3);
        assert!(policy.is_recent(Some(at(18)), day(20)));
        assert!(!policy.is_recent(Some(at(17)), day(20)));
        assert!(!policy.is_recent(None, day(20)));
        assert_eq!(days_since(Some(at(17)), day(20)), Some(3));
    }
}
