//! Plan-level properties.
//!
//! Checks the guarantees every plan must satisfy across strategies,
//! cadences and catalogs, plus the reference scenarios.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use postaja_autopilot::*;
use postaja_core::*;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn posted(days_before_monday: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap() - TimeDelta::days(days_before_monday)
}

fn test_product(id: &str, stock: u32) -> Product {
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
        performance_score: 0.0,
    }
}

/// Mixed catalog: some out of stock, some promotional, varied history.
fn test_catalog(size: usize) -> Vec<Product> {
    (0..size)
        .map(|i| {
            let mut p = test_product(&format!("p{i:02}"), ((i * 7) % 5) as u32 * 3);
            p.performance_score = ((i * 13) % 11) as f64 / 2.0;
            if i % 3 == 0 {
                p.original_price = Some(p.price * 1.25);
            }
            if i % 4 == 1 {
                p.last_posted_at = Some(posted((i % 9) as i64));
            }
            p.created_at = Some(posted(30 + i as i64));
            p
        })
        .collect()
}

fn test_config(strategy: RotationStrategy, avoid: u32, max_promo: u32) -> AutopilotConfig {
    AutopilotConfig {
        product_rotation: strategy,
        avoid_repetition_days: avoid,
        max_promotional_per_week: max_promo,
        schedule: ScheduleConfig {
            days: [Weekday::Mon, Weekday::Tue, Weekday::Thu, Weekday::Fri, Weekday::Sat]
                .into_iter()
                .collect(),
            times: ["10:00", "14:00", "19:00"].iter().map(|t| t.parse().unwrap()).collect(),
        },
        ..AutopilotConfig::default()
    }
}

const STRATEGIES: [RotationStrategy; 4] = [
    RotationStrategy::Champions,
    RotationStrategy::RotateStock,
    RotationStrategy::NewFirst,
    RotationStrategy::Balanced,
];

fn slot_count(config: &AutopilotConfig, days: u32) -> usize {
    generate_slots(&config.schedule.days, &config.schedule.times, monday(), days).len()
}

fn for_each_run(mut check: impl FnMut(&AutopilotConfig, &[Product], &Plan, u32)) {
    for strategy in STRATEGIES {
        for (avoid, max_promo) in [(0, 10), (3, 2), (14, 0), (7, 1)] {
            for (catalog_size, days) in [(1, 7), (4, 14), (12, 7), (30, 28)] {
                let config = test_config(strategy, avoid, max_promo);
                let catalog = test_catalog(catalog_size);
                let plan = plan(&config, &catalog, &History::new(), monday(), days).unwrap();
                check(&config, &catalog, &plan, days);
            }
        }
    }
}

#[test]
fn plans_are_deterministic() {
    for_each_run(|config, catalog, plan, days| {
        let again =
            postaja_autopilot::plan(config, catalog, &History::new(), monday(), days).unwrap();
        assert_eq!(&again, plan);
        assert_eq!(
            serde_json::to_string(&again).unwrap(),
            serde_json::to_string(plan).unwrap()
        );
    });
}

#[test]
fn every_slot_is_assigned_or_reported() {
    for_each_run(|config, _, plan, days| {
        let expected = slot_count(config, days);
        assert_eq!(plan.assignments.len() + plan.unassigned_slots().len(), expected);

        let mut seen: Vec<Slot> = plan.assignments.iter().map(|a| a.slot).collect();
        seen.extend(plan.unassigned_slots().into_iter().copied());
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), expected, "a slot was used twice");
    });
}

#[test]
fn assignments_are_chronological() {
    for_each_run(|_, _, plan, _| {
        assert!(plan.assignments.windows(2).all(|w| w[0].slot < w[1].slot));
    });
}

#[test]
fn objective_counts_are_proportional() {
    for_each_run(|config, _, plan, days| {
        let n = slot_count(config, days) as f64;
        let mut counts = plan.objective_counts();
        for diagnostic in &plan.diagnostics {
            if let Diagnostic::UnassignedSlot { objective, .. } = diagnostic {
                *counts.entry(*objective).or_insert(0) += 1;
            }
        }
        for (objective, pct) in config.objectives.iter() {
            let ideal = (pct / 100.0 * n).round();
            let actual = f64::from(counts.get(&objective).copied().unwrap_or(0));
            assert!((actual - ideal).abs() <= 1.0, "{objective}: {actual} vs {ideal}");
        }
    });
}

#[test]
fn never_assigns_zero_stock() {
    for_each_run(|_, catalog, plan, _| {
        for assignment in &plan.assignments {
            let product = catalog.iter().find(|p| p.id == assignment.product_id).unwrap();
            assert!(product.stock > 0, "{} has no stock", product.id);
        }
    });
}

#[test]
fn repetition_is_respected_or_reported() {
    for_each_run(|config, _, plan, _| {
        let fallback_slots: Vec<Slot> = plan
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::RepetitionFallback { .. }))
            .map(|d| *d.slot())
            .collect();

        for (i, first) in plan.assignments.iter().enumerate() {
            for second in &plan.assignments[i + 1..] {
                if first.product_id != second.product_id {
                    continue;
                }
                let gap = (second.slot.date - first.slot.date).num_days();
                let reported = fallback_slots.contains(&first.slot)
                    || fallback_slots.contains(&second.slot);
                assert!(
                    gap >= i64::from(config.avoid_repetition_days) || reported,
                    "{} repeated after {gap} days without a fallback diagnostic",
                    first.product_id
                );
            }
        }
    });
}

#[test]
fn promotional_cap_holds_in_every_window() {
    for_each_run(|config, catalog, plan, days| {
        let has_override = plan.cap_override_count() > 0;
        for offset in 0..days {
            let start = monday() + TimeDelta::days(i64::from(offset));
            let end = start + TimeDelta::days(6);
            let in_window = plan
                .assignments
                .iter()
                .filter(|a| a.slot.date >= start && a.slot.date <= end)
                .filter(|a| catalog.iter().any(|p| p.id == a.product_id && p.is_promotional()))
                .count() as u32;
            assert!(
                in_window <= config.max_promotional_per_week || has_override,
                "{in_window} promotions in window starting {start}"
            );
        }
    });
}

#[test]
fn inactive_products_never_assigned() {
    let mut catalog = test_catalog(6);
    for p in catalog.iter_mut().filter(|p| p.stock > 0).take(2) {
        p.status = ProductStatus::Inactive;
    }
    let inactive: Vec<String> = catalog
        .iter()
        .filter(|p| p.status != ProductStatus::Active)
        .map(|p| p.id.clone())
        .collect();

    let config = test_config(RotationStrategy::Champions, 0, 10);
    let plan = plan(&config, &catalog, &History::new(), monday(), 7).unwrap();
    assert!(plan.assignments.iter().all(|a| !inactive.contains(&a.product_id)));
}

#[test]
fn scenario_three_days_two_times_yield_six_slots() {
    let days = [Weekday::Mon, Weekday::Wed, Weekday::Fri].into_iter().collect();
    let times = ["10:00", "18:00"].iter().map(|t| t.parse().unwrap()).collect();
    assert_eq!(generate_slots(&days, &times, monday(), 7).len(), 6);
}

#[test]
fn scenario_even_split_of_seven_slots() {
    let mix = ObjectiveMix::new().with(Objective::Sell, 50.0).with(Objective::Engage, 50.0);
    let allocation = allocate(&mix, 7).unwrap();
    let (sell, engage) = (allocation.target(Objective::Sell), allocation.target(Objective::Engage));
    assert!((sell, engage) == (4, 3) || (sell, engage) == (3, 4));
}

#[test]
fn scenario_all_out_of_stock() {
    let config = test_config(RotationStrategy::Balanced, 7, 10);
    let catalog = vec![test_product("only", 0), test_product("other", 0)];

    let plan = plan(&config, &catalog, &History::new(), monday(), 7).unwrap();

    assert!(plan.assignments.is_empty());
    assert_eq!(plan.unassigned_slots().len(), slot_count(&config, 7));
    assert_eq!(plan.diagnostics.len(), slot_count(&config, 7));
    assert!(plan.summary().unwrap().contains("could not be filled"));
}

#[test]
fn scenario_single_product_long_repetition_window() {
    // Mon, Fri, Mon over a 10-day horizon.
    let config = AutopilotConfig {
        avoid_repetition_days: 14,
        schedule: ScheduleConfig {
            days: [Weekday::Mon, Weekday::Fri].into_iter().collect(),
            times: ["10:00".parse().unwrap()].into_iter().collect(),
        },
        ..AutopilotConfig::default()
    };
    let catalog = vec![test_product("solo", 3)];

    let plan = plan(&config, &catalog, &History::new(), monday(), 10).unwrap();

    assert_eq!(plan.assignments.len(), 3);
    assert!(plan.assignments.iter().all(|a| a.product_id == "solo"));
    assert_eq!(plan.fallback_count(), 2);
    let fallback_slots: Vec<Slot> = plan.diagnostics.iter().map(|d| *d.slot()).collect();
    assert_eq!(fallback_slots, vec![plan.assignments[1].slot, plan.assignments[2].slot]);
    assert!(matches!(
        plan.diagnostics[0],
        Diagnostic::RepetitionFallback { days_since_last: Some(4), .. }
    ));
}

#[test]
fn persisted_history_shapes_the_plan() {
    let config = test_config(RotationStrategy::Champions, 7, 10);
    let mut catalog = vec![test_product("top", 5), test_product("second", 5)];
    catalog[0].performance_score = 9.0;
    catalog[1].performance_score = 1.0;

    let history: History = vec![("top".to_string(), posted(2))].into_iter().collect();
    let plan = plan(&config, &catalog, &history, monday(), 7).unwrap();

    assert_eq!(plan.assignments[0].product_id, "second");
}
