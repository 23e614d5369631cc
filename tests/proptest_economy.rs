//! Property-based tests for the economy model.
//!
//! Random prices, budgets and elapsed times are checked against the
//! purchase, capacity and offline-progress invariants.

use idle_economy::{
    CostSchedule, Engine, EngineConfig, Generator, ManualClock, MemorySaveStore, Registry,
    Resource,
};
use proptest::prelude::*;

fn wallet(amount: f64) -> Registry<Resource> {
    let mut gold = Resource::new("gold", "Gold");
    gold.set_amount(amount);
    let mut resources = Registry::new();
    resources.insert(gold);
    resources
}

fn miner(base: f64, scaling: f64, owned: u64) -> Generator {
    let mut generator = Generator::new("miner", "Miner", "gold", 1.0)
        .with_cost(CostSchedule::new("gold", base).with_scaling(scaling));
    generator.owned = owned;
    generator
}

fn close_enough(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn max_affordable_is_the_exact_boundary(
        base in 1.0..1_000.0f64,
        scaling in 1.0..2.0f64,
        owned in 0..50u64,
        budget in 0.0..100_000.0f64,
    ) {
        let generator = miner(base, scaling, owned);
        let resources = wallet(budget);
        let quantity = generator.max_affordable(&resources);

        prop_assert!(generator.can_purchase(&resources, quantity));
        prop_assert!(!generator.can_purchase(&resources, quantity + 1));
        if quantity > 0 {
            let cost = generator.bulk_cost(quantity);
            prop_assert!(cost[0].amount <= budget);
        }
    }

    #[test]
    fn max_affordable_never_exceeds_the_purchase_limit(
        owned in 0..20u64,
        limit in 0..20u64,
        budget in 0.0..10_000.0f64,
    ) {
        let generator = miner(1.0, 1.0, owned.min(limit)).with_max_purchases(limit);
        let resources = wallet(budget);
        let quantity = generator.max_affordable(&resources);

        prop_assert!(generator.owned + quantity <= limit);
    }

    #[test]
    fn purchase_spends_exactly_the_bulk_cost(
        base in 1.0..100.0f64,
        scaling in 1.0..1.5f64,
        budget in 0.0..10_000.0f64,
    ) {
        let mut generator = miner(base, scaling, 0);
        let mut resources = wallet(budget);
        let quantity = generator.max_affordable(&resources);
        let expected = generator.bulk_cost(quantity);

        match generator.purchase(&mut resources, quantity) {
            Some(paid) => {
                prop_assert_eq!(&paid, &expected);
                let left = resources.get("gold").map_or(f64::NAN, |gold| gold.amount);
                prop_assert!(left >= 0.0);
                prop_assert!(close_enough(left, budget - paid[0].amount));
                prop_assert_eq!(generator.owned, quantity);
            }
            None => {
                prop_assert_eq!(quantity, 0);
            }
        }
    }

    #[test]
    fn add_never_exceeds_the_maximum(
        maximum in 0.0..1_000_000.0f64,
        start_fraction in 0.0..=1.0f64,
        value in 0.0..1_000_000.0f64,
    ) {
        let mut resource = Resource::new("gems", "Gems").with_maximum(maximum);
        let start = maximum * start_fraction;
        resource.set_amount(start);
        resource.add(value);

        prop_assert!(resource.amount <= maximum);
        prop_assert!(close_enough(resource.amount, (start + value).min(maximum)));
    }

    #[test]
    fn subtract_only_succeeds_when_affordable(
        amount in 0.0..1_000.0f64,
        value in 0.0..2_000.0f64,
    ) {
        let mut resource = Resource::new("gold", "Gold");
        resource.set_amount(amount);

        let spent = resource.subtract(value);

        prop_assert_eq!(spent, amount >= value);
        if spent {
            prop_assert!(resource.amount >= 0.0);
            prop_assert_eq!(resource.amount, amount - value);
        } else {
            prop_assert_eq!(resource.amount, amount);
        }
    }

    #[test]
    fn offline_progress_is_clamped_to_one_day(
        owned in 1..100u64,
        rate in 0.1..50.0f64,
        elapsed in -1_000.0..200_000.0f64,
    ) {
        let mut engine = Engine::new(
            EngineConfig::default(),
            ManualClock::new(0),
            MemorySaveStore::new(),
        );
        engine.register_resource(Resource::new("gold", "Gold"));
        let mut generator = Generator::new("miner", "Miner", "gold", rate);
        generator.owned = owned;
        engine.register_generator(generator);

        let report = engine.process_offline_progress(elapsed);
        let applied = elapsed.clamp(0.0, 86_400.0);
        let gold = engine.resource("gold").map_or(f64::NAN, |gold| gold.amount);

        prop_assert_eq!(report.applied_seconds, applied);
        prop_assert!(close_enough(gold, rate * owned as f64 * applied));
    }
}
