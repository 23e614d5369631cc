//! Serializable command objects for upgrade effects, achievement rewards and
//! unlock/visibility predicates.
//!
//! Effects name the entities they touch by id instead of capturing them, so an
//! upgrade's effects can be replayed deterministically when a save is loaded.

use serde::{Deserialize, Serialize};

use crate::core::StatisticsTracker;

use super::generator::Generator;
use super::registry::Registry;
use super::resource::Resource;
use super::upgrade::Upgrade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    AttachMultiplier { generator: String, multiplier: String },
    DetachMultiplier { generator: String, multiplier: String },
    SetMultiplierActive { multiplier: String, active: bool },
    AdjustMultiplier { multiplier: String, delta: f64 },
    ScaleProduction { generator: String, factor: f64 },
    GrantResource { resource: String, amount: f64 },
}

impl Effect {
    /// Whether replaying this effect on load reconstructs state that is not
    /// itself persisted. Resource grants are already folded into saved amounts.
    pub fn replays_on_load(&self) -> bool {
        !matches!(self, Self::GrantResource { .. })
    }
}

/// Read-only view of engine state that conditions are evaluated against.
#[derive(Clone, Copy)]
pub struct EconomyView<'a> {
    pub resources: &'a Registry<Resource>,
    pub generators: &'a Registry<Generator>,
    pub upgrades: &'a Registry<Upgrade>,
    pub statistics: &'a StatisticsTracker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Always,
    ResourceAtLeast { resource: String, amount: f64 },
    EarnedAtLeast { resource: String, amount: f64 },
    GeneratorOwnedAtLeast { generator: String, count: u64 },
    TotalGeneratorsAtLeast { count: u64 },
    UpgradePurchased { upgrade: String },
    ClicksAtLeast { count: u64 },
    TimePlayedAtLeast { seconds: f64 },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
}

impl Condition {
    pub fn evaluate(&self, view: &EconomyView<'_>) -> bool {
        match self {
            Self::Always => true,
            Self::ResourceAtLeast { resource, amount } => view
                .resources
                .get(resource)
                .is_some_and(|entry| entry.amount >= *amount),
            Self::EarnedAtLeast { resource, amount } => {
                view.resources.contains(resource)
                    && view.statistics.resource_earned(resource) >= *amount
            }
            Self::GeneratorOwnedAtLeast { generator, count } => view
                .generators
                .get(generator)
                .is_some_and(|entry| entry.owned >= *count),
            Self::TotalGeneratorsAtLeast { count } => {
                view
                    .generators
                    .iter()
                    .map(|entry| entry.owned)
                    .fold(0u64, u64::saturating_add)
                    >= *count
            }
            Self::UpgradePurchased { upgrade } => view
                .upgrades
                .get(upgrade)
                .is_some_and(|entry| entry.purchased > 0),
            Self::ClicksAtLeast { count } => view.statistics.total_clicks() >= *count,
            Self::TimePlayedAtLeast { seconds } => view.statistics.time_played() >= *seconds,
            Self::All { conditions } => conditions.iter().all(|inner| inner.evaluate(view)),
            Self::Any { conditions } => conditions.iter().any(|inner| inner.evaluate(view)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Condition, EconomyView, Effect};
    use crate::core::StatisticsTracker;
    use crate::model::{Generator, Registry, Resource, Upgrade};

    struct Fixture {
        resources: Registry<Resource>,
        generators: Registry<Generator>,
        upgrades: Registry<Upgrade>,
        statistics: StatisticsTracker,
    }

    impl Fixture {
        fn new() -> Self {
            let mut gold = Resource::new("gold", "Gold");
            gold.add(50.0);
            let mut miner = Generator::new("miner", "Miner", "gold", 1.0);
            miner.owned = 4;
            let mut statistics = StatisticsTracker::new(0);
            statistics.record_resource_earned("gold", 120.0);
            statistics.record_click();
            Self {
                resources: [gold].into_iter().collect(),
                generators: [miner].into_iter().collect(),
                upgrades: Registry::new(),
                statistics,
            }
        }

        fn view(&self) -> EconomyView<'_> {
            EconomyView {
                resources: &self.resources,
                generators: &self.generators,
                upgrades: &self.upgrades,
                statistics: &self.statistics,
            }
        }
    }

    #[test]
    fn leaf_conditions_read_engine_state() {
        let fixture = Fixture::new();
        let view = fixture.view();

        assert!(Condition::Always.evaluate(&view));
        assert!(
            Condition::ResourceAtLeast { resource: "gold".into(), amount: 50.0 }.evaluate(&view)
        );
        assert!(
            !Condition::ResourceAtLeast { resource: "gold".into(), amount: 50.1 }.evaluate(&view)
        );
        assert!(
            Condition::EarnedAtLeast { resource: "gold".into(), amount: 100.0 }.evaluate(&view)
        );
        assert!(
            Condition::GeneratorOwnedAtLeast { generator: "miner".into(), count: 4 }
                .evaluate(&view)
        );
        assert!(Condition::TotalGeneratorsAtLeast { count: 4 }.evaluate(&view));
        assert!(Condition::ClicksAtLeast { count: 1 }.evaluate(&view));
        assert!(!Condition::ClicksAtLeast { count: 2 }.evaluate(&view));
    }

    #[test]
    fn unknown_references_evaluate_false() {
        let fixture = Fixture::new();
        let view = fixture.view();

        assert!(!Condition::ResourceAtLeast { resource: "mana".into(), amount: 0.0 }.evaluate(&view));
        assert!(!Condition::EarnedAtLeast { resource: "mana".into(), amount: 0.0 }.evaluate(&view));
        assert!(!Condition::UpgradePurchased { upgrade: "ghost".into() }.evaluate(&view));
    }

    #[test]
    fn composite_conditions_combine_children() {
        let fixture = Fixture::new();
        let view = fixture.view();
        let yes = Condition::Always;
        let no = Condition::ClicksAtLeast { count: 99 };

        assert!(!Condition::All { conditions: vec![yes.clone(), no.clone()] }.evaluate(&view));
        assert!(Condition::Any { conditions: vec![yes, no] }.evaluate(&view));
        assert!(Condition::All { conditions: Vec::new() }.evaluate(&view));
        assert!(!Condition::Any { conditions: Vec::new() }.evaluate(&view));
    }

    #[test]
    fn conditions_and_effects_parse_from_tagged_json() {
        let condition: Condition = serde_json::from_str(
            r#"{"type":"all","conditions":[{"type":"clicks_at_least","count":10},{"type":"always"}]}"#,
        )
        .expect("condition JSON should parse");
        assert_eq!(
            condition,
            Condition::All {
                conditions: vec![Condition::ClicksAtLeast { count: 10 }, Condition::Always],
            }
        );

        let effect: Effect = serde_json::from_str(
            r#"{"type":"attach_multiplier","generator":"miner","multiplier":"x2"}"#,
        )
        .expect("effect JSON should parse");
        assert!(effect.replays_on_load());
        let grant = Effect::GrantResource { resource: "gold".into(), amount: 5.0 };
        assert!(!grant.replays_on_load());
    }
}
