use serde::{Deserialize, Serialize};

use crate::core::{Clock, Engine, EngineConfig};
use crate::model::{
    Achievement, Condition, CostSchedule, Effect, Generator, Multiplier, MultiplierKind, Resource,
    ResourceAmount, Upgrade,
};
use crate::save::SaveStore;

/// A complete game: engine settings plus every entity to register, in
/// registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameDefinition {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
    #[serde(default)]
    pub multipliers: Vec<MultiplierDefinition>,
    #[serde(default)]
    pub generators: Vec<GeneratorDefinition>,
    #[serde(default)]
    pub upgrades: Vec<UpgradeDefinition>,
    #[serde(default)]
    pub achievements: Vec<AchievementDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub initial_amount: f64,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub display_precision: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: MultiplierKind,
    pub value: f64,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub resource: String,
    pub base_production_rate: f64,
    #[serde(default)]
    pub costs: Vec<CostSchedule>,
    #[serde(default)]
    pub max_purchases: Option<u64>,
    /// Multipliers attached from the start, folded in this order.
    #[serde(default)]
    pub multipliers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub costs: Vec<ResourceAmount>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub visible_when: Condition,
    #[serde(default = "default_upgrade_max")]
    pub max_purchases: u32,
}

const fn default_upgrade_max() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub condition: Condition,
    #[serde(default)]
    pub rewards: Vec<Effect>,
    #[serde(default)]
    pub secret: bool,
}

impl From<&ResourceDefinition> for Resource {
    fn from(definition: &ResourceDefinition) -> Self {
        let mut resource = Resource::new(&definition.id, &definition.name)
            .with_description(&definition.description)
            .with_precision(definition.display_precision);
        if let Some(maximum) = definition.maximum {
            resource = resource.with_maximum(maximum);
        }
        resource.set_amount(definition.initial_amount);
        resource
    }
}

impl From<&MultiplierDefinition> for Multiplier {
    fn from(definition: &MultiplierDefinition) -> Self {
        let mut multiplier = Multiplier::new(&definition.id, definition.kind, definition.value);
        if !definition.name.is_empty() {
            multiplier = multiplier.with_name(&definition.name);
        }
        if let Some(target) = &definition.target {
            multiplier = multiplier.with_target(target);
        }
        multiplier.description = definition.description.clone();
        multiplier.active = definition.active;
        multiplier
    }
}

impl From<&GeneratorDefinition> for Generator {
    fn from(definition: &GeneratorDefinition) -> Self {
        let mut generator = Generator::new(
            &definition.id,
            &definition.name,
            &definition.resource,
            definition.base_production_rate,
        );
        generator.description = definition.description.clone();
        generator.costs = definition.costs.clone();
        generator.max_purchases = definition.max_purchases;
        for multiplier in &definition.multipliers {
            generator.attach_multiplier(multiplier);
        }
        generator
    }
}

impl From<&UpgradeDefinition> for Upgrade {
    fn from(definition: &UpgradeDefinition) -> Self {
        let mut upgrade = Upgrade::new(&definition.id, &definition.name)
            .with_max_purchases(definition.max_purchases)
            .visible_when(definition.visible_when.clone());
        upgrade.description = definition.description.clone();
        upgrade.costs = definition.costs.clone();
        upgrade.effects = definition.effects.clone();
        upgrade
    }
}

impl From<&AchievementDefinition> for Achievement {
    fn from(definition: &AchievementDefinition) -> Self {
        let mut achievement = Achievement::new(
            &definition.id,
            &definition.name,
            definition.condition.clone(),
        )
        .with_description(&definition.description);
        achievement.rewards = definition.rewards.clone();
        achievement.secret = definition.secret;
        achievement
    }
}

impl GameDefinition {
    /// Builds an engine with every entity registered. The engine is not
    /// started and nothing is loaded.
    pub fn into_engine(
        self,
        clock: impl Clock + 'static,
        store: impl SaveStore + 'static,
    ) -> Engine {
        let mut engine = Engine::new(self.config.clone(), clock, store);
        self.register_into(&mut engine);
        engine
    }

    /// Registers every entity. Multipliers go in before generators so initial
    /// attachments resolve.
    pub fn register_into(&self, engine: &mut Engine) {
        for resource in &self.resources {
            engine.register_resource(resource.into());
        }
        for multiplier in &self.multipliers {
            engine.register_multiplier(multiplier.into());
        }
        for generator in &self.generators {
            engine.register_generator(generator.into());
        }
        for upgrade in &self.upgrades {
            engine.register_upgrade(upgrade.into());
        }
        for achievement in &self.achievements {
            engine.register_achievement(achievement.into());
        }
    }

    /// Ids referenced by generators, upgrades and achievements that no entity
    /// in this definition declares.
    pub fn dangling_references(&self) -> Vec<String> {
        let resource = |id: &str| self.resources.iter().any(|entry| entry.id == id);
        let multiplier = |id: &str| self.multipliers.iter().any(|entry| entry.id == id);
        let generator = |id: &str| self.generators.iter().any(|entry| entry.id == id);

        let mut missing = Vec::new();
        let mut require = |known: bool, kind: &str, id: &str| {
            if !known {
                missing.push(format!("{kind} '{id}'"));
            }
        };

        for entry in &self.generators {
            require(resource(&entry.resource), "resource", &entry.resource);
            for cost in &entry.costs {
                require(resource(&cost.resource), "resource", &cost.resource);
            }
            for id in &entry.multipliers {
                require(multiplier(id), "multiplier", id);
            }
        }
        let effects = self
            .upgrades
            .iter()
            .flat_map(|entry| entry.effects.iter())
            .chain(self.achievements.iter().flat_map(|entry| entry.rewards.iter()));
        for effect in effects {
            match effect {
                Effect::AttachMultiplier {
                    generator: g,
                    multiplier: m,
                }
                | Effect::DetachMultiplier {
                    generator: g,
                    multiplier: m,
                } => {
                    require(generator(g), "generator", g);
                    require(multiplier(m), "multiplier", m);
                }
                Effect::SetMultiplierActive { multiplier: m, .. }
                | Effect::AdjustMultiplier { multiplier: m, .. } => {
                    require(multiplier(m), "multiplier", m);
                }
                Effect::ScaleProduction { generator: g, .. } => {
                    require(generator(g), "generator", g);
                }
                Effect::GrantResource { resource: r, .. } => {
                    require(resource(r), "resource", r);
                }
            }
        }
        for entry in &self.upgrades {
            for cost in &entry.costs {
                require(resource(&cost.resource), "resource", &cost.resource);
            }
        }
        missing
    }
}
