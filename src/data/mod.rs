mod definition;
mod loader;

pub use definition::{
    AchievementDefinition, GameDefinition, GeneratorDefinition, MultiplierDefinition,
    ResourceDefinition, UpgradeDefinition,
};
pub use loader::{
    load_definition_from_path, load_sample_definition, parse_definition, sample_definition_path,
};

#[cfg(test)]
mod tests {
    use super::{
        GameDefinition, load_definition_from_path, load_sample_definition, parse_definition,
    };
    use crate::core::{EngineConfig, ManualClock};
    use crate::save::MemorySaveStore;

    #[test]
    fn bundled_sample_definition_is_complete() {
        let definition = load_sample_definition().expect("sample definition should load");

        assert!(!definition.resources.is_empty());
        assert!(!definition.generators.is_empty());
        assert!(!definition.upgrades.is_empty());
        assert!(!definition.achievements.is_empty());
        assert!(definition.dangling_references().is_empty());
    }

    #[test]
    fn sample_definition_builds_a_playable_engine() {
        let definition = load_sample_definition().expect("sample definition should load");
        let first_resource = definition.resources[0].id.clone();
        let engine = definition.into_engine(ManualClock::new(0), MemorySaveStore::new());

        assert!(engine.resource(&first_resource).is_some());
        assert!(!engine.is_running());
        assert!(engine.generators().iter().all(|generator| generator.owned == 0));
    }

    #[test]
    fn minimal_definition_uses_defaults() {
        let definition: GameDefinition = serde_json::from_str(
            r#"{
                "resources": [{ "id": "gold", "name": "Gold", "initial_amount": 5 }],
                "generators": [{
                    "id": "miner",
                    "name": "Miner",
                    "resource": "gold",
                    "base_production_rate": 1.0,
                    "costs": [{ "resource": "gold", "base_amount": 10 }]
                }],
                "upgrades": [{ "id": "picks", "name": "Picks" }]
            }"#,
        )
        .expect("definition should parse");

        assert_eq!(definition.config, EngineConfig::default());
        assert_eq!(definition.generators[0].costs[0].scaling_factor, 1.15);
        assert_eq!(definition.upgrades[0].max_purchases, 1);

        let engine = definition.into_engine(ManualClock::new(0), MemorySaveStore::new());
        assert_eq!(engine.resource("gold").map(|r| r.amount), Some(5.0));
    }

    const DANGLING_DEFINITION: &str = r#"{
        "generators": [{
            "id": "miner",
            "name": "Miner",
            "resource": "gold",
            "base_production_rate": 1.0,
            "multipliers": ["boost"]
        }]
    }"#;

    #[test]
    fn definitions_with_unknown_ids_are_rejected() {
        let err = parse_definition(DANGLING_DEFINITION).expect_err("dangling ids");
        let message = format!("{err:#}");
        assert!(message.contains("resource 'gold'"), "{message}");
        assert!(message.contains("multiplier 'boost'"), "{message}");

        assert!(parse_definition("[]").is_err());
    }

    #[test]
    fn load_errors_name_the_definition_file() {
        let path = std::env::temp_dir().join(format!(
            "idle_economy_dangling_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, DANGLING_DEFINITION).expect("write definition");

        let err = load_definition_from_path(&path).expect_err("dangling ids");
        let message = format!("{err:#}");
        assert!(message.contains(&path.display().to_string()), "{message}");
        assert!(message.contains("multiplier 'boost'"), "{message}");
        let _ = std::fs::remove_file(&path);

        let missing = load_definition_from_path(&path).expect_err("file is gone");
        assert!(format!("{missing:#}").contains("cannot open"));
    }

    #[test]
    fn sample_game_reload_keeps_upgrade_order() {
        let definition = load_sample_definition().expect("sample definition should load");
        let store = MemorySaveStore::new();
        let clock = ManualClock::new(0);
        let mut engine = definition.clone().into_engine(clock.clone(), store.clone());
        engine
            .resource_mut("gold")
            .expect("sample has gold")
            .set_amount(10_000.0);
        assert!(engine.purchase_generator("miner", 3));
        assert!(engine.purchase_upgrade("gold_rush"));
        assert!(engine.purchase_upgrade("sharpen_picks"));
        let live = engine.production_per_second("gold");
        engine.save().expect("save should succeed");

        let mut restored = definition.into_engine(clock, store);
        restored.load().expect("load should succeed");
        assert_eq!(restored.production_per_second("gold"), live);
        assert_eq!(live, 3.0 * 2.0 + 2.0);
    }
}
