use serde::{Deserialize, Serialize};

pub const DEFAULT_SAVE_KEY: &str = "idle_economy_save";

/// Offline progress never covers more than a day.
pub const MAX_OFFLINE_SECONDS: f64 = 24.0 * 60.0 * 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tick_interval_ms: u64,
    pub auto_save_interval_ms: u64,
    pub max_offline_seconds: f64,
    pub save_key: String,
    pub check_achievements_after_offline: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            auto_save_interval_ms: 30_000,
            max_offline_seconds: MAX_OFFLINE_SECONDS,
            save_key: DEFAULT_SAVE_KEY.to_string(),
            check_achievements_after_offline: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"tick_interval_ms": 250}"#).expect("config should parse");

        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.auto_save_interval_ms, 30_000);
        assert_eq!(config.max_offline_seconds, 86_400.0);
        assert_eq!(config.save_key, "idle_economy_save");
        assert!(config.check_achievements_after_offline);
    }
}
