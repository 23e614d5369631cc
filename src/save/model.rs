use serde::{Deserialize, Serialize};

pub const SAVE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SaveResource {
    pub id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SavePurchase {
    pub id: String,
    pub purchased: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SaveAchievement {
    pub id: String,
    pub unlocked: bool,
}

/// Multiplier ids attached to one generator, in fold order. Added in version 2;
/// older records rebuild the order by replaying upgrades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SaveAttachments {
    pub generator: String,
    pub multipliers: Vec<String>,
}

/// Statistics maps are persisted as `[id, total]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveStatistics {
    pub total_resources_earned: Vec<(String, f64)>,
    pub total_resources_spent: Vec<(String, f64)>,
    pub total_generators_purchased: Vec<(String, u64)>,
    pub total_upgrades_purchased: Vec<(String, u64)>,
    pub achievements_unlocked: u64,
    pub total_clicks: u64,
    pub time_played: f64,
    pub session_start_time: i64,
}

/// The single persisted record for a game. `timestamp` is the save moment in
/// epoch milliseconds and is required: offline progress is measured from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub resources: Vec<SaveResource>,
    #[serde(default)]
    pub generators: Vec<SavePurchase>,
    #[serde(default)]
    pub upgrades: Vec<SavePurchase>,
    #[serde(default)]
    pub achievements: Vec<SaveAchievement>,
    #[serde(default)]
    pub attachments: Vec<SaveAttachments>,
    #[serde(default)]
    pub statistics: SaveStatistics,
    pub timestamp: i64,
}

const fn default_version() -> u32 {
    SAVE_VERSION
}

impl SaveData {
    pub fn empty(timestamp: i64) -> Self {
        Self {
            version: SAVE_VERSION,
            resources: Vec::new(),
            generators: Vec::new(),
            upgrades: Vec::new(),
            achievements: Vec::new(),
            attachments: Vec::new(),
            statistics: SaveStatistics::default(),
            timestamp,
        }
    }
}
