pub mod core;
pub mod data;
pub mod error;
pub mod model;
pub mod save;

pub use crate::core::{
    Clock, Engine, EngineConfig, ManualClock, OfflineReport, StatisticsTracker, SystemClock,
    TickReport,
};
pub use data::{
    AchievementDefinition, GameDefinition, GeneratorDefinition, MultiplierDefinition,
    ResourceDefinition, UpgradeDefinition, load_definition_from_path, load_sample_definition,
    parse_definition,
};
pub use error::{EconomyError, EconomyResult};
pub use model::{
    Achievement, Condition, CostSchedule, EconomyView, Effect, Generator, Multiplier,
    MultiplierKind, Registry, Resource, ResourceAmount, Upgrade, format_amount,
};
pub use save::{
    FileSaveStore, MemorySaveStore, SAVE_VERSION, SaveAttachments, SaveData, SaveStore,
    export_to_base64, import_from_base64, import_save_text, load_from_json_string,
    save_to_json_string,
};
