mod clock;
mod config;
mod engine;
mod statistics;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DEFAULT_SAVE_KEY, EngineConfig, MAX_OFFLINE_SECONDS};
pub use engine::{Engine, OfflineReport, TickReport};
pub use statistics::StatisticsTracker;
