mod achievement;
mod effect;
mod format;
mod generator;
mod multiplier;
mod registry;
mod resource;
mod upgrade;

pub use achievement::Achievement;
pub use effect::{Condition, EconomyView, Effect};
pub use format::format_amount;
pub use generator::{
    CostSchedule, DEFAULT_SCALING_FACTOR, Generator, ResourceAmount, UNBOUNDED_PURCHASE_CEILING,
};
pub use multiplier::{Multiplier, MultiplierKind};
pub use registry::{Keyed, Registry};
pub use resource::Resource;
pub use upgrade::Upgrade;
