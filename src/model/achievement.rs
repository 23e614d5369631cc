use super::effect::{Condition, EconomyView, Effect};
use super::registry::Keyed;

const HIDDEN_LABEL: &str = "???";

#[derive(Debug, Clone, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub condition: Condition,
    pub rewards: Vec<Effect>,
    pub secret: bool,
    pub unlocked: bool,
}

impl Achievement {
    pub fn new(id: impl Into<String>, name: impl Into<String>, condition: Condition) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            condition,
            rewards: Vec::new(),
            secret: false,
            unlocked: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reward(mut self, reward: Effect) -> Self {
        self.rewards.push(reward);
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Unlocks when the condition first holds. Returns `true` only on that
    /// transition; the caller then applies [`Self::rewards`].
    pub fn check(&mut self, view: &EconomyView<'_>) -> bool {
        if self.unlocked || !self.condition.evaluate(view) {
            return false;
        }
        self.unlocked = true;
        true
    }

    pub fn display_name(&self) -> &str {
        if self.is_hidden() { HIDDEN_LABEL } else { &self.name }
    }

    pub fn display_description(&self) -> &str {
        if self.is_hidden() {
            HIDDEN_LABEL
        } else {
            &self.description
        }
    }

    fn is_hidden(&self) -> bool {
        self.secret && !self.unlocked
    }
}

impl Keyed for Achievement {
    fn key(&self) -> &str {
        &self.id
    }
}
