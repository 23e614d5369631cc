use serde::{Deserialize, Serialize};

use super::registry::Keyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiplierKind {
    Additive,
    Multiplicative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Multiplier {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: MultiplierKind,
    pub value: f64,
    /// Generator this multiplier is restricted to; `None` applies wherever
    /// it is attached.
    pub target: Option<String>,
    pub active: bool,
}

impl Multiplier {
    pub fn new(id: impl Into<String>, kind: MultiplierKind, value: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            kind,
            value,
            target: None,
            active: true,
        }
    }

    pub fn additive(id: impl Into<String>, value: f64) -> Self {
        Self::new(id, MultiplierKind::Additive, value)
    }

    pub fn multiplicative(id: impl Into<String>, value: f64) -> Self {
        Self::new(id, MultiplierKind::Multiplicative, value)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_target(mut self, generator_id: impl Into<String>) -> Self {
        self.target = Some(generator_id.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn apply(&self, base: f64) -> f64 {
        if !self.active {
            return base;
        }
        match self.kind {
            MultiplierKind::Additive => base + self.value,
            MultiplierKind::Multiplicative => base * self.value,
        }
    }

    pub fn applies_to(&self, generator_id: &str) -> bool {
        self.target
            .as_deref()
            .is_none_or(|target| target == generator_id)
    }
}

impl Keyed for Multiplier {
    fn key(&self) -> &str {
        &self.id
    }
}
