use std::collections::BTreeMap;

/// Lifetime counters for a game. Every recording operation only ever grows a
/// total.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsTracker {
    pub(crate) resources_earned: BTreeMap<String, f64>,
    pub(crate) resources_spent: BTreeMap<String, f64>,
    pub(crate) generators_purchased: BTreeMap<String, u64>,
    pub(crate) upgrades_purchased: BTreeMap<String, u64>,
    pub(crate) achievements_unlocked: u64,
    pub(crate) total_clicks: u64,
    pub(crate) time_played: f64,
    pub(crate) session_start_ms: i64,
}

impl StatisticsTracker {
    pub fn new(now_ms: i64) -> Self {
        Self {
            resources_earned: BTreeMap::new(),
            resources_spent: BTreeMap::new(),
            generators_purchased: BTreeMap::new(),
            upgrades_purchased: BTreeMap::new(),
            achievements_unlocked: 0,
            total_clicks: 0,
            time_played: 0.0,
            session_start_ms: now_ms,
        }
    }

    pub fn record_resource_earned(&mut self, resource_id: &str, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        *self.resources_earned.entry(resource_id.to_string()).or_default() += amount;
    }

    pub fn record_resource_spent(&mut self, resource_id: &str, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        *self.resources_spent.entry(resource_id.to_string()).or_default() += amount;
    }

    pub fn record_generator_purchase(&mut self, generator_id: &str, quantity: u64) {
        let total = self
            .generators_purchased
            .entry(generator_id.to_string())
            .or_default();
        *total = total.saturating_add(quantity);
    }

    pub fn record_upgrade_purchase(&mut self, upgrade_id: &str) {
        self.record_upgrade_purchases(upgrade_id, 1);
    }

    pub(crate) fn record_upgrade_purchases(&mut self, upgrade_id: &str, count: u64) {
        let total = self.upgrades_purchased.entry(upgrade_id.to_string()).or_default();
        *total = total.saturating_add(count);
    }

    pub fn record_achievement_unlocked(&mut self) {
        self.achievements_unlocked = self.achievements_unlocked.saturating_add(1);
    }

    pub fn record_click(&mut self) {
        self.total_clicks = self.total_clicks.saturating_add(1);
    }

    /// Folds wall time since the session start into the total and restarts the
    /// session at `now_ms`, so repeated calls never count a span twice.
    pub fn update_time_played(&mut self, now_ms: i64) {
        let elapsed_ms = now_ms.saturating_sub(self.session_start_ms).max(0);
        self.time_played += elapsed_ms as f64 / 1000.0;
        self.session_start_ms = now_ms;
    }

    pub fn restart_session(&mut self, now_ms: i64) {
        self.session_start_ms = now_ms;
    }

    pub fn resource_earned(&self, resource_id: &str) -> f64 {
        self.resources_earned.get(resource_id).copied().unwrap_or(0.0)
    }

    pub fn resource_spent(&self, resource_id: &str) -> f64 {
        self.resources_spent.get(resource_id).copied().unwrap_or(0.0)
    }

    pub fn generator_purchases(&self, generator_id: &str) -> u64 {
        self.generators_purchased.get(generator_id).copied().unwrap_or(0)
    }

    pub fn total_generators_purchased(&self) -> u64 {
        self.generators_purchased
            .values()
            .fold(0u64, |total, count| total.saturating_add(*count))
    }

    pub fn upgrade_purchases(&self, upgrade_id: &str) -> u64 {
        self.upgrades_purchased.get(upgrade_id).copied().unwrap_or(0)
    }

    pub fn total_upgrades_purchased(&self) -> u64 {
        self.upgrades_purchased
            .values()
            .fold(0u64, |total, count| total.saturating_add(*count))
    }

    pub fn achievements_unlocked(&self) -> u64 {
        self.achievements_unlocked
    }

    pub fn total_clicks(&self) -> u64 {
        self.total_clicks
    }

    pub fn time_played(&self) -> f64 {
        self.time_played
    }

    pub fn session_start_ms(&self) -> i64 {
        self.session_start_ms
    }
}
