use std::collections::HashMap;

use chrono::DateTime;

use crate::error::{EconomyError, EconomyResult};
use crate::model::{
    Achievement, EconomyView, Effect, Generator, Multiplier, Registry, Resource, ResourceAmount,
    Upgrade,
};
use crate::save::{
    SaveData, SaveStore, apply_save_data, export_to_base64, import_save_text,
    load_from_json_string, save_data_from_engine, save_to_json_string, validate_save_data,
};

use super::clock::Clock;
use super::config::EngineConfig;
use super::statistics::StatisticsTracker;

/// What one live tick did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    pub delta_seconds: f64,
    pub produced: Vec<ResourceAmount>,
    pub unlocked: Vec<String>,
    pub saved: bool,
}

/// What loading a save credited for the time the game was closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OfflineReport {
    /// Real seconds between the save and the load.
    pub elapsed_seconds: f64,
    /// Seconds actually simulated after clamping.
    pub applied_seconds: f64,
    pub produced: Vec<ResourceAmount>,
    pub unlocked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct GeneratorBaseline {
    base_production_rate: f64,
    multipliers: Vec<String>,
}

/// Registration-time values of state that upgrade effects mutate.
#[derive(Debug, Clone, Default)]
struct Baseline {
    multipliers: Registry<Multiplier>,
    generators: HashMap<String, GeneratorBaseline>,
}

/// Owns every economy entity and drives the tick loop.
///
/// The engine is single-threaded: purchases, saves and ticks all run to
/// completion on the caller's thread. A host's periodic timer calls
/// [`Engine::pump`]; tests usually call [`Engine::tick`] directly with a
/// [`ManualClock`](super::ManualClock).
pub struct Engine {
    config: EngineConfig,
    clock: Box<dyn Clock>,
    store: Box<dyn SaveStore>,
    pub(crate) resources: Registry<Resource>,
    pub(crate) multipliers: Registry<Multiplier>,
    pub(crate) generators: Registry<Generator>,
    pub(crate) upgrades: Registry<Upgrade>,
    pub(crate) achievements: Registry<Achievement>,
    pub(crate) statistics: StatisticsTracker,
    baseline: Baseline,
    running: bool,
    last_tick_ms: i64,
    last_save_ms: i64,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        clock: impl Clock + 'static,
        store: impl SaveStore + 'static,
    ) -> Self {
        let now = clock.now_ms();
        Self {
            config,
            clock: Box::new(clock),
            store: Box::new(store),
            resources: Registry::new(),
            multipliers: Registry::new(),
            generators: Registry::new(),
            upgrades: Registry::new(),
            achievements: Registry::new(),
            statistics: StatisticsTracker::new(now),
            baseline: Baseline::default(),
            running: false,
            last_tick_ms: now,
            last_save_ms: now,
        }
    }

    // ── Registration ───────────────────────────────────────────

    pub fn register_resource(&mut self, resource: Resource) {
        self.resources.insert(resource);
    }

    pub fn register_multiplier(&mut self, multiplier: Multiplier) {
        self.baseline.multipliers.insert(multiplier.clone());
        self.multipliers.insert(multiplier);
    }

    pub fn register_generator(&mut self, generator: Generator) {
        self.baseline.generators.insert(
            generator.id.clone(),
            GeneratorBaseline {
                base_production_rate: generator.base_production_rate,
                multipliers: generator.multipliers.clone(),
            },
        );
        self.generators.insert(generator);
    }

    pub fn register_upgrade(&mut self, upgrade: Upgrade) {
        self.upgrades.insert(upgrade);
    }

    pub fn register_achievement(&mut self, achievement: Achievement) {
        self.achievements.insert(achievement);
    }

    // ── Read access ────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn resources(&self) -> &Registry<Resource> {
        &self.resources
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Direct access for hosts that grant or adjust amounts outside purchases.
    pub fn resource_mut(&mut self, id: &str) -> Option<&mut Resource> {
        self.resources.get_mut(id)
    }

    pub fn multipliers(&self) -> &Registry<Multiplier> {
        &self.multipliers
    }

    pub fn multiplier(&self, id: &str) -> Option<&Multiplier> {
        self.multipliers.get(id)
    }

    pub fn generators(&self) -> &Registry<Generator> {
        &self.generators
    }

    pub fn generator(&self, id: &str) -> Option<&Generator> {
        self.generators.get(id)
    }

    pub fn upgrades(&self) -> &Registry<Upgrade> {
        &self.upgrades
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.get(id)
    }

    pub fn achievements(&self) -> &Registry<Achievement> {
        &self.achievements
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.get(id)
    }

    pub fn statistics(&self) -> &StatisticsTracker {
        &self.statistics
    }

    pub fn view(&self) -> EconomyView<'_> {
        EconomyView {
            resources: &self.resources,
            generators: &self.generators,
            upgrades: &self.upgrades,
            statistics: &self.statistics,
        }
    }

    pub fn visible_upgrades(&self) -> Vec<&Upgrade> {
        let view = self.view();
        self.upgrades
            .iter()
            .filter(|upgrade| upgrade.is_visible(&view))
            .collect()
    }

    /// Combined per-second output of every generator feeding `resource_id`.
    pub fn production_per_second(&self, resource_id: &str) -> f64 {
        self.generators
            .iter()
            .filter(|generator| generator.resource == resource_id)
            .map(|generator| generator.current_production(&self.multipliers))
            .sum()
    }

    pub fn max_affordable(&self, generator_id: &str) -> u64 {
        self.generators
            .get(generator_id)
            .map_or(0, |generator| generator.max_affordable(&self.resources))
    }

    pub fn generator_bulk_cost(&self, generator_id: &str, quantity: u64) -> Vec<ResourceAmount> {
        self.generators
            .get(generator_id)
            .map(|generator| generator.bulk_cost(quantity))
            .unwrap_or_default()
    }

    // ── Scheduling ─────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        let now = self.clock.now_ms();
        self.last_tick_ms = now;
        self.last_save_ms = now;
        self.running = true;
        log::info!(
            "engine started (tick every {}ms, auto-save every {}ms)",
            self.config.tick_interval_ms,
            self.config.auto_save_interval_ms
        );
    }

    /// Halts ticking. Does not save.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("engine stopped");
    }

    /// Timer callback: ticks when running and a tick interval has passed.
    pub fn pump(&mut self) -> Option<TickReport> {
        if !self.running {
            return None;
        }
        let now = self.clock.now_ms();
        if now - self.last_tick_ms < millis(self.config.tick_interval_ms) {
            return None;
        }
        Some(self.tick())
    }

    /// One simulation step over the real time elapsed since the previous one.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now_ms();
        let delta_seconds = (now - self.last_tick_ms).max(0) as f64 / 1000.0;
        self.last_tick_ms = now;

        let produced = self.produce(delta_seconds);
        let unlocked = self.check_achievements();

        let mut saved = false;
        if now - self.last_save_ms >= millis(self.config.auto_save_interval_ms) {
            match self.save() {
                Ok(()) => saved = true,
                Err(err) => log::warn!("auto-save failed: {err}"),
            }
            self.last_save_ms = now;
        }

        TickReport {
            delta_seconds,
            produced,
            unlocked,
            saved,
        }
    }

    // ── Player actions ─────────────────────────────────────────

    /// Manual gather of `amount` into a resource.
    pub fn click(&mut self, resource_id: &str, amount: f64) -> bool {
        let Some(resource) = self.resources.get_mut(resource_id) else {
            log::debug!("click on unknown resource '{resource_id}'");
            return false;
        };
        let before = resource.amount;
        resource.add(amount);
        let gained = resource.amount - before;
        self.statistics.record_click();
        self.statistics.record_resource_earned(resource_id, gained);
        true
    }

    pub fn purchase_generator(&mut self, generator_id: &str, quantity: u64) -> bool {
        let Some(generator) = self.generators.get_mut(generator_id) else {
            log::debug!("purchase of unknown generator '{generator_id}'");
            return false;
        };
        let Some(paid) = generator.purchase(&mut self.resources, quantity) else {
            return false;
        };
        let owned = generator.owned;
        for cost in &paid {
            self.statistics.record_resource_spent(&cost.resource, cost.amount);
        }
        self.statistics.record_generator_purchase(generator_id, quantity);
        log::debug!("bought {quantity}x '{generator_id}' (now {owned})");
        true
    }

    /// Buys as many units as the current balances allow. Returns the quantity.
    pub fn purchase_max_generator(&mut self, generator_id: &str) -> u64 {
        let quantity = self.max_affordable(generator_id);
        if quantity > 0 && self.purchase_generator(generator_id, quantity) {
            quantity
        } else {
            0
        }
    }

    pub fn purchase_upgrade(&mut self, upgrade_id: &str) -> bool {
        let Some(upgrade) = self.upgrades.get_mut(upgrade_id) else {
            log::debug!("purchase of unknown upgrade '{upgrade_id}'");
            return false;
        };
        let Some(paid) = upgrade.purchase(&mut self.resources) else {
            return false;
        };
        let effects = upgrade.effects.clone();
        for cost in &paid {
            self.statistics.record_resource_spent(&cost.resource, cost.amount);
        }
        self.statistics.record_upgrade_purchase(upgrade_id);
        self.apply_effects(&effects, false);
        log::debug!("bought upgrade '{upgrade_id}'");
        true
    }

    // ── Persistence ────────────────────────────────────────────

    /// Folds the session's play time into statistics and writes the save slot.
    pub fn save(&mut self) -> EconomyResult<()> {
        let record = self.snapshot();
        let json = save_to_json_string(&record)?;
        self.store.set(&self.config.save_key, &json)?;
        self.last_save_ms = record.timestamp;
        log::info!(
            "saved game '{}' at {}",
            self.config.save_key,
            format_timestamp(record.timestamp)
        );
        Ok(())
    }

    /// Restores the save slot and credits offline progress. Nothing is mutated
    /// unless the whole record parses and validates.
    pub fn load(&mut self) -> EconomyResult<OfflineReport> {
        let key = self.config.save_key.clone();
        let Some(json) = self.store.get(&key)? else {
            return Err(EconomyError::NoSave { key });
        };
        let record = load_from_json_string(&json)?;
        let report = self.restore(&record)?;
        log::info!(
            "loaded game '{key}' saved at {}; credited {:.1}s offline",
            format_timestamp(record.timestamp),
            report.applied_seconds
        );
        Ok(report)
    }

    /// Current state as a base64 record, without touching the save slot.
    pub fn export_save(&mut self) -> EconomyResult<String> {
        export_to_base64(&self.snapshot())
    }

    /// Applies an exported record (base64 or raw JSON) as if it were loaded.
    pub fn import_save(&mut self, text: &str) -> EconomyResult<OfflineReport> {
        let record = import_save_text(text)?;
        self.restore(&record)
    }

    /// Wipes all progress and deletes the save slot.
    pub fn reset(&mut self) -> EconomyResult<()> {
        self.restore_baseline();
        for resource in self.resources.iter_mut() {
            resource.amount = 0.0;
        }
        for generator in self.generators.iter_mut() {
            generator.owned = 0;
        }
        for upgrade in self.upgrades.iter_mut() {
            upgrade.purchased = 0;
        }
        for achievement in self.achievements.iter_mut() {
            achievement.unlocked = false;
        }
        let now = self.clock.now_ms();
        self.statistics = StatisticsTracker::new(now);
        self.last_tick_ms = now;
        self.last_save_ms = now;
        self.store.remove(&self.config.save_key)?;
        log::info!("reset game '{}'", self.config.save_key);
        Ok(())
    }

    /// Credits `elapsed_seconds` of production, clamped to the configured
    /// offline maximum.
    pub fn process_offline_progress(&mut self, elapsed_seconds: f64) -> OfflineReport {
        let applied_seconds = elapsed_seconds.max(0.0).min(self.config.max_offline_seconds);
        let produced = self.produce(applied_seconds);
        let unlocked = if self.config.check_achievements_after_offline {
            self.check_achievements()
        } else {
            Vec::new()
        };
        OfflineReport {
            elapsed_seconds,
            applied_seconds,
            produced,
            unlocked,
        }
    }

    // ── Internals ──────────────────────────────────────────────

    fn snapshot(&mut self) -> SaveData {
        let now = self.clock.now_ms();
        self.statistics.update_time_played(now);
        save_data_from_engine(self, now)
    }

    fn restore(&mut self, record: &SaveData) -> EconomyResult<OfflineReport> {
        validate_save_data(record)?;
        apply_save_data(self, record);

        let now = self.clock.now_ms();
        self.statistics.restart_session(now);
        self.last_tick_ms = now;
        self.last_save_ms = now;

        let elapsed_seconds = now.saturating_sub(record.timestamp).max(0) as f64 / 1000.0;
        Ok(self.process_offline_progress(elapsed_seconds))
    }

    /// Adds `seconds` worth of every generator's output to its resource.
    fn produce(&mut self, seconds: f64) -> Vec<ResourceAmount> {
        let mut produced: Vec<ResourceAmount> = Vec::new();
        if seconds <= 0.0 {
            return produced;
        }
        for generator in self.generators.iter() {
            let amount = generator.current_production(&self.multipliers) * seconds;
            if amount <= 0.0 {
                continue;
            }
            let Some(resource) = self.resources.get_mut(&generator.resource) else {
                log::debug!(
                    "generator '{}' produces unknown resource '{}'",
                    generator.id,
                    generator.resource
                );
                continue;
            };
            let before = resource.amount;
            resource.add(amount);
            let gained = resource.amount - before;
            if gained <= 0.0 {
                continue;
            }
            self.statistics.record_resource_earned(&generator.resource, gained);
            match produced
                .iter_mut()
                .find(|entry| entry.resource == generator.resource)
            {
                Some(entry) => entry.amount += gained,
                None => produced.push(ResourceAmount::new(&generator.resource, gained)),
            }
        }
        produced
    }

    fn check_achievements(&mut self) -> Vec<String> {
        let view = EconomyView {
            resources: &self.resources,
            generators: &self.generators,
            upgrades: &self.upgrades,
            statistics: &self.statistics,
        };
        let mut unlocked = Vec::new();
        for achievement in self.achievements.iter_mut() {
            if achievement.check(&view) {
                unlocked.push((achievement.id.clone(), achievement.rewards.clone()));
            }
        }

        let mut ids = Vec::with_capacity(unlocked.len());
        for (id, rewards) in unlocked {
            self.statistics.record_achievement_unlocked();
            self.apply_effects(&rewards, false);
            log::info!("achievement unlocked: '{id}'");
            ids.push(id);
        }
        ids
    }

    /// Runs effect commands. While `replaying`, effects whose outcome is
    /// already persisted are skipped.
    pub(crate) fn apply_effects(&mut self, effects: &[Effect], replaying: bool) {
        for effect in effects {
            if replaying && !effect.replays_on_load() {
                continue;
            }
            match effect {
                Effect::AttachMultiplier {
                    generator,
                    multiplier,
                } => {
                    if !self.multipliers.contains(multiplier) {
                        log::debug!("attach of unknown multiplier '{multiplier}'");
                        continue;
                    }
                    match self.generators.get_mut(generator) {
                        Some(entry) => {
                            entry.attach_multiplier(multiplier);
                        }
                        None => log::debug!("attach to unknown generator '{generator}'"),
                    }
                }
                Effect::DetachMultiplier {
                    generator,
                    multiplier,
                } => match self.generators.get_mut(generator) {
                    Some(entry) => {
                        entry.detach_multiplier(multiplier);
                    }
                    None => log::debug!("detach from unknown generator '{generator}'"),
                },
                Effect::SetMultiplierActive { multiplier, active } => {
                    match self.multipliers.get_mut(multiplier) {
                        Some(entry) => entry.active = *active,
                        None => log::debug!("toggle of unknown multiplier '{multiplier}'"),
                    }
                }
                Effect::AdjustMultiplier { multiplier, delta } => {
                    match self.multipliers.get_mut(multiplier) {
                        Some(entry) => entry.value += *delta,
                        None => log::debug!("adjust of unknown multiplier '{multiplier}'"),
                    }
                }
                Effect::ScaleProduction { generator, factor } => {
                    match self.generators.get_mut(generator) {
                        Some(entry) => entry.base_production_rate *= *factor,
                        None => log::debug!("scale of unknown generator '{generator}'"),
                    }
                }
                Effect::GrantResource { resource, amount } => {
                    match self.resources.get_mut(resource) {
                        Some(entry) => {
                            let before = entry.amount;
                            entry.add(*amount);
                            let gained = entry.amount - before;
                            self.statistics.record_resource_earned(resource, gained);
                        }
                        None => log::debug!("grant of unknown resource '{resource}'"),
                    }
                }
            }
        }
    }

    /// Puts multipliers and generator production back to how they were
    /// registered, undoing every upgrade effect.
    pub(crate) fn restore_baseline(&mut self) {
        for multiplier in self.multipliers.iter_mut() {
            if let Some(original) = self.baseline.multipliers.get(&multiplier.id) {
                *multiplier = original.clone();
            }
        }
        for generator in self.generators.iter_mut() {
            if let Some(original) = self.baseline.generators.get(&generator.id) {
                generator.base_production_rate = original.base_production_rate;
                generator.multipliers = original.multipliers.clone();
            }
        }
    }
}

fn millis(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| format!("{timestamp_ms}ms"))
}
