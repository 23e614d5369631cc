use crate::core::{Engine, StatisticsTracker};
use crate::error::{EconomyError, EconomyResult};

use super::{
    SAVE_VERSION, SaveAchievement, SaveAttachments, SaveData, SavePurchase, SaveResource,
    SaveStatistics,
};

pub fn save_data_from_engine(engine: &Engine, timestamp: i64) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        resources: engine
            .resources()
            .iter()
            .map(|resource| SaveResource {
                id: resource.id.clone(),
                amount: resource.amount,
            })
            .collect(),
        generators: engine
            .generators()
            .iter()
            .map(|generator| SavePurchase {
                id: generator.id.clone(),
                purchased: generator.owned,
            })
            .collect(),
        upgrades: engine
            .upgrades()
            .iter()
            .map(|upgrade| SavePurchase {
                id: upgrade.id.clone(),
                purchased: u64::from(upgrade.purchased),
            })
            .collect(),
        achievements: engine
            .achievements()
            .iter()
            .map(|achievement| SaveAchievement {
                id: achievement.id.clone(),
                unlocked: achievement.unlocked,
            })
            .collect(),
        attachments: engine
            .generators()
            .iter()
            .filter(|generator| !generator.multipliers.is_empty())
            .map(|generator| SaveAttachments {
                generator: generator.id.clone(),
                multipliers: generator.multipliers.clone(),
            })
            .collect(),
        statistics: statistics_to_save(engine.statistics()),
        timestamp,
    }
}

/// Rejects records that cannot be applied cleanly. Runs before any engine
/// state is touched.
pub fn validate_save_data(save: &SaveData) -> EconomyResult<()> {
    if save.version > SAVE_VERSION {
        return Err(EconomyError::UnsupportedSaveVersion {
            found: save.version,
            supported: SAVE_VERSION,
        });
    }
    for resource in &save.resources {
        ensure_finite(resource.amount, || format!("resource '{}' amount", resource.id))?;
    }
    let stats = &save.statistics;
    for (id, amount) in stats
        .total_resources_earned
        .iter()
        .chain(&stats.total_resources_spent)
    {
        ensure_finite(*amount, || format!("statistics total for '{id}'"))?;
        ensure_non_negative(*amount, || format!("statistics total for '{id}'"))?;
    }
    ensure_finite(stats.time_played, || "time played".to_string())?;
    ensure_non_negative(stats.time_played, || "time played".to_string())?;
    Ok(())
}

/// Writes a validated record into the engine. Multiplier attachments and other
/// upgrade side effects are rebuilt by replaying each upgrade's effects once
/// per purchased unit on top of the registration-time baseline, then the
/// rewards of every unlocked achievement. The saved attachment order is laid
/// over the result last, since production folds multipliers in that order.
pub(crate) fn apply_save_data(engine: &mut Engine, save: &SaveData) {
    engine.restore_baseline();

    for entry in &save.resources {
        match engine.resources.get_mut(&entry.id) {
            Some(resource) => resource.set_amount(entry.amount),
            None => log::warn!("save references unknown resource '{}'", entry.id),
        }
    }

    for entry in &save.generators {
        match engine.generators.get_mut(&entry.id) {
            Some(generator) => {
                generator.owned = generator
                    .max_purchases
                    .map_or(entry.purchased, |max| entry.purchased.min(max));
            }
            None => log::warn!("save references unknown generator '{}'", entry.id),
        }
    }

    for entry in &save.upgrades {
        match engine.upgrades.get_mut(&entry.id) {
            Some(upgrade) => {
                let purchased = u32::try_from(entry.purchased).unwrap_or(u32::MAX);
                upgrade.purchased = purchased.min(upgrade.max_purchases);
            }
            None => log::warn!("save references unknown upgrade '{}'", entry.id),
        }
    }

    let replays: Vec<_> = engine
        .upgrades
        .iter()
        .filter(|upgrade| upgrade.purchased > 0)
        .map(|upgrade| (upgrade.purchased, upgrade.effects.clone()))
        .collect();
    for (purchased, effects) in replays {
        for _ in 0..purchased {
            engine.apply_effects(&effects, true);
        }
    }

    for entry in &save.achievements {
        match engine.achievements.get_mut(&entry.id) {
            Some(achievement) => achievement.unlocked = entry.unlocked,
            None => log::warn!("save references unknown achievement '{}'", entry.id),
        }
    }

    let rewards: Vec<_> = engine
        .achievements
        .iter()
        .filter(|achievement| achievement.unlocked)
        .map(|achievement| achievement.rewards.clone())
        .collect();
    for effects in rewards {
        engine.apply_effects(&effects, true);
    }

    for entry in &save.attachments {
        match engine.generators.get_mut(&entry.generator) {
            Some(generator) => {
                let ordered = attachment_order(&generator.multipliers, &entry.multipliers);
                generator.multipliers = ordered;
            }
            None => log::warn!("save references unknown generator '{}'", entry.generator),
        }
    }

    engine.statistics = statistics_from_save(&save.statistics);
}

/// Orders the currently attached ids by their saved position. Saved ids that
/// are no longer attached are dropped; attached ids the save does not mention
/// keep their relative order after the saved ones.
fn attachment_order(attached: &[String], saved: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(attached.len());
    for id in saved {
        if attached.contains(id) && !ordered.contains(id) {
            ordered.push(id.clone());
        }
    }
    for id in attached {
        if !ordered.contains(id) {
            ordered.push(id.clone());
        }
    }
    ordered
}

fn statistics_to_save(stats: &StatisticsTracker) -> SaveStatistics {
    SaveStatistics {
        total_resources_earned: pairs(&stats.resources_earned),
        total_resources_spent: pairs(&stats.resources_spent),
        total_generators_purchased: pairs(&stats.generators_purchased),
        total_upgrades_purchased: pairs(&stats.upgrades_purchased),
        achievements_unlocked: stats.achievements_unlocked,
        total_clicks: stats.total_clicks,
        time_played: stats.time_played,
        session_start_time: stats.session_start_ms,
    }
}

fn statistics_from_save(save: &SaveStatistics) -> StatisticsTracker {
    let mut stats = StatisticsTracker::new(save.session_start_time);
    for (id, amount) in &save.total_resources_earned {
        stats.record_resource_earned(id, *amount);
    }
    for (id, amount) in &save.total_resources_spent {
        stats.record_resource_spent(id, *amount);
    }
    for (id, count) in &save.total_generators_purchased {
        stats.record_generator_purchase(id, *count);
    }
    for (id, count) in &save.total_upgrades_purchased {
        stats.record_upgrade_purchases(id, *count);
    }
    stats.achievements_unlocked = save.achievements_unlocked;
    stats.total_clicks = save.total_clicks;
    stats.time_played = save.time_played;
    stats
}

fn pairs<V: Copy>(map: &std::collections::BTreeMap<String, V>) -> Vec<(String, V)> {
    map.iter().map(|(id, value)| (id.clone(), *value)).collect()
}

fn ensure_finite(value: f64, label: impl FnOnce() -> String) -> EconomyResult<()> {
    if value.is_finite() {
        return Ok(());
    }
    Err(EconomyError::MalformedSave {
        reason: format!("{} is not finite", label()),
    })
}

fn ensure_non_negative(value: f64, label: impl FnOnce() -> String) -> EconomyResult<()> {
    if value >= 0.0 {
        return Ok(());
    }
    Err(EconomyError::MalformedSave {
        reason: format!("{} is negative", label()),
    })
}

#[cfg(test)]
mod tests {
    use super::attachment_order;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn saved_order_wins_over_replay_order() {
        let attached = ids(&["base", "plus", "double"]);
        let saved = ids(&["base", "double", "plus"]);
        assert_eq!(attachment_order(&attached, &saved), saved);
    }

    #[test]
    fn stale_saved_ids_are_dropped_and_new_ones_kept() {
        let attached = ids(&["base", "plus", "fresh"]);
        let saved = ids(&["plus", "gone", "base"]);
        assert_eq!(
            attachment_order(&attached, &saved),
            ids(&["plus", "base", "fresh"])
        );
    }
}
