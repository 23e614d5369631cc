use super::effect::{Condition, EconomyView, Effect};
use super::generator::ResourceAmount;
use super::registry::{Keyed, Registry};
use super::resource::Resource;

#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Flat prices; upgrades do not scale with purchase count.
    pub costs: Vec<ResourceAmount>,
    /// Applied once per successful purchase and replayed once per purchased
    /// unit when a save is loaded.
    pub effects: Vec<Effect>,
    pub visible_when: Condition,
    pub max_purchases: u32,
    pub purchased: u32,
}

impl Upgrade {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            costs: Vec::new(),
            effects: Vec::new(),
            visible_when: Condition::Always,
            max_purchases: 1,
            purchased: 0,
        }
    }

    pub fn with_cost(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.costs.push(ResourceAmount::new(resource, amount));
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_max_purchases(mut self, max_purchases: u32) -> Self {
        self.max_purchases = max_purchases;
        self
    }

    pub fn visible_when(mut self, condition: Condition) -> Self {
        self.visible_when = condition;
        self
    }

    pub fn is_maxed(&self) -> bool {
        self.purchased >= self.max_purchases
    }

    pub fn is_visible(&self, view: &EconomyView<'_>) -> bool {
        self.visible_when.evaluate(view)
    }

    pub fn can_purchase(&self, resources: &Registry<Resource>) -> bool {
        !self.is_maxed()
            && self.costs.iter().all(|cost| {
                resources
                    .get(&cost.resource)
                    .is_some_and(|resource| resource.can_afford(cost.amount))
            })
    }

    /// Pays every flat cost and bumps the purchase count. The caller applies
    /// [`Self::effects`] on success.
    pub fn purchase(&mut self, resources: &mut Registry<Resource>) -> Option<Vec<ResourceAmount>> {
        if !self.can_purchase(resources) {
            return None;
        }
        for cost in &self.costs {
            if let Some(resource) = resources.get_mut(&cost.resource) {
                resource.subtract(cost.amount);
            }
        }
        self.purchased += 1;
        Some(self.costs.clone())
    }
}

impl Keyed for Upgrade {
    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::Upgrade;
    use crate::model::{Registry, Resource};

    fn purse(gold: f64, gems: f64) -> Registry<Resource> {
        let mut gold_resource = Resource::new("gold", "Gold");
        gold_resource.add(gold);
        let mut gem_resource = Resource::new("gems", "Gems");
        gem_resource.add(gems);
        [gold_resource, gem_resource].into_iter().collect()
    }

    #[test]
    fn purchase_pays_all_costs_and_returns_them() {
        let mut resources = purse(100.0, 5.0);
        let mut upgrade = Upgrade::new("sharp", "Sharper Picks")
            .with_cost("gold", 60.0)
            .with_cost("gems", 2.0);

        let paid = upgrade.purchase(&mut resources).expect("affordable");

        assert_eq!(paid, upgrade.costs);
        assert_eq!(upgrade.purchased, 1);
        assert!(upgrade.is_maxed());
        assert_eq!(resources.get("gold").map(|r| r.amount), Some(40.0));
        assert_eq!(resources.get("gems").map(|r| r.amount), Some(3.0));
    }

    #[test]
    fn unaffordable_purchase_changes_nothing() {
        let mut resources = purse(100.0, 1.0);
        let mut upgrade = Upgrade::new("sharp", "Sharper Picks")
            .with_cost("gold", 60.0)
            .with_cost("gems", 2.0);

        assert!(upgrade.purchase(&mut resources).is_none());
        assert_eq!(upgrade.purchased, 0);
        assert_eq!(resources.get("gold").map(|r| r.amount), Some(100.0));
    }

    #[test]
    fn purchase_limit_stops_further_purchases() {
        let mut resources = purse(100.0, 0.0);
        let mut upgrade = Upgrade::new("drill", "Drill Bits")
            .with_cost("gold", 10.0)
            .with_max_purchases(2);

        assert!(upgrade.purchase(&mut resources).is_some());
        assert!(upgrade.purchase(&mut resources).is_some());
        assert!(upgrade.is_maxed());
        assert!(!upgrade.can_purchase(&resources));
        assert!(upgrade.purchase(&mut resources).is_none());
        assert_eq!(resources.get("gold").map(|r| r.amount), Some(80.0));
    }
}
