use serde::{Deserialize, Serialize};

use super::multiplier::Multiplier;
use super::registry::{Keyed, Registry};
use super::resource::Resource;

pub const DEFAULT_SCALING_FACTOR: f64 = 1.15;

/// Search ceiling for [`Generator::max_affordable`] when no purchase limit is set.
pub const UNBOUNDED_PURCHASE_CEILING: u64 = 1_000_000;

/// An amount of a single resource, used for prices, payments and production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAmount {
    pub resource: String,
    pub amount: f64,
}

impl ResourceAmount {
    pub fn new(resource: impl Into<String>, amount: f64) -> Self {
        Self {
            resource: resource.into(),
            amount,
        }
    }
}

/// Geometric price schedule for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSchedule {
    pub resource: String,
    pub base_amount: f64,
    #[serde(default = "default_scaling_factor")]
    pub scaling_factor: f64,
}

fn default_scaling_factor() -> f64 {
    DEFAULT_SCALING_FACTOR
}

impl CostSchedule {
    pub fn new(resource: impl Into<String>, base_amount: f64) -> Self {
        Self {
            resource: resource.into(),
            base_amount,
            scaling_factor: DEFAULT_SCALING_FACTOR,
        }
    }

    pub fn with_scaling(mut self, scaling_factor: f64) -> Self {
        self.scaling_factor = scaling_factor;
        self
    }

    /// Price of the unit bought when `index` units are already owned.
    pub fn unit_cost(&self, index: u64) -> f64 {
        self.base_amount * self.scaling_factor.powf(index as f64)
    }

    /// Sum of unit prices over `[owned, owned + quantity)`.
    pub fn bulk_cost(&self, owned: u64, quantity: u64) -> f64 {
        (0..quantity)
            .map(|step| self.unit_cost(owned.saturating_add(step)))
            .sum()
    }

    /// Like [`Self::bulk_cost`] but stops summing once `budget` is exceeded.
    fn fits_budget(&self, owned: u64, quantity: u64, budget: f64) -> bool {
        let mut total = 0.0;
        for step in 0..quantity {
            total += self.unit_cost(owned.saturating_add(step));
            if total > budget {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    pub id: String,
    pub name: String,
    pub description: String,
    pub resource: String,
    pub base_production_rate: f64,
    pub costs: Vec<CostSchedule>,
    pub max_purchases: Option<u64>,
    pub owned: u64,
    /// Attached multiplier ids, folded in this order.
    pub multipliers: Vec<String>,
}

impl Generator {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource: impl Into<String>,
        base_production_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            resource: resource.into(),
            base_production_rate,
            costs: Vec::new(),
            max_purchases: None,
            owned: 0,
            multipliers: Vec::new(),
        }
    }

    pub fn with_cost(mut self, schedule: CostSchedule) -> Self {
        self.costs.push(schedule);
        self
    }

    pub fn with_max_purchases(mut self, max_purchases: u64) -> Self {
        self.max_purchases = Some(max_purchases);
        self
    }

    /// Attaches a multiplier by id. Attaching an id twice is a no-op.
    pub fn attach_multiplier(&mut self, multiplier_id: &str) -> bool {
        if self.multipliers.iter().any(|id| id == multiplier_id) {
            return false;
        }
        self.multipliers.push(multiplier_id.to_string());
        true
    }

    pub fn detach_multiplier(&mut self, multiplier_id: &str) -> bool {
        let before = self.multipliers.len();
        self.multipliers.retain(|id| id != multiplier_id);
        self.multipliers.len() != before
    }

    /// Single-unit price at the current owned count.
    pub fn current_costs(&self) -> Vec<ResourceAmount> {
        self.costs
            .iter()
            .map(|schedule| ResourceAmount::new(&schedule.resource, schedule.unit_cost(self.owned)))
            .collect()
    }

    /// Total price of `quantity` more units, merged per resource.
    pub fn bulk_cost(&self, quantity: u64) -> Vec<ResourceAmount> {
        let mut totals: Vec<ResourceAmount> = Vec::with_capacity(self.costs.len());
        for schedule in &self.costs {
            let amount = schedule.bulk_cost(self.owned, quantity);
            match totals.iter_mut().find(|entry| entry.resource == schedule.resource) {
                Some(entry) => entry.amount += amount,
                None => totals.push(ResourceAmount::new(&schedule.resource, amount)),
            }
        }
        totals
    }

    pub fn remaining_purchases(&self) -> Option<u64> {
        self.max_purchases
            .map(|max| max.saturating_sub(self.owned))
    }

    pub fn is_maxed(&self) -> bool {
        self.remaining_purchases() == Some(0)
    }

    pub fn can_purchase(&self, resources: &Registry<Resource>, quantity: u64) -> bool {
        if let Some(remaining) = self.remaining_purchases() {
            if quantity > remaining {
                return false;
            }
        }
        if quantity == 0 {
            return true;
        }
        if let [schedule] = self.costs.as_slice() {
            // Single-resource schedules can bail out as soon as the budget is blown.
            let Some(resource) = resources.get(&schedule.resource) else {
                return false;
            };
            return schedule.fits_budget(self.owned, quantity, resource.amount);
        }
        self.bulk_cost(quantity).iter().all(|cost| {
            resources
                .get(&cost.resource)
                .is_some_and(|resource| resource.can_afford(cost.amount))
        })
    }

    /// Buys `quantity` units atomically, returning what was paid.
    pub fn purchase(
        &mut self,
        resources: &mut Registry<Resource>,
        quantity: u64,
    ) -> Option<Vec<ResourceAmount>> {
        if quantity == 0 || !self.can_purchase(resources, quantity) {
            return None;
        }
        let paid = self.bulk_cost(quantity);
        for cost in &paid {
            if let Some(resource) = resources.get_mut(&cost.resource) {
                resource.subtract(cost.amount);
            }
        }
        self.owned = self.owned.saturating_add(quantity);
        Some(paid)
    }

    /// Largest quantity that [`Self::can_purchase`] accepts.
    pub fn max_affordable(&self, resources: &Registry<Resource>) -> u64 {
        let ceiling = self
            .remaining_purchases()
            .unwrap_or(UNBOUNDED_PURCHASE_CEILING);
        let (mut low, mut high) = (0, ceiling);
        while low < high {
            let mid = low + (high - low).div_ceil(2);
            if self.can_purchase(resources, mid) {
                low = mid;
            } else {
                high = mid - 1;
            }
        }
        low
    }

    /// `base_production_rate * owned`, folded left through active multipliers
    /// in attachment order.
    pub fn current_production(&self, multipliers: &Registry<Multiplier>) -> f64 {
        let base = self.base_production_rate * self.owned as f64;
        self.multipliers
            .iter()
            .filter_map(|id| multipliers.get(id))
            .filter(|multiplier| multiplier.applies_to(&self.id))
            .fold(base, |value, multiplier| multiplier.apply(value))
    }
}

impl Keyed for Generator {
    fn key(&self) -> &str {
        &self.id
    }
}
