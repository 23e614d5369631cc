use super::format::format_amount;
use super::registry::Keyed;

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub description: String,
    pub amount: f64,
    pub maximum: Option<f64>,
    pub display_precision: usize,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            amount: 0.0,
            maximum: None,
            display_precision: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self.amount = self.amount.min(maximum);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.display_precision = precision;
        self
    }

    /// Adds `value` (negative values decrease the amount) and clamps to the
    /// maximum when one is set.
    pub fn add(&mut self, value: f64) {
        self.amount += value;
        self.clamp_to_maximum();
    }

    /// Spends `value` only when the full amount is available.
    pub fn subtract(&mut self, value: f64) -> bool {
        if !self.can_afford(value) {
            return false;
        }
        self.amount -= value;
        true
    }

    pub fn can_afford(&self, value: f64) -> bool {
        self.amount >= value
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
        self.clamp_to_maximum();
    }

    pub fn formatted(&self) -> String {
        format_amount(self.amount, self.display_precision)
    }

    fn clamp_to_maximum(&mut self) {
        if let Some(maximum) = self.maximum {
            if self.amount > maximum {
                self.amount = maximum;
            }
        }
    }
}

impl Keyed for Resource {
    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::Resource;

    #[test]
    fn add_accumulates_without_a_cap() {
        let mut energy = Resource::new("energy", "Energy");
        energy.add(2.5);
        energy.add(0.25);
        assert_eq!(energy.amount, 2.75);
    }

    #[test]
    fn add_clamps_to_maximum() {
        let mut ore = Resource::new("ore", "Ore").with_maximum(10.0);
        ore.add(7.0);
        ore.add(7.0);
        assert_eq!(ore.amount, 10.0);
    }

    #[test]
    fn add_accepts_negative_values() {
        let mut ore = Resource::new("ore", "Ore");
        ore.add(5.0);
        ore.add(-2.0);
        assert_eq!(ore.amount, 3.0);
    }

    #[test]
    fn subtract_is_all_or_nothing() {
        let mut gold = Resource::new("gold", "Gold");
        gold.add(10.0);

        assert!(!gold.subtract(10.5));
        assert_eq!(gold.amount, 10.0);

        assert!(gold.subtract(10.0));
        assert_eq!(gold.amount, 0.0);
    }

    #[test]
    fn formatted_uses_display_precision() {
        let mut gold = Resource::new("gold", "Gold").with_precision(1);
        gold.add(1_260_000.0);
        assert_eq!(gold.formatted(), "1.3M");
    }
}
