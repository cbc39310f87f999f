use serde::{Deserialize, Serialize};

/// Parts and labor totals for a work order, in the fleet's currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub parts: f64,
    pub labor: f64,
    pub total: f64,
}

impl CostEstimate {
    pub fn new(quantity: f64, unit_price: f64, labor_hours: f64, labor_rate: f64) -> Self {
        let parts = parts_cost(quantity, unit_price);
        let labor = labor_cost(labor_hours, labor_rate);
        Self {
            parts,
            labor,
            total: round_cents(parts + labor),
        }
    }
}

pub fn parts_cost(quantity: f64, unit_price: f64) -> f64 {
    round_cents(quantity * unit_price)
}

pub fn labor_cost(hours: f64, rate: f64) -> f64 {
    round_cents(hours * rate)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
