//! Bill data: open-bill lines, new-item requests and saved snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{BillId, LineItemId};

/// Unit recorded when an utterance names none.
pub const DEFAULT_UNIT: &str = "pcs";

/// Largest line total a single item may carry. Keeps every bill total
/// finite so it survives a JSON round trip.
pub const MAX_LINE_TOTAL: f64 = 1e12;

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sums line totals and rounds the result.
pub fn sum_line_totals<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> f64 {
    round2(items.into_iter().map(|item| item.line_total).sum())
}

/// A request to put an item on the open bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub unit_price: f64,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

impl NewItem {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>, unit_price: f64) -> Self {
        NewItem {
            name: name.into(),
            quantity,
            unit: unit.into(),
            unit_price,
        }
    }

    /// Checks the line-item invariants: a non-blank name, a finite positive
    /// quantity, a finite non-negative price, and a rounded line total no
    /// larger than [`MAX_LINE_TOTAL`].
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("item name is blank".into());
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(format!("quantity must be positive, got {}", self.quantity));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(format!("unit price must not be negative, got {}", self.unit_price));
        }
        let line_total = round2(self.quantity * self.unit_price);
        if !line_total.is_finite() || line_total > MAX_LINE_TOTAL {
            return Err(format!(
                "line total {} exceeds the maximum of {}",
                line_total, MAX_LINE_TOTAL
            ));
        }
        Ok(())
    }
}

/// One line of the open bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    /// Always `round2(quantity * unit_price)`.
    pub line_total: f64,
}

impl LineItem {
    /// Creates a line with a fresh id. The caller validates `item` first.
    pub fn from_new(item: NewItem) -> Self {
        let unit = if item.unit.trim().is_empty() {
            default_unit()
        } else {
            item.unit
        };
        LineItem {
            id: LineItemId::generate(),
            name: item.name.trim().to_string(),
            quantity: item.quantity,
            unit,
            unit_price: item.unit_price,
            line_total: round2(item.quantity * item.unit_price),
        }
    }

    /// Overwrites quantity, unit and price, keeping id and name.
    pub fn replace_values(&mut self, item: NewItem) {
        self.quantity = item.quantity;
        self.unit = if item.unit.trim().is_empty() {
            default_unit()
        } else {
            item.unit
        };
        self.unit_price = item.unit_price;
        self.recompute();
    }

    /// Re-derives `line_total` from quantity and price.
    pub fn recompute(&mut self) {
        self.line_total = round2(self.quantity * self.unit_price);
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// An immutable snapshot of a completed bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBill {
    pub id: BillId,
    pub owner_label: String,
    pub items: Vec<LineItem>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

impl SavedBill {
    /// Recomputes each item's line total and the bill total. Applied when a
    /// bill is read back from storage.
    pub fn hydrated(mut self) -> Self {
        for item in &mut self.items {
            item.recompute();
        }
        self.total_amount = sum_line_totals(&self.items);
        self
    }
}
