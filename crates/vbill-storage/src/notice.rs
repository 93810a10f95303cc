//! User-facing feedback produced by a billing session.
//!
//! Each applied command yields exactly one [`Notice`]. Recoverable ledger
//! conditions (remove of an absent item, save of an empty bill) are notices,
//! not errors.

use std::fmt;

use serde::Serialize;

use vbill_core::{BillId, LedgerError, LineItem};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    ItemAdded { item: LineItem },
    ItemUpdated { item: LineItem },
    /// The item broke a line-item invariant and was not applied.
    ItemRejected { name: String, reason: String },
    ItemRemoved { item: LineItem },
    ItemNotFound { name: String },
    BillCleared { cleared: usize },
    BillSaved { bill_id: BillId, total: f64, item_count: usize },
    CannotSaveEmptyBill,
    /// Running total; the bill stays open until the user says "save".
    TotalRequested { total: f64 },
    NotUnderstood,
}

impl Notice {
    /// Short heading shown above the message.
    pub fn title(&self) -> &'static str {
        match self {
            Notice::ItemAdded { .. } => "Item Added",
            Notice::ItemUpdated { .. } => "Item Updated",
            Notice::ItemRejected { .. } => "Item Rejected",
            Notice::ItemRemoved { .. } => "Item Removed",
            Notice::ItemNotFound { .. } => "Item Not Found",
            Notice::BillCleared { .. } => "Bill Cleared",
            Notice::BillSaved { .. } => "Bill Saved",
            Notice::CannotSaveEmptyBill => "Cannot Save",
            Notice::TotalRequested { .. } => "Total",
            Notice::NotUnderstood => "Not Understood",
        }
    }

    /// Whether the notice reports something the user should retry or fix.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Notice::ItemRejected { .. }
                | Notice::ItemNotFound { .. }
                | Notice::CannotSaveEmptyBill
                | Notice::NotUnderstood
        )
    }

    /// Maps a recoverable ledger condition to its notice. `name` is the item
    /// the command referred to, used when the error does not carry one.
    pub(crate) fn from_ledger_error(err: LedgerError, name: &str) -> Notice {
        match err {
            LedgerError::ItemNotFound { name } => Notice::ItemNotFound { name },
            LedgerError::EmptyBill => Notice::CannotSaveEmptyBill,
            LedgerError::InvalidItem { reason } => Notice::ItemRejected {
                name: name.to_string(),
                reason,
            },
            LedgerError::BillNotFound { id } => Notice::ItemRejected {
                name: id.to_string(),
                reason: "saved bill not found".to_string(),
            },
        }
    }
}

fn describe_line(f: &mut fmt::Formatter<'_>, item: &LineItem) -> fmt::Result {
    write!(
        f,
        "{} {} {} at ₹{:.2} = ₹{:.2}",
        item.name, item.quantity, item.unit, item.unit_price, item.line_total
    )
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.title())?;
        match self {
            Notice::ItemAdded { item } | Notice::ItemUpdated { item } => describe_line(f, item),
            Notice::ItemRejected { name, reason } => write!(f, "\"{name}\" was not added ({reason})"),
            Notice::ItemRemoved { item } => write!(f, "removed \"{}\" from the bill", item.name),
            Notice::ItemNotFound { name } => {
                write!(f, "could not find \"{name}\" in the current bill")
            }
            Notice::BillCleared { cleared } => write!(f, "cleared {cleared} item(s)"),
            Notice::BillSaved { total, item_count, .. } => {
                write!(f, "saved {item_count} item(s), total ₹{total:.2}")
            }
            Notice::CannotSaveEmptyBill => f.write_str("the bill has no items"),
            Notice::TotalRequested { total } => {
                write!(f, "₹{total:.2}. Say \"save\" to save the bill")
            }
            Notice::NotUnderstood => f.write_str("please try again"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vbill_core::NewItem;

    #[test]
    fn item_not_found_message() {
        let notice = Notice::ItemNotFound { name: "rice".into() };
        assert_eq!(
            notice.to_string(),
            "Item Not Found: could not find \"rice\" in the current bill"
        );
        assert!(notice.is_warning());
    }

    #[test]
    fn added_line_is_described() {
        let item = LineItem::from_new(NewItem::new("rice", 2.0, "kg", 60.0));
        let notice = Notice::ItemAdded { item };
        assert_eq!(notice.to_string(), "Item Added: rice 2 kg at ₹60.00 = ₹120.00");
        assert!(!notice.is_warning());
    }

    #[test]
    fn total_reminds_to_save() {
        let notice = Notice::TotalRequested { total: 175.5 };
        assert!(notice.to_string().contains("₹175.50"));
        assert!(notice.to_string().contains("save"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Notice::CannotSaveEmptyBill).unwrap();
        assert_eq!(json["kind"], "cannot_save_empty_bill");

        let json = serde_json::to_value(Notice::BillCleared { cleared: 3 }).unwrap();
        assert_eq!(json["kind"], "bill_cleared");
        assert_eq!(json["cleared"], 3);
    }

    #[test]
    fn ledger_errors_become_notices() {
        let notice = Notice::from_ledger_error(LedgerError::EmptyBill, "");
        assert_eq!(notice, Notice::CannotSaveEmptyBill);

        let notice = Notice::from_ledger_error(
            LedgerError::InvalidItem { reason: "quantity must be positive".into() },
            "rice",
        );
        assert!(matches!(notice, Notice::ItemRejected { ref name, .. } if name == "rice"));
    }
}
