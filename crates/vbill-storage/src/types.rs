//! The persisted state shape.
//!
//! Only the owner label, saved-bill history and enrollment flags survive a
//! restart. The open bill is deliberately absent: an unfinished bill must not
//! come back after a reload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vbill_core::SavedBill;

/// Everything a store keeps between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Shop or owner name stamped on saved bills.
    pub owner_label: String,
    /// Saved bills, most recent first.
    pub history: Vec<SavedBill>,
    /// Voice enrollment per owner, keyed by lowercased owner label.
    pub enrollment_flags: BTreeMap<String, bool>,
}

/// Normalizes an owner label into an enrollment key.
pub fn enrollment_key(owner: &str) -> String {
    owner.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_json_has_no_open_bill() {
        let json = serde_json::to_value(PersistedState::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(object.contains_key("owner_label"));
        assert!(object.contains_key("history"));
        assert!(object.contains_key("enrollment_flags"));
    }

    #[test]
    fn enrollment_key_folds_case() {
        assert_eq!(enrollment_key("  Murugan Stores "), "murugan stores");
    }
}
