//! Structured commands produced by the parser.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// One structured command extracted from an utterance.
///
/// For `Add`, `item` is always a resolved catalog id, `quantity > 0` and
/// `unit_price >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ParsedCommand {
    Add {
        item: ItemId,
        quantity: f64,
        unit: String,
        unit_price: f64,
    },
    Remove {
        item: ItemId,
    },
    Reset,
    Save,
    /// Pure query for the running total; never mutates the ledger.
    Calculate,
}

impl ParsedCommand {
    /// Whether applying this command can change ledger state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, ParsedCommand::Calculate)
    }
}

/// Why a segment produced no command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// No catalog item could be resolved.
    NoItem,
    /// No quantity was found.
    NoQuantity,
    /// No price was found.
    NoPrice,
    /// The quantity parsed as zero.
    ZeroQuantity,
    /// A remove keyword was followed by nothing the catalog knows.
    UnknownRemoveTarget,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::NoItem => "no known item",
            DropReason::NoQuantity => "no quantity",
            DropReason::NoPrice => "no price",
            DropReason::ZeroQuantity => "quantity is zero",
            DropReason::UnknownRemoveTarget => "nothing known to remove",
        };
        f.write_str(text)
    }
}

/// Per-segment parse result, as reported by `CommandParser::explain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTrace {
    pub segment: String,
    #[serde(flatten)]
    pub outcome: SegmentOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SegmentOutcome {
    Parsed { command: ParsedCommand },
    Dropped { reason: DropReason },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commands_serialize_with_action_tag() {
        let add = ParsedCommand::Add {
            item: ItemId::new("rice"),
            quantity: 2.0,
            unit: "kg".into(),
            unit_price: 120.0,
        };
        assert_eq!(
            serde_json::to_value(&add).unwrap(),
            json!({"action": "add", "item": "rice", "quantity": 2.0, "unit": "kg", "unit_price": 120.0})
        );
        assert_eq!(
            serde_json::to_value(ParsedCommand::Reset).unwrap(),
            json!({"action": "reset"})
        );
        let back: ParsedCommand = serde_json::from_value(json!({"action": "remove", "item": "dal"})).unwrap();
        assert_eq!(back, ParsedCommand::Remove { item: ItemId::new("dal") });
    }

    #[test]
    fn only_calculate_is_read_only() {
        assert!(!ParsedCommand::Calculate.is_mutating());
        assert!(ParsedCommand::Save.is_mutating());
        assert!(ParsedCommand::Reset.is_mutating());
    }

    #[test]
    fn trace_flattens_outcome() {
        let trace = SegmentTrace {
            segment: "add xyz 2 50".into(),
            outcome: SegmentOutcome::Dropped { reason: DropReason::NoItem },
        };
        assert_eq!(
            serde_json::to_value(&trace).unwrap(),
            json!({"segment": "add xyz 2 50", "outcome": "dropped", "reason": "no_item"})
        );
    }
}
