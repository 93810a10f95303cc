//! Utterance-to-command parsing.
//!
//! [`CommandParser::parse`] runs normalize → segment → classify for each
//! segment, and concatenates what the segments emit. Segments that yield
//! nothing are dropped without error; only an utterance where *every*
//! segment drops returns `None`.
//!
//! Classification priority per segment: reset, save, total (substring
//! keywords), remove (leading keyword), then add as the default.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::command::{DropReason, ParsedCommand, SegmentOutcome, SegmentTrace};
use crate::extract::{extract_add_fields, words};
use crate::normalize::normalize;
use crate::segment::segment;

/// Substrings that clear the open bill.
pub const RESET_KEYWORDS: &[&str] = &["reset", "clear", "அழிக்க", "puthu bill"];

/// Substrings that save the open bill.
pub const SAVE_KEYWORDS: &[&str] = &["save", "சேமிக்க", "சேவ்"];

/// Substrings that ask for the running total.
pub const TOTAL_KEYWORDS: &[&str] = &["total", "kanak", "மொத்தம்", "motham", "mottham"];

/// Leading words that start a remove clause.
pub const REMOVE_KEYWORDS: &[&str] = &[
    "remove", "delete", "cancel", "neekku", "நீக்கு", "நீக்கவும்",
];

/// Turns free-form utterances into [`ParsedCommand`]s against a catalog.
#[derive(Debug, Clone)]
pub struct CommandParser {
    catalog: Arc<Catalog>,
}

impl CommandParser {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        CommandParser { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Parses an utterance into commands, in clause order.
    ///
    /// Returns `None` when no clause produced a command; otherwise the vector
    /// is never empty. Never panics.
    pub fn parse(&self, utterance: &str) -> Option<Vec<ParsedCommand>> {
        let commands: Vec<ParsedCommand> = self
            .explain(utterance)
            .into_iter()
            .filter_map(|trace| match trace.outcome {
                SegmentOutcome::Parsed { command } => Some(command),
                SegmentOutcome::Dropped { .. } => None,
            })
            .collect();

        if commands.is_empty() {
            None
        } else {
            Some(commands)
        }
    }

    /// Parses an utterance and reports the outcome of every clause, including
    /// why dropped clauses were dropped.
    pub fn explain(&self, utterance: &str) -> Vec<SegmentTrace> {
        segment(&normalize(utterance))
            .into_iter()
            .map(|segment| {
                let outcome = match self.classify(&segment) {
                    Ok(command) => SegmentOutcome::Parsed { command },
                    Err(reason) => {
                        tracing::debug!(segment = %segment, %reason, "dropped segment");
                        SegmentOutcome::Dropped { reason }
                    }
                };
                SegmentTrace { segment, outcome }
            })
            .collect()
    }

    /// Classifies one normalized segment.
    pub fn classify(&self, segment: &str) -> Result<ParsedCommand, DropReason> {
        if contains_any(segment, RESET_KEYWORDS) {
            return Ok(ParsedCommand::Reset);
        }
        if contains_any(segment, SAVE_KEYWORDS) {
            return Ok(ParsedCommand::Save);
        }
        if contains_any(segment, TOTAL_KEYWORDS) {
            return Ok(ParsedCommand::Calculate);
        }
        if let Some(rest) = strip_remove_keyword(segment) {
            return self.classify_remove(rest);
        }
        self.classify_add(segment)
    }

    fn classify_remove(&self, rest: &str) -> Result<ParsedCommand, DropReason> {
        self.catalog
            .resolve_last(&words(rest))
            .map(|(item, _)| ParsedCommand::Remove { item })
            .ok_or(DropReason::UnknownRemoveTarget)
    }

    fn classify_add(&self, segment: &str) -> Result<ParsedCommand, DropReason> {
        let fields = extract_add_fields(segment, &self.catalog);

        let item = fields.item.ok_or(DropReason::NoItem)?;
        let quantity = fields.quantity.ok_or(DropReason::NoQuantity)?;
        let unit_price = fields.price.ok_or(DropReason::NoPrice)?;
        if quantity.amount <= 0.0 {
            return Err(DropReason::ZeroQuantity);
        }

        Ok(ParsedCommand::Add {
            item,
            quantity: quantity.amount,
            unit: quantity.unit,
            unit_price,
        })
    }
}

fn contains_any(segment: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| segment.contains(keyword))
}

/// Returns the text after a leading remove keyword, if there is one.
fn strip_remove_keyword(segment: &str) -> Option<&str> {
    let first = segment.split_whitespace().next()?;
    if REMOVE_KEYWORDS.contains(&first) {
        Some(segment.trim_start()[first.len()..].trim())
    } else {
        None
    }
}
