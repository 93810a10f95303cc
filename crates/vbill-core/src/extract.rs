//! Field extraction for add clauses.
//!
//! Each step is a pure function over the working text: it returns what it
//! found plus the text with that span cut out. The parser composes them in
//! order: price, quantity/unit, price fallback, item.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::bill::DEFAULT_UNIT;
use crate::catalog::Catalog;
use crate::id::ItemId;

/// Unit words and the canonical unit each one normalizes to.
pub const UNIT_SYNONYMS: &[(&str, &str)] = &[
    ("kg", "kg"),
    ("kgs", "kg"),
    ("kilo", "kg"),
    ("kilos", "kg"),
    ("kilogram", "kg"),
    ("kilograms", "kg"),
    ("கிலோ", "kg"),
    ("g", "g"),
    ("gm", "g"),
    ("gms", "g"),
    ("gram", "g"),
    ("grams", "g"),
    ("கிராம்", "g"),
    ("l", "ltr"),
    ("ltr", "ltr"),
    ("ltrs", "ltr"),
    ("litre", "ltr"),
    ("litres", "ltr"),
    ("liter", "ltr"),
    ("liters", "ltr"),
    ("லிட்டர்", "ltr"),
    ("ml", "ml"),
    ("millilitre", "ml"),
    ("millilitres", "ml"),
    ("milliliter", "ml"),
    ("milliliters", "ml"),
    ("pc", "pcs"),
    ("pcs", "pcs"),
    ("piece", "pcs"),
    ("pieces", "pcs"),
    ("nos", "pcs"),
    ("pkt", "pkt"),
    ("pkts", "pkt"),
    ("packet", "pkt"),
    ("packets", "pkt"),
    ("பாக்கெட்", "pkt"),
    ("dozen", "dozen"),
    ("dozens", "dozen"),
    ("bundle", "bundle"),
    ("bundles", "bundle"),
    ("kattu", "bundle"),
    ("கட்டு", "bundle"),
];

/// Currency words that may follow a price.
const CURRENCY_SUFFIXES: &[&str] = &[
    "rupees", "rupee", "rupai", "roobai", "rs", "ரூபாய்", "ரூ",
];

const NUMBER: &str = r"[0-9]+(?:\.[0-9]+)?";

static UNIT_LOOKUP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| UNIT_SYNONYMS.iter().copied().collect());

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let suffixes = alternation(CURRENCY_SUFFIXES.iter().copied());
    Regex::new(&format!(
        r"(?:(?P<suffixed>{NUMBER})\s*(?:{suffixes})\b\.?)|(?:(?:₹|\brs\.?)\s*(?P<prefixed>{NUMBER}))|(?:\bat\s+(?P<at>{NUMBER}))"
    ))
    .unwrap()
});

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let units = alternation(UNIT_SYNONYMS.iter().map(|(word, _)| *word));
    Regex::new(&format!(r"(?P<amount>{NUMBER})(?:\s*(?P<unit>{units})\b)?")).unwrap()
});

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(NUMBER).unwrap());

/// Builds a regex alternation, longest word first.
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    words
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

/// Removes `start..end` from `text` and tidies the whitespace.
fn cut(text: &str, start: usize, end: usize) -> String {
    let joined = format!("{} {}", &text[..start], &text[end..]);
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_number(digits: &str) -> Option<f64> {
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Maps a unit word to its canonical abbreviation.
pub fn normalize_unit(word: &str) -> Option<&'static str> {
    UNIT_LOOKUP.get(word.to_lowercase().as_str()).copied()
}

/// A quantity with its canonical unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub amount: f64,
    pub unit: String,
}

/// Finds a price marked by a currency word ("120rs", "rs 120", "₹120",
/// "120 rupees") or by "at" ("at 120").
pub fn extract_price(text: &str) -> Option<(f64, String)> {
    let caps = PRICE_RE.captures(text)?;
    let whole = caps.get(0)?;
    let digits = caps
        .name("suffixed")
        .or_else(|| caps.name("prefixed"))
        .or_else(|| caps.name("at"))?;
    let price = parse_number(digits.as_str())?;
    Some((price, cut(text, whole.start(), whole.end())))
}

/// Finds the first number and an optional unit word right after it.
///
/// Only words from [`UNIT_SYNONYMS`] count as units; without one the unit is
/// [`DEFAULT_UNIT`].
pub fn extract_quantity(text: &str) -> Option<(Quantity, String)> {
    let caps = QUANTITY_RE.captures(text)?;
    let whole = caps.get(0)?;
    let amount = parse_number(caps.name("amount")?.as_str())?;
    let unit = caps
        .name("unit")
        .and_then(|u| normalize_unit(u.as_str()))
        .unwrap_or(DEFAULT_UNIT)
        .to_string();
    Some((Quantity { amount, unit }, cut(text, whole.start(), whole.end())))
}

/// Takes the last remaining number as the price.
pub fn fallback_price(text: &str) -> Option<(f64, String)> {
    let found = NUMBER_RE.find_iter(text).last()?;
    let price = parse_number(found.as_str())?;
    Some((price, cut(text, found.start(), found.end())))
}

/// Resolves the last catalog item named in `text`.
pub fn resolve_item(text: &str, catalog: &Catalog) -> Option<ItemId> {
    let words = words(text);
    catalog.resolve_last(&words).map(|(id, _)| id)
}

/// Splits on whitespace and strips ASCII punctuation from each word.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Everything the add pipeline could find in one clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddFields {
    pub price: Option<f64>,
    pub quantity: Option<Quantity>,
    pub item: Option<ItemId>,
}

/// Runs the full add pipeline. Every step runs even when an earlier one came
/// up empty; the caller decides whether the clause is usable.
pub fn extract_add_fields(segment: &str, catalog: &Catalog) -> AddFields {
    let mut working = segment.to_string();

    let mut price = extract_price(&working).map(|(price, rest)| {
        working = rest;
        price
    });

    let quantity = extract_quantity(&working).map(|(quantity, rest)| {
        working = rest;
        quantity
    });

    if price.is_none() {
        price = fallback_price(&working).map(|(price, rest)| {
            working = rest;
            price
        });
    }

    let item = resolve_item(&working, catalog);

    AddFields {
        price,
        quantity,
        item,
    }
}
