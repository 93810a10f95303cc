//! Clause segmentation on conjunction markers.

/// Conjunction markers that separate independent clauses.
pub const CONJUNCTIONS: &[&str] = &["and", "matrum", "mattrum", "marrum", "மற்றும்"];

/// Splits a normalized utterance into trimmed, non-empty clauses.
///
/// Markers only split when they stand alone as a whitespace-separated token,
/// so "sandal" or "andhra" are never broken apart. Runs of whitespace inside a
/// clause collapse to a single space.
pub fn segment(normalized: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for token in normalized.split_whitespace() {
        if CONJUNCTIONS.contains(&token) {
            flush(&mut current, &mut segments);
        } else {
            current.push(token);
        }
    }
    flush(&mut current, &mut segments);
    segments
}

fn flush(current: &mut Vec<&str>, segments: &mut Vec<String>) {
    if !current.is_empty() {
        segments.push(current.join(" "));
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_clause_yields_one_segment() {
        assert_eq!(segment("add rice 2kg 120rs"), vec!["add rice 2kg 120rs"]);
    }

    #[test]
    fn splits_on_and_preserving_order() {
        assert_eq!(
            segment("add rice 2kg 120rs and remove dal and save"),
            vec!["add rice 2kg 120rs", "remove dal", "save"]
        );
    }

    #[test]
    fn splits_on_tamil_markers() {
        assert_eq!(
            segment("arisi 2 kilo 60 rs matrum paal 1 ltr 30 rs"),
            vec!["arisi 2 kilo 60 rs", "paal 1 ltr 30 rs"]
        );
        assert_eq!(segment("அரிசி மற்றும் பால்"), vec!["அரிசி", "பால்"]);
    }

    #[test]
    fn markers_inside_words_do_not_split() {
        assert_eq!(segment("sandal soap and candy"), vec!["sandal soap", "candy"]);
    }

    #[test]
    fn empty_clauses_are_dropped() {
        assert_eq!(segment("and and rice and"), vec!["rice"]);
        assert!(segment("").is_empty());
        assert!(segment("   ").is_empty());
    }
}
