//! Column-name normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_]").unwrap());
static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Trims, lowercases, replaces every character outside `[a-z0-9_]` with `_`
/// and collapses runs of underscores.
///
/// ```
/// use report_frame::normalize::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  Unit Price ($) "), "unit_price_");
/// assert_eq!(normalize_column_name("Order__ID"), "order_id");
/// ```
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let replaced = INVALID_CHARS.replace_all(&lowered, "_");
    UNDERSCORE_RUNS.replace_all(&replaced, "_").into_owned()
}

/// Normalizes a full header row.
///
/// Blank headers at position `i` are named `Unnamed: i` first. Names that
/// collide after normalization get `_1`, `_2`, … appended to the later
/// occurrences so every result is unique and non-empty.
pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());

    for (idx, header) in raw.iter().enumerate() {
        let base = if header.trim().is_empty() {
            normalize_column_name(&format!("Unnamed: {idx}"))
        } else {
            normalize_column_name(header)
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}
