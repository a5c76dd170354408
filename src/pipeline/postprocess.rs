//! Post-processing: deterministic cleanup of the model's JSON text.
//!
//! `responseMimeType: application/json` makes Gemini return bare JSON almost
//! always, but not always: outputs wrapped in ```` ```json ```` fences, a
//! leading BOM or zero-width space, and stray whitespace all turn up in
//! practice and would otherwise fail as `ResponseFormat` errors. These rules
//! only strip wrapping. They never rewrite content inside the JSON.
//!
//! ## Rule Order
//!
//! Edges are trimmed before and after fence stripping so the fence regex sees
//! a clean `^` and a BOM inside the fence is dropped too. Zero-width joiners
//! inside string values are content (emoji sequences, Persian and Indic text)
//! and are left alone.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to the raw candidate text.
///
/// 1. Trim whitespace and invisible Unicode (BOM, zero-width) at the edges
/// 2. Strip an outer Markdown code fence (` ```json ` or bare ` ``` `)
/// 3. Trim the edges again
pub fn clean_json(input: &str) -> String {
    let s = strip_code_fences(trim_edges(input));
    trim_edges(&s).to_string()
}

// ── Rule 1: Trim edges ───────────────────────────────────────────────────────

fn is_edge_junk(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{FEFF}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}')
}

fn trim_edges(input: &str) -> &str {
    input.trim_matches(is_edge_junk)
}

// ── Rule 2: Strip outer code fences ──────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[ \t]*(?i:json)?[ \t]*\r?\n(.*?)\r?\n?```\s*$")
        .expect("fence regex is valid")
});

fn strip_code_fences(input: &str) -> String {
    match RE_OUTER_FENCES.captures(input) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}
