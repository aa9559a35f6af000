//! Dog-block location.
//!
//! Given a runner's name, recover the span of text holding that
//! runner's detail profile. Source layouts vary too much for a single
//! anchor to be reliable, so resolution is tiered — an exact anchored
//! pattern, an optional fuzzy-name retry, and a bounded sliding-window
//! scan — with the first success winning. Not finding a block is a
//! per-runner miss, never an error.

use regex::Regex;
use std::sync::LazyLock;

// ── Block boundary ─────────────────────────────────────────────────
//
// Detail sections look like:
//
//   GO FORWARD TIGER
//   j50s j350s t50s t350s
//   1. 0kg (1) bdl 1 D ADAM CAMPTON Horse: 0-2-2 0%-100%
//   ...
//
// so "upper-case name line immediately followed by the stats column
// header" is the signature that one block ends and the next begins.

/// Column-header line printed under each runner's name in the detail
/// section.
pub const COLUMN_HEADER: &str = "j50s j350s t50s t350s";

static RE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[A-Z][A-Z0-9' -]+\n{}",
        regex::escape(COLUMN_HEADER)
    ))
    .unwrap()
});

// Name-like substrings considered as fuzzy candidates.
#[cfg(feature = "fuzzy")]
static RE_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][A-Z0-9' -]{2,}").unwrap());

/// Cap on the tier-3 window so a malformed document without any block
/// boundary cannot trigger an unbounded scan.
const MAX_WINDOW: usize = 4000;

/// Minimum partial-ratio similarity (0-100) for a fuzzy candidate to
/// be worth retrying.
#[cfg(feature = "fuzzy")]
const FUZZY_THRESHOLD: f64 = 80.0;

/// Locate the detail block for `name` in normalized document text.
///
/// `Ok(None)` means every tier came up empty — a miss. `Err` only
/// surfaces a dynamically-compiled anchor pattern failing to build,
/// which the enrichment loop counts separately from misses.
pub fn find_block(text: &str, name: &str) -> Result<Option<String>, regex::Error> {
    // Tier 1: the name as a standalone line.
    if let Some(block) = anchored_block(text, name)? {
        return Ok(Some(block));
    }

    // Tier 2: retry tier 1 against the closest name-like substring.
    #[cfg(feature = "fuzzy")]
    if let Some(candidate) = fuzzy_candidate(text, name) {
        if let Some(block) = anchored_block(text, &candidate)? {
            return Ok(Some(block));
        }
    }

    // Tier 3: bounded sliding window from the first raw occurrence.
    Ok(window_block(text, name))
}

/// Tier 1: anchor on the name as its own line; the block runs to the
/// next boundary signature or end of document.
fn anchored_block(text: &str, name: &str) -> Result<Option<String>, regex::Error> {
    let anchor = Regex::new(&format!(r"(?m)^{} *$", regex::escape(name)))?;
    if let Some(m) = anchor.find(text) {
        let rest = &text[m.end()..];
        let end = RE_BOUNDARY
            .find(rest)
            .map(|b| b.start())
            .unwrap_or(rest.len());
        return Ok(Some(rest[..end].to_string()));
    }
    Ok(None)
}

/// Tier 2: best name-like substring by partial-ratio similarity,
/// if it clears the threshold.
#[cfg(feature = "fuzzy")]
fn fuzzy_candidate(text: &str, name: &str) -> Option<String> {
    use std::collections::HashSet;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut best: Option<(f64, &str)> = None;
    for m in RE_CANDIDATE.find_iter(text) {
        let cand = m.as_str().trim();
        if !seen.insert(cand) {
            continue;
        }
        let score = partial_ratio(name, cand);
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, cand));
        }
    }
    best.filter(|(score, _)| *score > FUZZY_THRESHOLD)
        .map(|(_, cand)| cand.to_string())
}

/// Partial-ratio similarity on a 0-100 scale: the shorter string slid
/// over every same-length window of the longer, scored by normalized
/// edit distance, best window wins.
#[cfg(feature = "fuzzy")]
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    if short_len == 0 {
        return 0.0;
    }
    let long_chars: Vec<char> = long.chars().collect();

    let mut best = 0.0f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let score = strsim::normalized_levenshtein(short, &window) * 100.0;
        if score > best {
            best = score;
        }
    }
    best
}

/// Tier 3: first raw occurrence of the name, rewound to its line
/// start; the span ends at the next boundary signature after the
/// name, else is capped at `MAX_WINDOW`.
fn window_block(text: &str, name: &str) -> Option<String> {
    let at = text.find(name)?;
    let line_start = text[..at].rfind('\n').map_or(0, |i| i + 1);
    let rest = &text[line_start..];
    let after_name = at - line_start + name.len();

    let end = match RE_BOUNDARY.find_at(rest, after_name) {
        Some(m) => m.start(),
        None => {
            let mut cap = rest.len().min(MAX_WINDOW);
            while !rest.is_char_boundary(cap) {
                cap -= 1;
            }
            cap
        }
    };
    Some(rest[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
1. Go Forward Tiger 1d 0.0kg 1 Adam Campton 0 - 2 - 2 $630 3 7 Mdn

GO FORWARD TIGER
j50s j350s t50s t350s
1. 0kg (1) bdl 1 D ADAM CAMPTON Horse: 0-2-2 0%-100%
Owner: Adam Campton

LUNA RUPEE
j50s j350s t50s t350s
2. 0kg (2) bl 1 B GUISEPPE DENARDO Horse: First Ride
Owner: Valerie Denardo
";

    #[test]
    fn test_exact_block_bounded_by_next_section() {
        let block = find_block(DOC, "GO FORWARD TIGER").unwrap().unwrap();
        assert!(block.contains("Owner: Adam Campton"));
        assert!(!block.contains("LUNA RUPEE"));
        assert!(!block.contains("Valerie Denardo"));
    }

    #[test]
    fn test_last_block_runs_to_end_of_document() {
        let block = find_block(DOC, "LUNA RUPEE").unwrap().unwrap();
        assert!(block.contains("Owner: Valerie Denardo"));
    }

    #[test]
    fn test_absent_name_is_a_miss() {
        assert_eq!(find_block(DOC, "NO SUCH DOG").unwrap(), None);
    }

    #[cfg(feature = "fuzzy")]
    #[test]
    fn test_fuzzy_retry_on_misspelled_name() {
        // One extra letter: the exact anchor misses, the fuzzy tier
        // recovers the real section header.
        let block = find_block(DOC, "GO FORWARD TIGGER").unwrap().unwrap();
        assert!(block.contains("Owner: Adam Campton"));
        assert!(!block.contains("Valerie Denardo"));
    }

    #[cfg(feature = "fuzzy")]
    #[test]
    fn test_partial_ratio_scale() {
        assert_eq!(partial_ratio("TIGER", "TIGER"), 100.0);
        assert!(partial_ratio("GO FORWARD TIGGER", "GO FORWARD TIGER") > 80.0);
        assert!(partial_ratio("LUNA RUPEE", "HOOKED ON GIN") < 50.0);
    }

    #[test]
    fn test_window_fallback_when_name_never_standalone() {
        let doc = "\
notes: HOOKED ON GIN scratched late
Owner: Anthony Saab

LUNA RUPEE
j50s j350s t50s t350s
Owner: Valerie Denardo
";
        let block = find_block(doc, "HOOKED ON GIN").unwrap().unwrap();
        assert!(block.starts_with("notes: HOOKED ON GIN"));
        assert!(block.contains("Anthony Saab"));
        assert!(!block.contains("LUNA RUPEE"));
    }

    #[test]
    fn test_window_capped_without_boundary() {
        let mut doc = String::from("data HOOKED ON GIN stats follow\n");
        for _ in 0..500 {
            doc.push_str("filler line with no section boundary\n");
        }
        let block = find_block(&doc, "HOOKED ON GIN").unwrap().unwrap();
        assert!(block.len() <= MAX_WINDOW);
        assert!(block.starts_with("data HOOKED ON GIN"));
    }
}
