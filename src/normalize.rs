//! Canonical text form for everything downstream.
//!
//! PDF-extracted form text arrives with mixed line terminators, runs of
//! alignment spaces, curly punctuation and inconsistent unit casing.
//! Every regex in the parser assumes the canonical form produced here,
//! which keeps the patterns short and layout-robust.

use regex::Regex;
use std::sync::LazyLock;

// Runs of horizontal whitespace. Newlines are handled separately so
// that line structure survives normalization.
static RE_HSPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

// Indentation left over after a line break.
static RE_LINE_LEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]+").unwrap());

// Weight-unit token in any casing, after a digit or whitespace:
// "31.2Kg", "0.0 KG" → "kg".
static RE_KG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\d\s])(?i:kg)\b").unwrap());

// Three or more line breaks: at most one blank line survives.
static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Canonicalize raw document text. Pure; never fails.
///
/// Single line breaks are preserved — header scanning and block
/// boundary detection are both line-based, so collapsing must never
/// merge logically distinct lines.
pub fn normalize(raw: &str) -> String {
    let t = raw.replace("\r\n", "\n").replace('\r', "\n");
    let t = t
        .replace('\u{2013}', "-") // –
        .replace('\u{2014}', "-") // —
        .replace('\u{2212}', "-") // −
        .replace('\u{2019}', "'")
        .replace('\u{2018}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"");
    let t = RE_HSPACE.replace_all(&t, " ");
    let t = RE_LINE_LEAD.replace_all(&t, "\n");
    let t = RE_KG.replace_all(&t, "${1}kg");
    RE_BLANK_RUN.replace_all(&t, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_terminators_unified() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_horizontal_whitespace_collapsed() {
        assert_eq!(normalize("1.    Test Dog \t  1d"), "1. Test Dog 1d");
    }

    #[test]
    fn test_leading_indent_stripped() {
        assert_eq!(normalize("Owner: A\n   Trainer: B"), "Owner: A\nTrainer: B");
    }

    #[test]
    fn test_punctuation_variants() {
        assert_eq!(normalize("0 \u{2013} 2 \u{2014} 2"), "0 - 2 - 2");
        assert_eq!(normalize("O\u{2019}Reilly\u{2019}s"), "O'Reilly's");
    }

    #[test]
    fn test_kg_casing() {
        assert_eq!(normalize("31.2Kg"), "31.2kg");
        assert_eq!(normalize("0.0 KG"), "0.0 kg");
        assert_eq!(normalize("0.0kg"), "0.0kg");
        // Embedded letter pairs are untouched.
        assert_eq!(normalize("BACKGROUND"), "BACKGROUND");
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
        // A single break and a single blank line both survive.
        assert_eq!(normalize("a\nb"), "a\nb");
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_idempotent() {
        let raw = "Race No 1   05:57PM\r\n\r\n\r\n1.  Go Forward Tiger \u{2019}";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }
}
