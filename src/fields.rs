//! Field and token extraction from one dog block.
//!
//! Three independent layers, each best-effort:
//!   * a fixed battery of field rules, applied one by one — a rule's
//!     non-match touches only its own output field(s);
//!   * a token scanner walking whitespace-separated words for
//!     contextual cues the fixed rules can't anchor on;
//!   * a recent-run extractor splitting the block at "<ordinal> of <N>"
//!     boundaries and matching a run pattern per candidate.
//!
//! Nothing here fails: an unmatched pattern leaves its field absent.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::tracks::{RESULT_TRACKS, is_known_distance, title_case};
use crate::types::{DetailFields, RecentRun};

// ── Fixed field patterns ───────────────────────────────────────────
//
// Real data examples:
//   1. 0kg (1) bdl 1 D ADAM CAMPTON Horse: 0-2-2 0%-100%
//   FERAL FRANKY (AUS) - GO FORWARD BARBS (AUS)
//   Owner: Adam Campton
//   Raced Distance: 320-515 Winning Distance: 320
//   J/T: A Campton 3-1-0 33%-66%
//   G2 1-0-2 API 2.5 DLS 7 DLW 16

static RE_COLOUR_SEX_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)0\s*kg\s*\(?\d+\)?\s*([a-z/]+)\s+(\d+)\s+([DB])").unwrap()
});

// Breeding line: sire and dam, dash-separated. Case-sensitive — the
// names are printed in caps and a looser match drifts into stat lines.
static RE_SIRE_DAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][A-Za-z0-9' ()]+)\s*-\s*([A-Z][A-Za-z0-9' ()]+)").unwrap()
});

static RE_RACED_DISTANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Raced\s*Distance:\s*([\d-]+)").unwrap());

static RE_WINNING_DISTANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Winning\s*Distance:\s*([A-Za-z0-9]+)").unwrap());

static RE_OWNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Owner:\s*([^\n]+)").unwrap());

static RE_DOG_RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Dog|Horse):\s*(\d+-\d+-\d+)\s+(\d+%)\s*-\s*(\d+%)").unwrap()
});

static RE_TRAINER_STATS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)J/T:\s.*?(\d+-\d+-\d+)\s+(\d+%-\d+%)").unwrap());

static RE_API: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAPI\b\s+([\d.]+)").unwrap());

static RE_CAR_PM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCarPM/s\b\s+([\d.,]+)").unwrap());

static RE_PM_12M: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b12mPM/s\b\s+([\d.,/]+)").unwrap());

static RE_RTC_KM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bRTC/km\b\s+([\d./]+)").unwrap());

static RE_RDIST_TC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bRDistTC\b\s+(\d+)").unwrap());

static RE_DLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDLS(?:the)?\b\s+(\d+)").unwrap());

static RE_DLW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDLW\b\s+(\d+)").unwrap());

static RE_DOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDOD\b\s+(\d+)").unwrap());

static RE_G1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bG1\b\s+(\d+-\d+-\d+)").unwrap());
static RE_G2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bG2\b\s+(\d+-\d+-\d+)").unwrap());
static RE_G3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bG3\b\s+(\d+-\d+-\d+)").unwrap());
static RE_LR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLR\b\s+(\d+-\d+-\d+)").unwrap());
static RE_FU: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFU\b\s+(\d+-\d+-\d+)").unwrap());
static RE_2U: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b2U\b\s+(\d+-\d+-\d+)").unwrap());
static RE_3U: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b3U\b\s+(\d+-\d+-\d+)").unwrap());

// ── Rule table ─────────────────────────────────────────────────────

/// One extraction rule: a pattern and the write-back for its captures.
/// Rules are applied independently, so a malformed or absent field can
/// never suppress extraction of the others.
struct FieldRule {
    #[allow(dead_code)]
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    apply: fn(&Captures, &mut DetailFields),
}

static FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        name: "colour_sex_age",
        pattern: &RE_COLOUR_SEX_AGE,
        apply: |caps, out| {
            out.colour = Some(caps[1].to_lowercase());
            out.age = Some(caps[2].to_string());
            let sex = if caps[3].eq_ignore_ascii_case("D") {
                "Dog"
            } else {
                "Bitch"
            };
            out.sex = Some(sex.to_string());
        },
    },
    FieldRule {
        name: "sire_dam",
        pattern: &RE_SIRE_DAM,
        apply: |caps, out| {
            out.sire = Some(caps[1].trim().to_string());
            out.dam = Some(caps[2].trim().to_string());
        },
    },
    FieldRule {
        name: "raced_distance",
        pattern: &RE_RACED_DISTANCE,
        apply: |caps, out| out.raced_distance = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "winning_distance",
        pattern: &RE_WINNING_DISTANCE,
        apply: |caps, out| out.winning_distance = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "owner",
        pattern: &RE_OWNER,
        apply: |caps, out| {
            // The owner label shares its line with the next label on
            // some layouts; cut there.
            let mut owner = caps[1].trim();
            for stop in [" Dog:", " Trainer:"] {
                if let Some(i) = owner.find(stop) {
                    owner = owner[..i].trim();
                }
            }
            if !owner.is_empty() {
                out.owner = Some(owner.to_string());
            }
        },
    },
    FieldRule {
        name: "dog_record",
        pattern: &RE_DOG_RECORD,
        apply: |caps, out| {
            out.dog_record = Some(caps[1].to_string());
            out.win_percent = Some(caps[2].to_string());
            out.place_percent = Some(caps[3].to_string());
        },
    },
    FieldRule {
        name: "trainer_stats",
        pattern: &RE_TRAINER_STATS,
        apply: |caps, out| {
            out.trainer_50 = Some(caps[1].to_string());
            out.trainer_350 = Some(caps[2].to_string());
        },
    },
    FieldRule {
        name: "api",
        pattern: &RE_API,
        apply: |caps, out| out.api = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "car_pm",
        pattern: &RE_CAR_PM,
        apply: |caps, out| out.car_pm = Some(caps[1].replace(',', "")),
    },
    FieldRule {
        name: "pm_12m",
        pattern: &RE_PM_12M,
        apply: |caps, out| out.pm_12m = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "rtc_km",
        pattern: &RE_RTC_KM,
        apply: |caps, out| out.rtc_km = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "rdist_tc",
        pattern: &RE_RDIST_TC,
        apply: |caps, out| out.rdist_tc = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "dls",
        pattern: &RE_DLS,
        apply: |caps, out| out.dls = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "dlw",
        pattern: &RE_DLW,
        apply: |caps, out| out.dlw = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "dod",
        pattern: &RE_DOD,
        apply: |caps, out| out.dod = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "grade_g1",
        pattern: &RE_G1,
        apply: |caps, out| out.grade_g1 = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "grade_g2",
        pattern: &RE_G2,
        apply: |caps, out| out.grade_g2 = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "grade_g3",
        pattern: &RE_G3,
        apply: |caps, out| out.grade_g3 = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "grade_lr",
        pattern: &RE_LR,
        apply: |caps, out| out.grade_lr = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "grade_fu",
        pattern: &RE_FU,
        apply: |caps, out| out.grade_fu = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "grade_2u",
        pattern: &RE_2U,
        apply: |caps, out| out.grade_2u = Some(caps[1].to_string()),
    },
    FieldRule {
        name: "grade_3u",
        pattern: &RE_3U,
        apply: |caps, out| out.grade_3u = Some(caps[1].to_string()),
    },
];

/// Apply the full battery to one block. Every field independently
/// optional; never fails.
pub fn extract_fields(block: &str) -> DetailFields {
    let mut out = DetailFields::default();

    for rule in FIELD_RULES {
        if let Some(caps) = rule.pattern.captures(block) {
            (rule.apply)(&caps, &mut out);
        }
    }

    scan_tokens(block, &mut out);
    out.recent_runs = extract_recent_runs(block);
    out
}

// ── Token scanner ──────────────────────────────────────────────────

static RE_DIST_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{3})m$").unwrap());
static RE_CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?\d[\d,]*(?:\.\d+)?$").unwrap());
static RE_DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d.]+$").unwrap());
static RE_RACE_TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+:\d{2}\.\d{2}$").unwrap());
static RE_SEC_TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}\.\d{2}$").unwrap());

/// Word-by-word fallback net: recovers values that appear as
/// "<cue> <value>" token pairs or as bare known tokens, which the
/// fixed rules can't anchor on. Later occurrences win, so these read
/// as "the last mentioned" prize/margin/track of the block.
fn scan_tokens(block: &str, out: &mut DetailFields) {
    let words: Vec<&str> = block.split_whitespace().collect();

    for (i, w) in words.iter().enumerate() {
        // Bare distance token, e.g. "401m" — only accepted when the
        // value is an attested race distance.
        if let Some(caps) = RE_DIST_TOKEN.captures(w) {
            let d: u32 = caps[1].parse().unwrap_or(0);
            if is_known_distance(d) {
                out.detected_distance = Some(d);
            }
        }

        if w.eq_ignore_ascii_case("prize")
            && let Some(next) = words.get(i + 1)
            && RE_CURRENCY.is_match(next)
        {
            out.last_prize = Some(next.trim_start_matches('$').replace(',', ""));
        }

        if w.eq_ignore_ascii_case("margin")
            && let Some(next) = words.get(i + 1)
            && RE_DECIMAL.is_match(next)
        {
            out.last_margin = Some(next.to_string());
        }

        if w.eq_ignore_ascii_case("time") && i > 0 {
            if words[i - 1].eq_ignore_ascii_case("race")
                && let Some(next) = words.get(i + 1)
                && RE_RACE_TIME.is_match(next)
            {
                out.last_race_time = Some(next.to_string());
            }
            if words[i - 1].eq_ignore_ascii_case("sec")
                && let Some(next) = words.get(i + 1)
                && RE_SEC_TIME.is_match(next)
            {
                out.last_sec_time = Some(next.to_string());
            }
        }

        let upper = w.to_uppercase();
        if RESULT_TRACKS.contains(&upper.as_str()) {
            out.last_track = Some(title_case(w));
        }
    }
}

// ── Recent runs ────────────────────────────────────────────────────
//
// Result history lines start with "<ordinal> of <field>":
//
//   2nd of 8 12/10/2025 RICHMOND Margin 1.5 Lengths Distance 320m
//   Prize $1,790 Race Time 0:18.52 Sec Time 5.40 BP 4 Odds 3.2F
//   Winner Fast Dog (3) Second Slow Dog (5)

static RE_RUN_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d{1,2}(?:st|nd|rd|th)\s+of\s+\d+").unwrap());

// Every field after the leading position/field/date/track is its own
// optional group. The free-text groups (race name, trainer) keep a
// required trailing space as their only delimiter; the fixed-shape
// groups end in \s* so a field that closes its line still captures.
static RE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?P<pos>\d+(?:st|nd|rd|th))\s+of\s+(?P<field>\d+)\s+",
        r"(?P<date>\d{1,2}/\d{2}/\d{4})\s+",
        r"(?P<track>[A-Z][A-Za-z]+)\s*",
        r"(?:Margin\s+(?P<margin>[\d.]+)\s+Lengths\s*)?",
        r"(?:Distance\s+(?P<distance>\d{3})m\s*)?",
        r"(?:SOT\s+(?P<sot>[A-Z])\s*)?",
        r"(?:RST\s+(?P<rst>[A-Z/]+)\s*)?",
        r"(?:GR\s+(?P<grade>[\w/]+)\s*)?",
        r"(?:Race\s+(?P<race_name>.+?)\s+)?",
        r"(?:Prize\s+\$(?P<prize>[\d,]+)\s*)?",
        r"(?:API\s+(?P<api>[\d.]+)\s*)?",
        r"(?:Race\s+Time\s+(?P<racetime>\d+:\d{2}\.\d{2})\s*)?",
        r"(?:Sec\s+Time\s+(?P<sectime>\d{1,2}\.\d{2})\s*)?",
        r"(?:BP\s+(?P<bp>\d+)\s*)?",
        r"(?:Odds\s+(?P<odds>[\d.]+F?)\s*)?",
        r"(?:Trainer\s+(?P<trainer>[A-Za-z' -]+?)\s+)?",
        r"(?:Ongoing\s+Winners\s+(?P<og>[0-9-]+)\s*)?",
        r"(?:Track\s+Direction\s+(?P<dir>[A-Za-z-]+)\s*)?",
        r"(?:Winner\s+(?P<winner>[A-Za-z' ]+?)\s+\((?P<wbox>\d)\)\s*)?",
        r"(?:Second\s+(?P<second>[A-Za-z' ]+?)\s+\((?P<sbox>\d)\)\s*)?",
        r"(?:Third\s+(?P<third>[A-Za-z' ]+?)\s+\((?P<tbox>\d)\)\s*)?",
    ))
    .unwrap()
});

/// Split the block at run-line starts and parse each candidate.
/// Candidates that don't match the run pattern are silently dropped —
/// run history is inherently best-effort.
pub fn extract_recent_runs(block: &str) -> Vec<RecentRun> {
    let starts: Vec<usize> = RE_RUN_START.find_iter(block).map(|m| m.start()).collect();

    let mut runs = Vec::new();
    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(block.len());
        let cand = block[start..end].trim();
        if cand.is_empty() {
            continue;
        }
        if let Some(run) = parse_run(cand) {
            runs.push(run);
        }
    }
    runs
}

fn parse_run(cand: &str) -> Option<RecentRun> {
    let caps = RE_RUN.captures(cand)?;
    let get = |name: &str| caps.name(name).map(|m| m.as_str().trim().to_string());

    Some(RecentRun {
        position: caps["pos"].to_string(),
        field_size: caps["field"].parse().unwrap_or(0),
        date: caps["date"].to_string(),
        track: caps["track"].to_string(),
        margin: get("margin"),
        distance: get("distance"),
        sot: get("sot"),
        rst: get("rst"),
        grade: get("grade"),
        race_name: get("race_name"),
        prize: get("prize").map(|p| p.replace(',', "")),
        api: get("api"),
        race_time: get("racetime"),
        sec_time: get("sectime"),
        box_no: get("bp"),
        odds: get("odds"),
        trainer: get("trainer"),
        ongoing_winners: get("og"),
        track_direction: get("dir"),
        winner: get("winner"),
        winner_box: get("wbox"),
        second: get("second"),
        second_box: get("sbox"),
        third: get("third"),
        third_box: get("tbox"),
    })
}
