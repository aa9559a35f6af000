//! Header and runner-row extraction.
//!
//! Scans normalized text line by line, holding the most recent race
//! header as "current race" state and stamping a copy of it onto every
//! runner row matched below it. Lines matching neither pattern are
//! ignored; a missed header is repaired afterwards from box-number
//! resets.

use regex::Regex;
use std::sync::LazyLock;

use crate::tracks::canonical_track;
use crate::types::{DetailFields, RaceContext, RunnerRecord};

// ── Regex patterns ─────────────────────────────────────────────────
//
// Real data examples:
//   Headers:
//     Race No 1 Oct 25 05:57PM RICHMOND 320m
//     Race No 10 QSTRD Oct 26 08:12PM ALBPK 520m
//
//   Runner rows:
//     1. Go Forward Tiger 1d 0.0kg 1 Adam Campton 0 - 2 - 2 $630 3 7 Mdn
//     2. Luna Rupee 1b 0.0kg 2 Guiseppe Denardo 0 - 0 - 0 $0 FU 0 Mdn
//     3. 633Hooked On Gin 2d 0.0kg 3 Troy Vella 0 - 0 - 5 $75 6 16 Mdn

// Header: race-number marker, time of day, track token, distance in
// meters, in that order, tolerant of intervening text (meeting codes,
// dates) between the number and the time.
static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^Race No\s*(?P<num>\d{1,2}).*?(?P<time>\d{2}:\d{2}[AP]M)\s+(?P<track>[A-Za-z0-9 ]+?)\s+(?P<dist>\d{3})m",
    )
    .unwrap()
});

// Runner row: box, optional glued form digits, name, sex/age code,
// weight, draw, trainer, win-place-start triple, prize, then the three
// trailing short tokens (RTC, DLR, DLW).
static RE_RUNNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<box>\d+)\.?\s*(?P<form>[0-9]{3,6})?(?P<name>[A-Za-z' -]+)\s+(?P<sexage>\d+[a-z])\s+(?P<weight>[\d.]+)kg\s+(?P<draw>\d+)\s+(?P<trainer>[A-Za-z' -]+)\s+(?P<wins>\d+)\s*-\s*(?P<places>\d+)\s*-\s*(?P<starts>\d+)\s+\$(?P<prize>[\d,]+)\s+(?P<rtc>\S+)\s+(?P<dlr>\S+)\s+(?P<dlw>\S+)",
    )
    .unwrap()
});

fn num(caps: &regex::Captures, name: &str) -> u32 {
    caps[name].parse().unwrap_or(0)
}

/// Scan normalized text for race headers and runner rows, producing
/// one pre-enrichment record per matched row.
pub fn scan_rows(text: &str) -> Vec<RunnerRecord> {
    let mut runners = Vec::new();
    let mut current: Option<RaceContext> = None;
    let mut race_counter = 0u32;
    let mut rows_since_header = 0usize;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = RE_HEADER.captures(line) {
            race_counter += 1;
            rows_since_header = 0;
            current = Some(RaceContext {
                number: race_counter,
                time: caps["time"].to_string(),
                track: canonical_track(&caps["track"]),
                distance: num(&caps, "dist"),
            });
            continue;
        }

        if let Some(caps) = RE_RUNNER.captures(line) {
            // Box resetting to 1 without an intervening header means a
            // new race whose header line didn't match; the held
            // context is stale and its rows stay unnumbered for
            // repair_numbering to fill in.
            if num(&caps, "box") == 1 && rows_since_header > 0 {
                current = None;
            }
            rows_since_header += 1;
            runners.push(runner_from_caps(&caps, current.as_ref()));
        }
    }

    runners
}

fn runner_from_caps(caps: &regex::Captures, race: Option<&RaceContext>) -> RunnerRecord {
    let form_number = caps
        .name("form")
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let mut name = caps["name"].trim().to_string();
    // A form number occasionally glues its last digits onto the front
    // of the name during PDF text extraction; strip the echo.
    if !form_number.is_empty() {
        let tail = &form_number[form_number.len().saturating_sub(2)..];
        if !tail.is_empty() && name.starts_with(tail) {
            name = name[tail.len()..].trim().to_string();
        }
    }

    RunnerRecord {
        box_no: num(caps, "box"),
        dog_name: name.to_uppercase(),
        form_number,
        trainer: caps["trainer"].trim().to_string(),
        sex_age: caps["sexage"].to_string(),
        weight: caps["weight"].parse().unwrap_or(0.0),
        draw: num(caps, "draw"),
        career_wins: num(caps, "wins"),
        career_places: num(caps, "places"),
        career_starts: num(caps, "starts"),
        prize_money: caps["prize"].replace(',', "").parse().unwrap_or(0.0),
        rtc: caps["rtc"].to_string(),
        dlr: caps["dlr"].to_string(),
        dlw: caps["dlw"].to_string(),
        race_number: race.map(|r| r.number),
        race_time: race.map(|r| r.time.clone()),
        track: race.map(|r| r.track.clone()),
        distance: race.map(|r| r.distance),
        details: DetailFields::default(),
    }
}

// ── Numbering repair ───────────────────────────────────────────────

/// Fill in race numbers the header scan missed. When any row lacks a
/// number, the whole ordered sequence is renumbered from box resets:
/// every recurrence of box 1 after the first row starts the next race.
/// Heuristic — wrong if a row is itself missing or boxes are
/// non-sequential, but always syntactically valid. Track is defaulted
/// to the "UNKNOWN" sentinel; a missing distance stays null.
pub fn repair_numbering(runners: &mut [RunnerRecord]) {
    if runners.iter().any(|r| r.race_number.is_none()) {
        let mut current = 1u32;
        for (i, r) in runners.iter_mut().enumerate() {
            if r.box_no == 1 && i != 0 {
                current += 1;
            }
            r.race_number = Some(current);
        }
    }

    for r in runners.iter_mut() {
        if r.track.is_none() {
            r.track = Some("UNKNOWN".to_string());
        }
    }
}
