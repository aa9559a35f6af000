//! Fixed-schema CSV export of the enriched runner table.
//!
//! The column order is a contract with downstream consumers: the six
//! required columns lead, and every detail column is present on every
//! row even when unpopulated. Minimal quote-escaping writer; no
//! parsing needed on this side.

use std::io::{self, Write};

use crate::types::RunnerRecord;

/// Export column order. `DLW` carries the detail-block value when one
/// was extracted, else the runner row's trailing token. `RecentRuns`
/// is serialized as a JSON array cell.
pub const COLUMNS: &[&str] = &[
    "Box",
    "DogName",
    "Trainer",
    "RaceNumber",
    "Track",
    "Distance",
    "RaceTime",
    "FormNumber",
    "SexAge",
    "Weight",
    "Draw",
    "CareerWins",
    "CareerPlaces",
    "CareerStarts",
    "PrizeMoney",
    "RTC",
    "DLR",
    "DLW",
    "Colour",
    "Sex",
    "Age",
    "Sire",
    "Dam",
    "RacedDistance",
    "WinningDistance",
    "Owner",
    "DogRecord",
    "WinPercent",
    "PlacePercent",
    "Trainer50",
    "Trainer350",
    "CarPM/s",
    "12mPM/s",
    "API",
    "RTC/km",
    "RDistTC",
    "DLS",
    "DOD",
    "G1",
    "G2",
    "G3",
    "LR",
    "FU",
    "2U",
    "3U",
    "DetectedDistance",
    "LastPrize",
    "LastMargin",
    "LastRaceTime",
    "LastSecTime",
    "LastTrack",
    "RecentRuns",
];

fn opt(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

/// Flatten one record into cells, in `COLUMNS` order.
pub fn record_row(r: &RunnerRecord) -> Vec<String> {
    let d = &r.details;
    vec![
        r.box_no.to_string(),
        r.dog_name.clone(),
        r.trainer.clone(),
        r.race_number.map(|n| n.to_string()).unwrap_or_default(),
        r.track.clone().unwrap_or_default(),
        r.distance.map(|n| n.to_string()).unwrap_or_default(),
        r.race_time.clone().unwrap_or_default(),
        r.form_number.clone(),
        r.sex_age.clone(),
        r.weight.to_string(),
        r.draw.to_string(),
        r.career_wins.to_string(),
        r.career_places.to_string(),
        r.career_starts.to_string(),
        r.prize_money.to_string(),
        r.rtc.clone(),
        r.dlr.clone(),
        d.dlw.clone().unwrap_or_else(|| r.dlw.clone()),
        opt(&d.colour),
        opt(&d.sex),
        opt(&d.age),
        opt(&d.sire),
        opt(&d.dam),
        opt(&d.raced_distance),
        opt(&d.winning_distance),
        opt(&d.owner),
        opt(&d.dog_record),
        opt(&d.win_percent),
        opt(&d.place_percent),
        opt(&d.trainer_50),
        opt(&d.trainer_350),
        opt(&d.car_pm),
        opt(&d.pm_12m),
        opt(&d.api),
        opt(&d.rtc_km),
        opt(&d.rdist_tc),
        opt(&d.dls),
        opt(&d.dod),
        opt(&d.grade_g1),
        opt(&d.grade_g2),
        opt(&d.grade_g3),
        opt(&d.grade_lr),
        opt(&d.grade_fu),
        opt(&d.grade_2u),
        opt(&d.grade_3u),
        d.detected_distance.map(|n| n.to_string()).unwrap_or_default(),
        opt(&d.last_prize),
        opt(&d.last_margin),
        opt(&d.last_race_time),
        opt(&d.last_sec_time),
        opt(&d.last_track),
        if d.recent_runs.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&d.recent_runs).unwrap_or_default()
        },
    ]
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/// Render the full table, header row included.
pub fn to_csv_string(records: &[RunnerRecord]) -> String {
    let mut out = Vec::new();
    let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    // Writing into a Vec<u8> cannot fail.
    let _ = write_row(&mut out, &header);
    for r in records {
        let _ = write_row(&mut out, &record_row(r));
    }
    String::from_utf8(out).unwrap_or_default()
}
