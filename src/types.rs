use serde::Serialize;

// ── Race-scoped context ────────────────────────────────────────────

/// Race metadata parsed from a header line. Held as "current race"
/// state during the line scan and copied by value onto every runner
/// row until the next header replaces it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RaceContext {
    pub number: u32,
    pub time: String,
    pub track: String,
    pub distance: u32,
}

// ── One runner row ─────────────────────────────────────────────────

/// A single competing dog in one race. Created from a matched runner
/// row, then enriched in place with its detail-block fields. The race
/// columns are `Option` because a header line can be missed entirely;
/// numbering repair fills RaceNumber afterwards.
///
/// Serialization always emits every column, populated or not — the
/// exporter depends on a fixed schema.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RunnerRecord {
    #[serde(rename = "Box")]
    pub box_no: u32,
    /// Upper-cased for identity matching against detail-block headers.
    pub dog_name: String,
    pub form_number: String,
    pub trainer: String,
    pub sex_age: String,
    pub weight: f64,
    pub draw: u32,
    pub career_wins: u32,
    pub career_places: u32,
    pub career_starts: u32,
    pub prize_money: f64,
    #[serde(rename = "RTC")]
    pub rtc: String,
    #[serde(rename = "DLR")]
    pub dlr: String,
    #[serde(rename = "DLW")]
    pub dlw: String,
    pub race_number: Option<u32>,
    pub race_time: Option<String>,
    pub track: Option<String>,
    pub distance: Option<u32>,
    pub details: DetailFields,
}

// ── Detail-block fields ────────────────────────────────────────────

/// Everything the detail-block extractor can recover for one runner.
/// Every field defaults to absent; absence is the normal outcome for
/// any field the block doesn't carry, never an error.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DetailFields {
    pub colour: Option<String>,
    pub sex: Option<String>,
    pub age: Option<String>,
    pub sire: Option<String>,
    pub dam: Option<String>,
    pub raced_distance: Option<String>,
    pub winning_distance: Option<String>,
    pub owner: Option<String>,
    /// Career win-place-start record, e.g. "0-2-2".
    pub dog_record: Option<String>,
    pub win_percent: Option<String>,
    pub place_percent: Option<String>,
    #[serde(rename = "Trainer50")]
    pub trainer_50: Option<String>,
    #[serde(rename = "Trainer350")]
    pub trainer_350: Option<String>,
    #[serde(rename = "CarPM/s")]
    pub car_pm: Option<String>,
    #[serde(rename = "12mPM/s")]
    pub pm_12m: Option<String>,
    #[serde(rename = "API")]
    pub api: Option<String>,
    #[serde(rename = "RTC/km")]
    pub rtc_km: Option<String>,
    #[serde(rename = "RDistTC")]
    pub rdist_tc: Option<String>,
    #[serde(rename = "DLS")]
    pub dls: Option<String>,
    #[serde(rename = "DLW")]
    pub dlw: Option<String>,
    #[serde(rename = "DOD")]
    pub dod: Option<String>,
    #[serde(rename = "G1")]
    pub grade_g1: Option<String>,
    #[serde(rename = "G2")]
    pub grade_g2: Option<String>,
    #[serde(rename = "G3")]
    pub grade_g3: Option<String>,
    #[serde(rename = "LR")]
    pub grade_lr: Option<String>,
    #[serde(rename = "FU")]
    pub grade_fu: Option<String>,
    #[serde(rename = "2U")]
    pub grade_2u: Option<String>,
    #[serde(rename = "3U")]
    pub grade_3u: Option<String>,
    /// Distance token seen in the block and validated against the
    /// known-distance table; used to repair a missing race distance.
    pub detected_distance: Option<u32>,
    pub last_prize: Option<String>,
    pub last_margin: Option<String>,
    pub last_race_time: Option<String>,
    pub last_sec_time: Option<String>,
    pub last_track: Option<String>,
    pub recent_runs: Vec<RecentRun>,
}

impl DetailFields {
    /// Fold `other` into `self` column-wise. Present values overwrite,
    /// absent values never clobber what is already there.
    pub fn merge_from(&mut self, other: DetailFields) {
        fn merge<T>(dst: &mut Option<T>, src: Option<T>) {
            if src.is_some() {
                *dst = src;
            }
        }

        merge(&mut self.colour, other.colour);
        merge(&mut self.sex, other.sex);
        merge(&mut self.age, other.age);
        merge(&mut self.sire, other.sire);
        merge(&mut self.dam, other.dam);
        merge(&mut self.raced_distance, other.raced_distance);
        merge(&mut self.winning_distance, other.winning_distance);
        merge(&mut self.owner, other.owner);
        merge(&mut self.dog_record, other.dog_record);
        merge(&mut self.win_percent, other.win_percent);
        merge(&mut self.place_percent, other.place_percent);
        merge(&mut self.trainer_50, other.trainer_50);
        merge(&mut self.trainer_350, other.trainer_350);
        merge(&mut self.car_pm, other.car_pm);
        merge(&mut self.pm_12m, other.pm_12m);
        merge(&mut self.api, other.api);
        merge(&mut self.rtc_km, other.rtc_km);
        merge(&mut self.rdist_tc, other.rdist_tc);
        merge(&mut self.dls, other.dls);
        merge(&mut self.dlw, other.dlw);
        merge(&mut self.dod, other.dod);
        merge(&mut self.grade_g1, other.grade_g1);
        merge(&mut self.grade_g2, other.grade_g2);
        merge(&mut self.grade_g3, other.grade_g3);
        merge(&mut self.grade_lr, other.grade_lr);
        merge(&mut self.grade_fu, other.grade_fu);
        merge(&mut self.grade_2u, other.grade_2u);
        merge(&mut self.grade_3u, other.grade_3u);
        merge(&mut self.detected_distance, other.detected_distance);
        merge(&mut self.last_prize, other.last_prize);
        merge(&mut self.last_margin, other.last_margin);
        merge(&mut self.last_race_time, other.last_race_time);
        merge(&mut self.last_sec_time, other.last_sec_time);
        merge(&mut self.last_track, other.last_track);
        if !other.recent_runs.is_empty() {
            self.recent_runs = other.recent_runs;
        }
    }
}

// ── One historical run ─────────────────────────────────────────────

/// A single prior-race result line. Only the leading position / field
/// size / date / track are required for a line to count as a run at
/// all; every other field is present only when the line carries it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentRun {
    /// Finishing position, e.g. "2nd".
    pub position: String,
    pub field_size: u32,
    pub date: String,
    pub track: String,
    pub margin: Option<String>,
    pub distance: Option<String>,
    pub sot: Option<String>,
    pub rst: Option<String>,
    pub grade: Option<String>,
    pub race_name: Option<String>,
    pub prize: Option<String>,
    pub api: Option<String>,
    pub race_time: Option<String>,
    pub sec_time: Option<String>,
    #[serde(rename = "box")]
    pub box_no: Option<String>,
    pub odds: Option<String>,
    pub trainer: Option<String>,
    pub ongoing_winners: Option<String>,
    pub track_direction: Option<String>,
    pub winner: Option<String>,
    pub winner_box: Option<String>,
    pub second: Option<String>,
    pub second_box: Option<String>,
    pub third: Option<String>,
    pub third_box: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_existing_when_absent() {
        let mut base = DetailFields {
            owner: Some("Adam Campton".to_string()),
            ..DetailFields::default()
        };
        base.merge_from(DetailFields::default());
        assert_eq!(base.owner.as_deref(), Some("Adam Campton"));
    }

    #[test]
    fn test_merge_present_overwrites() {
        let mut base = DetailFields {
            owner: Some("Adam Campton".to_string()),
            ..DetailFields::default()
        };
        base.merge_from(DetailFields {
            owner: Some("Valerie Denardo".to_string()),
            api: Some("0.3".to_string()),
            ..DetailFields::default()
        });
        assert_eq!(base.owner.as_deref(), Some("Valerie Denardo"));
        assert_eq!(base.api.as_deref(), Some("0.3"));
    }

    #[test]
    fn test_schema_always_emits_race_columns() {
        let record = RunnerRecord {
            box_no: 1,
            dog_name: "GO FORWARD TIGER".to_string(),
            form_number: String::new(),
            trainer: "Adam Campton".to_string(),
            sex_age: "1d".to_string(),
            weight: 0.0,
            draw: 1,
            career_wins: 0,
            career_places: 2,
            career_starts: 2,
            prize_money: 630.0,
            rtc: "3".to_string(),
            dlr: "7".to_string(),
            dlw: "Mdn".to_string(),
            race_number: None,
            race_time: None,
            track: None,
            distance: None,
            details: DetailFields::default(),
        };
        let json = serde_json::to_value(&record).unwrap();
        // Null race columns must still be emitted: fixed schema.
        for key in ["Box", "DogName", "Trainer", "RaceNumber", "Track", "Distance"] {
            assert!(json.get(key).is_some(), "missing column {key}");
        }
        assert!(json["RaceNumber"].is_null());
        for key in ["Owner", "Colour", "RecentRuns", "DetectedDistance"] {
            assert!(
                json["Details"].get(key).is_some(),
                "missing detail column {key}"
            );
        }
    }
}
