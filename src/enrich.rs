//! Enrichment: fold detail-block fields back into the runner table.
//!
//! Every runner is handled independently. A runner whose block cannot
//! be located keeps its base fields (a "miss"); a runner whose anchor
//! pattern fails to compile is counted as an "error"; neither aborts
//! the batch. The tally is a log line, not part of the data contract.

use crate::block::find_block;
use crate::fields::extract_fields;
use crate::header::{repair_numbering, scan_rows};
use crate::normalize::normalize;
use crate::types::RunnerRecord;

/// Enrich each runner row in place from its detail block in the
/// normalized document text.
pub fn enrich(runners: &mut [RunnerRecord], text: &str) {
    let mut matched = 0usize;
    let mut missed = 0usize;
    let mut errored = 0usize;

    for runner in runners.iter_mut() {
        let name = runner.dog_name.trim().to_string();
        if name.is_empty() {
            missed += 1;
            continue;
        }

        match find_block(text, &name) {
            Ok(Some(block)) => {
                let fields = extract_fields(&block);
                // A row whose header was missed has no distance; any
                // distance token seen in the block repairs it.
                if runner.distance.is_none() {
                    runner.distance = fields.detected_distance;
                }
                runner.details.merge_from(fields);
                matched += 1;
            }
            Ok(None) => missed += 1,
            Err(e) => {
                errored += 1;
                eprintln!("  [error] {name}: {e}");
            }
        }
    }

    eprintln!("Enriched {matched} runners ({missed} without a detail block, {errored} errors)");
}

/// Full pipeline for one document: normalize, scan headers and runner
/// rows, repair race numbering, enrich from detail blocks.
pub fn parse_document(raw: &str) -> Vec<RunnerRecord> {
    let text = normalize(raw);
    let mut runners = scan_rows(&text);
    repair_numbering(&mut runners);
    enrich(&mut runners, &text);
    runners
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three runners, each with its own detail section.
    const SAMPLE_MULTI_DOG: &str = "\
Race No 1 Oct 25 05:57PM RICHMOND 320m
1. Go Forward Tiger 1d 0.0kg 1 Adam Campton 0 - 2 - 2 $630 3 7 Mdn
2. Luna Rupee 1b 0.0kg 2 Guiseppe Denardo 0 - 0 - 0 $0 FU 0 Mdn
3. Hooked On Gin 2d 0.0kg 3 Troy Vella 0 - 0 - 5 $75 6 16 Mdn

GO FORWARD TIGER
j50s j350s t50s t350s
1. 0kg (1) bdl 1 D ADAM CAMPTON Horse: 0-2-2 0%-100%
FERAL FRANKY (AUS) - GO FORWARD BARBS (AUS)
Owner: Adam Campton
CarPM/s 12mPM/s API RTC/km RDistTC DLS DLW DOD
$315 $315 0.3 3/0.644 2 7 0 -4.3

LUNA RUPEE
j50s j350s t50s t350s
2. 0kg (2) bl 1 B GUISEPPE DENARDO Horse: First Ride
ASTON RUPEE (AUS) - LITTLE MISS KADE (AUS)
Owner: Valerie Denardo
CarPM/s 12mPM/s API RTC/km RDistTC DLS DLW DOD
$0 $0 0.0 FU/0 0 0 0 FU

HOOKED ON GIN
j50s j350s t50s t350s
3. 0kg (3) blu 2 D TROY VELLA Horse: 0-0-5 0%-0%
HOOKED ON SCOTCH (AUS) - BORN FOR THIS (AUS)
Owner: Anthony Saab
CarPM/s 12mPM/s API RTC/km RDistTC DLS DLW DOD
$15 $15 0.0 6/1.608 5 16 0 -4.3
";

    #[test]
    fn test_block_isolation_distinct_owners() {
        let rows = parse_document(SAMPLE_MULTI_DOG);
        assert_eq!(rows.len(), 3);

        let owner_of = |name: &str| {
            rows.iter()
                .find(|r| r.dog_name == name)
                .and_then(|r| r.details.owner.clone())
        };
        assert_eq!(
            owner_of("GO FORWARD TIGER").as_deref(),
            Some("Adam Campton")
        );
        assert_eq!(owner_of("LUNA RUPEE").as_deref(), Some("Valerie Denardo"));
        assert_eq!(owner_of("HOOKED ON GIN").as_deref(), Some("Anthony Saab"));

        // No leakage: three runners, three distinct owners.
        let mut owners: Vec<_> = rows
            .iter()
            .filter_map(|r| r.details.owner.clone())
            .collect();
        owners.sort();
        owners.dedup();
        assert_eq!(owners.len(), 3);
    }

    #[test]
    fn test_race_context_on_every_row() {
        let rows = parse_document(SAMPLE_MULTI_DOG);
        for r in &rows {
            assert_eq!(r.race_number, Some(1));
            assert_eq!(r.track.as_deref(), Some("Richmond"));
            assert_eq!(r.distance, Some(320));
        }
    }

    #[test]
    fn test_graceful_degradation_without_detail_block() {
        let text = "\
Race No 1 Oct 25 05:57PM RICHMOND 320m
1. Test Dog 1d 0.0kg 1 John Trainer 0 - 2 - 2 $630 3 7 Mdn
";
        let rows = parse_document(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dog_name, "TEST DOG");
        // Base fields survive; every detail field stays absent.
        assert_eq!(rows[0].track.as_deref(), Some("Richmond"));
        assert_eq!(rows[0].details, crate::types::DetailFields::default());
    }

    #[test]
    fn test_distance_backfilled_from_detected_token() {
        // No header at all: the race distance can only come from the
        // detail block's distance token.
        let text = "\
1. Test Dog 1d 0.0kg 1 John Trainer 0 - 2 - 2 $630 3 7 Mdn

TEST DOG
j50s j350s t50s t350s
Owner: Test Owner
last win over 320m
";
        let rows = parse_document(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].race_number, Some(1));
        assert_eq!(rows[0].track.as_deref(), Some("UNKNOWN"));
        assert_eq!(rows[0].distance, Some(320));
        assert_eq!(rows[0].details.owner.as_deref(), Some("Test Owner"));
    }

    #[test]
    fn test_malformed_run_lines_tolerated() {
        let text = "\
Race No 1 Oct 25 05:57PM RICHMOND 320m
1. Test Dog 1d 0.0kg 1 John Trainer 0 - 2 - 2 $630 3 7 Mdn

TEST DOG
j50s j350s t50s t350s
Owner: Test Owner

This is a malformed line that should be ignored
2nd of 8 12/10/2025 RICHMOND Margin 1.5 Lengths Distance 320m
Another bad line without proper structure
";
        let rows = parse_document(text);
        assert_eq!(rows.len(), 1);
        let runs = &rows[0].details.recent_runs;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].position, "2nd");
        assert_eq!(runs[0].margin.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_whitespace_variants_parse_identically() {
        let loose = "\
Race No 1   Oct 25   05:57PM   RICHMOND   320m
1.    Test Dog      1d    0.0kg    1    John Trainer    0 - 2 - 2    $630    3    7    Mdn

TEST DOG
j50s j350s t50s t350s
1.   0kg   (1)   bdl   1   D   JOHN TRAINER   Horse:   0-2-2   0%-100%
Owner:    Test Owner
";
        let tight = "\
Race No 1 Oct 25 05:57PM RICHMOND 320m
1. Test Dog 1d 0.0kg 1 John Trainer 0 - 2 - 2 $630 3 7 Mdn

TEST DOG
j50s j350s t50s t350s
1. 0kg (1) bdl 1 D JOHN TRAINER Horse: 0-2-2 0%-100%
Owner: Test Owner
";
        let a = parse_document(loose);
        let b = parse_document(tight);
        assert_eq!(a, b);
        assert_eq!(a[0].details.owner.as_deref(), Some("Test Owner"));
        assert_eq!(a[0].details.colour.as_deref(), Some("bdl"));
    }

    #[test]
    fn test_idempotent_over_reruns() {
        let first = parse_document(SAMPLE_MULTI_DOG);
        let second = parse_document(SAMPLE_MULTI_DOG);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_second_header_repaired() {
        // The second race's header line is absent; box reset to 1
        // starts race 2 and the repaired numbering covers every row.
        let text = "\
Race No 1 Oct 25 05:57PM RICHMOND 320m
1. Alpha Dog 1d 0.0kg 1 John Trainer 0 - 2 - 2 $630 3 7 Mdn
2. Beta Dog 1b 0.0kg 2 Jane Trainer 0 - 0 - 0 $0 FU 0 Mdn
1. Gamma Dog 2d 0.0kg 1 Jack Trainer 0 - 0 - 5 $75 6 16 Mdn
2. Delta Dog 2b 0.0kg 2 Jill Trainer 1 - 1 - 4 $900 2 5 Mdn
";
        let rows = parse_document(text);
        assert_eq!(rows.len(), 4);
        let nums: Vec<_> = rows.iter().map(|r| r.race_number.unwrap()).collect();
        assert_eq!(nums, vec![1, 1, 2, 2]);
        // The repaired rows fall back to the track sentinel.
        assert_eq!(rows[2].track.as_deref(), Some("UNKNOWN"));
        assert_eq!(rows[2].distance, None);
    }
}
