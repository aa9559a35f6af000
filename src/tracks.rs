/// Short track codes as they appear in race headers, mapped to full
/// track names. Header lines abbreviate inconsistently ("RICHG",
/// "RICH", "WENTW", …); the first five characters of the first word
/// are enough to disambiguate every code seen so far.
pub const TRACK_CODES: &[(&str, &str)] = &[
    ("RICHG", "Richmond"),
    ("RICH", "Richmond"),
    ("WENTW", "Wentworth Park"),
    ("WENT", "Wentworth Park"),
    ("ALBPK", "Albion Park"),
    ("ALB", "Albion Park"),
    ("DARW", "Darwin"),
    ("DARWI", "Darwin"),
    ("DAPTO", "Dapto"),
    ("GOSF", "Gosford"),
    ("SAND", "Sandown Park"),
    ("SANDO", "Sandown Park"),
    ("GRAFT", "Grafton"),
    ("BATH", "Bathurst"),
    ("MAND", "Mandurah"),
    ("CANN", "Cannington"),
    ("LADB", "Ladbrokes Gardens"),
    ("HORS", "Horsham"),
    ("WARR", "Warrnambool"),
    ("TRAR", "Traralgon"),
    ("BALL", "Ballarat"),
    ("GEEL", "Geelong"),
];

/// Track names as they appear bare inside result lines, upper-cased.
/// The token scanner treats any of these as "the track of the most
/// recent run mentioned in this block".
pub const RESULT_TRACKS: &[&str] = &[
    "DARWIN",
    "RICHMOND",
    "WENTWORTH",
    "ALBION",
    "MANDURAH",
    "GOSFORD",
    "SANDOWN",
    "CANNINGTON",
    "DUBBO",
    "BATHURST",
    "GRAFTON",
];

/// Race distances (meters) attested across the supported circuits.
/// A bare `<ddd>m` token only counts as a distance when it is in this
/// set; anything else is assumed to be noise. Sorted ascending.
pub const KNOWN_DISTANCES: &[u32] = &[
    288, 300, 301, 305, 312, 319, 320, 331, 350, 380, 383, 400, 401, 407, 425, 431, 440, 450, 457,
    460, 472, 480, 484, 500, 515, 520, 525, 530, 545, 565, 600, 603, 642, 650, 685, 700, 710, 715,
    720, 731, 750, 760, 800, 842,
];

pub fn is_known_distance(d: u32) -> bool {
    KNOWN_DISTANCES.binary_search(&d).is_ok()
}

/// Canonicalize a raw track string from a header line: look up the
/// first five characters of the first word against the code table,
/// falling back to title-casing the raw text. Empty input maps to the
/// "UNKNOWN" sentinel.
pub fn canonical_track(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() {
        return "UNKNOWN".to_string();
    }
    let first = t.split_whitespace().next().unwrap_or(t).to_uppercase();
    let key: String = first.chars().take(5).collect();
    for (code, name) in TRACK_CODES {
        if *code == key {
            return (*name).to_string();
        }
    }
    title_case(t)
}

/// Title-case each whitespace-separated word: "WENTWORTH PARK" →
/// "Wentworth Park".
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
