//! Predicates that classify a free-text cell by what it looks like.
//!
//! They drive the positional half of the row extractor and validate the
//! header-matched half.

use regex::Regex;
use std::sync::OnceLock;

const SLOGAN_MAX_CHARS: usize = 50;
const MAJOR_MAX_CHARS: usize = 40;

const SLOGAN_KEYWORDS: [&str; 6] = ["양성", "전문가", "인재", "교육", "취업", "진로"];
const MAJOR_MARKERS: [&str; 5] = ["학과", "학부", "전공", "교육과", "계열"];
const MAJOR_ENDINGS: [&str; 4] = ["학과", "학부", "전공", "과"];
const CAMPUS_MARKERS: [&str; 4] = ["캠퍼스", "본교", "교정", "분교"];
const CAMPUS_CITIES: [&str; 9] = [
    "서울", "대전", "논산", "부산", "천안", "세종", "인천", "광주", "대구",
];
const TRACK_KEYWORDS: [&str; 6] = ["전형", "수능", "정시", "수시", "특별", "우수자"];

const SUBTOTAL_MARKERS: [&str; 2] = ["총계", "소계"];

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Compiles `pattern` on first use. A pattern that does not compile matches
/// nothing.
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn numeric_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&RE, r"^[0-9,]*[0-9][0-9,]*$")
}

fn rate_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&RE, r"[0-9]+(?:\.[0-9]*)?")
}

fn leading_int_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&RE, r"^\+?([0-9]+)")
}

fn ratio_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&RE, r"^[0-9,]*[0-9][0-9,]*(?:\.[0-9]*)?\s*:\s*1$")
}

/// Digits only, thousands separators allowed: "1,204".
pub fn is_numeric(s: &str) -> bool {
    numeric_re().map_or(false, |re| re.is_match(s.trim()))
}

/// Integer value of a numeric cell.
pub fn parse_count(s: &str) -> Option<u32> {
    if !is_numeric(s) {
        return None;
    }
    s.trim().replace(',', "").parse::<u32>().ok()
}

/// The first decimal number in a cell, 0 when there is none: "5.32 : 1" is 5.32.
/// Thousands separators are ignored.
pub fn parse_rate(s: &str) -> f64 {
    let s = s.replace(',', "");
    rate_re()
        .and_then(|re| re.find(&s))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// The integer a cell starts with, 0 when there is none or it is negative:
/// "12명" is 12.
pub fn parse_leading_int(s: &str) -> u32 {
    leading_int_re()
        .and_then(|re| re.captures(s.trim()))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

/// "5.00 : 1", "12.3:1".
pub fn is_ratio_shaped(s: &str) -> bool {
    ratio_re().map_or(false, |re| re.is_match(s.trim()))
}

/// Descriptive text interleaved between the department and the counts.
///
/// A keyword alone does not make a slogan out of a short major name such as
/// "국어교육과".
pub fn is_slogan_shaped(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    char_len(s) > SLOGAN_MAX_CHARS
        || s.contains('!')
        || (SLOGAN_KEYWORDS.iter().any(|k| s.contains(k)) && !is_major_name_shaped(s))
}

/// A short recruitment-unit name: "컴퓨터공학과", "경영학부", "국어교육과".
pub fn is_major_name_shaped(s: &str) -> bool {
    !s.is_empty()
        && char_len(s) < MAJOR_MAX_CHARS
        && (MAJOR_MARKERS.iter().any(|k| s.contains(k)) || s.ends_with('과'))
}

/// "서울캠퍼스", "본교", "[천안] 제2교정".
pub fn is_campus_shaped(s: &str) -> bool {
    CAMPUS_MARKERS.iter().any(|k| s.contains(k))
        || (s.contains('[') && CAMPUS_CITIES.iter().any(|c| s.contains(c)))
}

/// An admission-track name as written in a track column.
pub fn is_track_shaped(s: &str) -> bool {
    if s.is_empty() || is_numeric(s) {
        return false;
    }
    if MAJOR_ENDINGS.iter().any(|e| s.ends_with(e)) {
        return false;
    }
    TRACK_KEYWORDS.iter().any(|k| s.contains(k))
}

/// Total and subtotal rows carry one of the markers in some cell.
pub fn is_subtotal_row(cells: &[String]) -> bool {
    cells
        .iter()
        .any(|c| SUBTOTAL_MARKERS.iter().any(|m| c.contains(m)))
}
