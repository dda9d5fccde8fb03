//! Canonical keys for university and department names.
//!
//! The live site and the two historical rosters spell the same entity
//! differently ("가야대학교", "가야대", "국립가야대학교(본교)"). These functions
//! collapse the spellings to one key. Collisions between distinct colleges that
//! share a root name are possible and accepted.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::AdmissionGroup;
use crate::shapes::cached_regex;

// Order matters: the abbreviations are tried before the generic suffixes.
const ABBREVIATIONS: [(&str, &str); 2] = [("여자대학교", "여대"), ("외국어대학교", "외대")];
const UNIVERSITY_SUFFIXES: [&str; 3] = ["대학교", "대학", "대"];

/// Canonical university key.
///
/// The rules are applied until the key stops changing, which keeps the key a
/// fixed point: `normalize_university(normalize_university(s)) == normalize_university(s)`.
pub fn normalize_university(name: &str) -> String {
    let mut cur = university_step(name);
    loop {
        let next = university_step(&cur);
        if next == cur {
            return cur;
        }
        cur = next;
    }
}

fn university_step(name: &str) -> String {
    let mut s = strip_enclosed(&remove_whitespace(name), parenthesized_re());
    if let Some(rest) = s.strip_prefix("국립") {
        s = rest.to_string();
    }
    if let Some(rest) = s.strip_suffix("서울캠퍼스") {
        s = rest.to_string();
    }
    for (long, short) in ABBREVIATIONS {
        if let Some(rest) = s.strip_suffix(long) {
            s = format!("{}{}", rest, short);
            break;
        }
    }
    // Only the longest matching suffix is removed in one step.
    for suffix in UNIVERSITY_SUFFIXES {
        if let Some(rest) = s.strip_suffix(suffix) {
            s = rest.to_string();
            break;
        }
    }
    s.to_lowercase()
}

/// Canonical department key: no whitespace, no `[...]` or `(...)` segments, lowercase.
pub fn normalize_department(name: &str) -> String {
    let s = remove_whitespace(name);
    let s = strip_enclosed(&s, bracketed_re());
    let s = strip_enclosed(&s, parenthesized_re());
    s.to_lowercase()
}

/// Reads a group cell from a roster.
pub fn normalize_group(cell: &str) -> Option<AdmissionGroup> {
    AdmissionGroup::from_label(cell)
}

fn remove_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn parenthesized_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&RE, r"\(.*?\)")
}

fn bracketed_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&RE, r"\[.*?\]")
}

/// Removes every segment matched by `re`. An opener without a closer is kept.
fn strip_enclosed(s: &str, re: Option<&Regex>) -> String {
    match re {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// The keys used by the three lookup tiers.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct MatchKeys {
    pub exact: String,
    pub group: String,
    pub univ: String,
}

impl MatchKeys {
    pub fn new(university: &str, group: AdmissionGroup, department: &str) -> MatchKeys {
        let univ = normalize_university(university);
        let dept = normalize_department(department);
        MatchKeys {
            exact: exact_key(&univ, group, &dept),
            group: group_key(&univ, group),
            univ,
        }
    }
}

pub(crate) fn exact_key(univ_key: &str, group: AdmissionGroup, dept_key: &str) -> String {
    format!("{}|{}|{}", univ_key, group.label(), dept_key)
}

pub(crate) fn group_key(univ_key: &str, group: AdmissionGroup) -> String {
    format!("{}|{}", univ_key, group.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIVERSITY_SAMPLES: [&str; 14] = [
        "가야대학교",
        "가야대",
        "가야대학",
        " 가 야 대 학 교 ",
        "국립부경대학교",
        "한양대학교(ERICA)",
        "서울여자대학교",
        "한국외국어대학교",
        "동국대학교서울캠퍼스",
        "한대대학교",
        "국립국립대",
        "(본교)",
        "KAIST",
        "",
    ];

    #[test]
    fn university_suffixes_collapse() {
        assert_eq!(normalize_university("가야대학교"), "가야");
        assert_eq!(normalize_university("가야대"), "가야");
        assert_eq!(normalize_university("가야대학"), "가야");
        assert_eq!(normalize_university("가야"), "가야");
    }

    #[test]
    fn university_prefix_and_campus() {
        assert_eq!(normalize_university("국립부경대학교"), "부경");
        assert_eq!(normalize_university("한양대학교(ERICA)"), "한양");
        assert_eq!(normalize_university("동국대학교 서울캠퍼스"), "동국");
        assert_eq!(normalize_university("KAIST"), "kaist");
    }

    #[test]
    fn university_abbreviations() {
        assert_eq!(
            normalize_university("서울여자대학교"),
            normalize_university("서울여대")
        );
        assert_eq!(
            normalize_university("부산외국어대학교"),
            normalize_university("부산외대")
        );
    }

    #[test]
    fn university_idempotent() {
        for s in UNIVERSITY_SAMPLES {
            let once = normalize_university(s);
            assert_eq!(normalize_university(&once), once, "input {:?}", s);
        }
    }

    #[test]
    fn department_strips_segments() {
        assert_eq!(normalize_department("국어교육과[교직]"), "국어교육과");
        assert_eq!(normalize_department("간호학과 (전주)"), "간호학과");
        assert_eq!(normalize_department("AI 융합학부"), "ai융합학부");
        assert_eq!(normalize_department("경영학과(야간"), "경영학과(야간");
    }

    #[test]
    fn department_idempotent() {
        let samples = [
            "국어교육과[교직]",
            "([x])",
            "[(x]y)",
            "(a[)b]",
            "a(b[c])",
            "((x))",
            "Computer Science",
            "",
        ];
        for s in samples {
            let once = normalize_department(s);
            assert_eq!(normalize_department(&once), once, "input {:?}", s);
        }
    }

    #[test]
    fn group_labels() {
        assert_eq!(normalize_group("가"), Some(AdmissionGroup::GroupA));
        assert_eq!(normalize_group(" 나군 "), Some(AdmissionGroup::GroupB));
        assert_eq!(normalize_group("다"), Some(AdmissionGroup::GroupC));
        assert_eq!(normalize_group("수시"), None);
    }

    #[test]
    fn match_keys_layout() {
        let keys = MatchKeys::new("가야대학교", AdmissionGroup::GroupB, "간호학과[교직]");
        assert_eq!(keys.exact, "가야|나군|간호학과");
        assert_eq!(keys.group, "가야|나군");
        assert_eq!(keys.univ, "가야");
    }
}
