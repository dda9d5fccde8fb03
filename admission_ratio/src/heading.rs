use crate::config::AdmissionGroup;

const RATIO_MARKER: &str = "경쟁률";

/// What a table caption says about its rows.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct HeadingInfo {
    /// None when the caption does not start with a group label.
    pub group: Option<AdmissionGroup>,
    pub track: String,
}

/// Splits a caption such as "가군 일반학생전형[수능] 경쟁률 현황" into its group
/// and track name ("일반학생전형[수능]").
///
/// Never fails; an unrecognized caption becomes the track name verbatim.
pub fn classify_heading(caption: &str) -> HeadingInfo {
    let caption = caption.trim();
    let found = AdmissionGroup::ALL
        .into_iter()
        .find_map(|g| caption.strip_prefix(g.label()).map(|rest| (g, rest)));
    match found {
        Some((group, rest)) => HeadingInfo {
            group: Some(group),
            track: track_before_marker(rest.trim()),
        },
        None => HeadingInfo {
            group: None,
            track: track_before_marker(caption),
        },
    }
}

// The marker only ends the track when something precedes it.
fn track_before_marker(s: &str) -> String {
    match s.find(RATIO_MARKER) {
        Some(idx) if idx > 0 => s[..idx].trim().to_string(),
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_and_track() {
        let h = classify_heading("가군 일반학생전형[수능] 경쟁률 현황");
        assert_eq!(h.group, Some(AdmissionGroup::GroupA));
        assert_eq!(h.track, "일반학생전형[수능]");
    }

    #[test]
    fn other_groups() {
        assert_eq!(
            classify_heading("나군 농어촌학생 경쟁률").group,
            Some(AdmissionGroup::GroupB)
        );
        let h = classify_heading("다군 실기우수자");
        assert_eq!(h.group, Some(AdmissionGroup::GroupC));
        assert_eq!(h.track, "실기우수자");
    }

    #[test]
    fn no_group() {
        let h = classify_heading("특성화고졸재직자 경쟁률 현황");
        assert_eq!(h.group, None);
        assert_eq!(h.track, "특성화고졸재직자");
    }

    #[test]
    fn marker_at_start_keeps_caption() {
        let h = classify_heading("경쟁률 현황");
        assert_eq!(h.group, None);
        assert_eq!(h.track, "경쟁률 현황");
        let h = classify_heading("가군 경쟁률 현황");
        assert_eq!(h.group, Some(AdmissionGroup::GroupA));
        assert_eq!(h.track, "경쟁률 현황");
    }

    #[test]
    fn verbatim_fallback() {
        let h = classify_heading("전형 3");
        assert_eq!(h.group, None);
        assert_eq!(h.track, "전형 3");
    }
}
