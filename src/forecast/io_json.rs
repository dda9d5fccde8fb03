// Reading the scrapes and the organized records, writing the outputs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JSValue;

use crate::forecast::*;

// ********* Scrape ***********

#[derive(Deserialize, Debug)]
struct ScrapedUniversityJs {
    university: String,
    #[serde(rename = "updateTime")]
    update_time: Option<String>,
    error: Option<JSValue>,
    #[serde(default)]
    details: Vec<RawTableJs>,
}

#[derive(Deserialize, Debug)]
struct RawTableJs {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    headers: Vec<JSValue>,
    #[serde(default)]
    rows: Vec<Vec<JSValue>>,
}

fn cell_text(v: &JSValue) -> String {
    match v {
        JSValue::String(s) => s.trim().to_string(),
        JSValue::Null => String::new(),
        x => x.to_string(),
    }
}

pub fn read_scrape(path: &str) -> ForecastResult<Vec<ScrapedUniversity>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let universities: Vec<ScrapedUniversityJs> =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_scrape: {}: {} universities", path, universities.len());
    Ok(universities
        .into_iter()
        .map(|u| ScrapedUniversity {
            university: u.university,
            update_time: u.update_time.filter(|s| !s.trim().is_empty()),
            error: match u.error {
                None | Some(JSValue::Null) | Some(JSValue::Bool(false)) => None,
                Some(JSValue::String(s)) => Some(s),
                Some(x) => Some(x.to_string()),
            },
            details: u
                .details
                .into_iter()
                .map(|t| RawTable {
                    heading: t.heading,
                    headers: t.headers.iter().map(cell_text).collect(),
                    rows: t
                        .rows
                        .iter()
                        .map(|r| r.iter().map(cell_text).collect())
                        .collect(),
                })
                .collect(),
        })
        .collect())
}

// ********* Organized records ***********

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecordJs {
    #[serde(rename = "대학명")]
    university: String,
    #[serde(rename = "캠퍼스", default)]
    campus: String,
    #[serde(rename = "전형명", default)]
    track: String,
    #[serde(rename = "모집단위")]
    department: String,
    #[serde(rename = "모집인원", deserialize_with = "count_from_js", default)]
    capacity: u32,
    #[serde(rename = "지원인원", deserialize_with = "count_from_js", default)]
    applicants: u32,
    #[serde(rename = "경쟁률", default)]
    current_ratio: String,
}

/// Counts written by older tools are strings, sometimes with thousands
/// separators. A count that cannot be read is 0.
fn count_from_js<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JSValue::deserialize(deserializer)?;
    let n = match &v {
        JSValue::Number(n) => n.as_f64().map(|f| f.max(0.0).round() as u32),
        JSValue::String(s) => s.trim().replace(',', "").parse::<u32>().ok(),
        _ => None,
    };
    Ok(n.unwrap_or_else(|| {
        if !v.is_null() {
            debug!("count_from_js: unreadable count {}, using 0", v);
        }
        0
    }))
}

impl RecordJs {
    fn from_record(r: &CanonicalRecord) -> RecordJs {
        RecordJs {
            university: r.university.clone(),
            campus: r.campus.clone(),
            track: r.track.clone(),
            department: r.department.clone(),
            capacity: r.capacity,
            applicants: r.applicants,
            current_ratio: r.current_ratio.clone(),
        }
    }

    fn into_record(self) -> CanonicalRecord {
        CanonicalRecord {
            university: self.university,
            campus: self.campus,
            track: self.track,
            department: self.department,
            capacity: self.capacity,
            applicants: self.applicants,
            current_ratio: self.current_ratio,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OrganizedJs {
    #[serde(rename = "가군", default)]
    group_a: Vec<RecordJs>,
    #[serde(rename = "나군", default)]
    group_b: Vec<RecordJs>,
    #[serde(rename = "다군", default)]
    group_c: Vec<RecordJs>,
    #[serde(rename = "기타", default)]
    other: Vec<RecordJs>,
}

pub fn organized_to_json(organized: &OrganizedRecords) -> OrganizedJs {
    let convert = |rs: &[CanonicalRecord]| rs.iter().map(RecordJs::from_record).collect();
    OrganizedJs {
        group_a: convert(&organized.group_a),
        group_b: convert(&organized.group_b),
        group_c: convert(&organized.group_c),
        other: convert(&organized.other),
    }
}

pub fn read_organized(path: &str) -> ForecastResult<OrganizedRecords> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: OrganizedJs = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    let convert = |rs: Vec<RecordJs>| rs.into_iter().map(RecordJs::into_record).collect();
    let organized = OrganizedRecords {
        group_a: convert(js.group_a),
        group_b: convert(js.group_b),
        group_c: convert(js.group_c),
        other: convert(js.other),
    };
    debug!("read_organized: {}: {} records", path, organized.len());
    Ok(organized)
}

// ********* Enriched records ***********

#[derive(Serialize, Debug, Clone)]
pub struct EnrichedRecordJs {
    #[serde(flatten)]
    record: RecordJs,
    #[serde(rename = "지역")]
    region: String,
    #[serde(rename = "작년추합")]
    waitlist_count: u32,
    #[serde(rename = "증가율")]
    growth_factor: String,
    #[serde(rename = "예상최종경쟁")]
    projected_final: String,
    #[serde(rename = "예상최종경쟁값")]
    projected_final_value: f64,
    #[serde(rename = "예상실질경쟁")]
    projected_real: String,
    #[serde(rename = "예상실질경쟁값")]
    projected_real_value: f64,
    #[serde(rename = "_regionMatch")]
    region_match: &'static str,
    #[serde(rename = "_waitlistMatch")]
    waitlist_match: &'static str,
    #[serde(rename = "_growthMatch")]
    growth_match: &'static str,
}

#[derive(Serialize, Debug, Clone)]
pub struct EnrichedJs {
    #[serde(rename = "가군")]
    group_a: Vec<EnrichedRecordJs>,
    #[serde(rename = "나군")]
    group_b: Vec<EnrichedRecordJs>,
    #[serde(rename = "다군")]
    group_c: Vec<EnrichedRecordJs>,
}

fn enriched_record_js(r: &EnrichedRecord) -> EnrichedRecordJs {
    EnrichedRecordJs {
        record: RecordJs::from_record(&r.record),
        region: r.region.clone(),
        waitlist_count: r.waitlist_count,
        growth_factor: format!("{:.2}", r.growth_factor),
        projected_final: format!("{:.2} : 1", r.projected_final_ratio),
        projected_final_value: r.projected_final_ratio,
        projected_real: format!("{:.2}", r.projected_real_ratio),
        projected_real_value: r.projected_real_ratio,
        region_match: r.region_tier.label(),
        waitlist_match: r.waitlist_tier.label(),
        growth_match: r.growth_tier.label(),
    }
}

pub fn enriched_to_json(groups: &EnrichedGroups) -> EnrichedJs {
    let convert = |rs: &[EnrichedRecord]| rs.iter().map(enriched_record_js).collect();
    EnrichedJs {
        group_a: convert(&groups.group_a),
        group_b: convert(&groups.group_b),
        group_c: convert(&groups.group_c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_from_numbers_and_strings() {
        let js: OrganizedJs = serde_json::from_value(json!({
            "가군": [
                { "대학명": "가야대학교", "모집단위": "간호학과", "모집인원": "1,200", "지원인원": 35, "경쟁률": "3.00 : 1" }
            ],
            "나군": [
                { "대학명": "가야대학교", "모집단위": "치위생과", "모집인원": null }
            ]
        }))
        .unwrap();
        assert_eq!(js.group_a[0].capacity, 1200);
        assert_eq!(js.group_a[0].applicants, 35);
        assert_eq!(js.group_b[0].capacity, 0);
        assert_eq!(js.group_b[0].campus, "");
        assert!(js.group_c.is_empty());

        let lenient: OrganizedJs = serde_json::from_value(json!({
            "가군": [
                { "대학명": "가야대학교", "모집단위": "간호학과", "모집인원": "30", "지원인원": "" },
                { "대학명": "가야대학교", "모집단위": "치위생과", "모집인원": "", "지원인원": true },
                { "대학명": "가야대학교", "모집단위": "물리치료학과", "모집인원": "약간명", "지원인원": [1] }
            ]
        }))
        .unwrap();
        let counts: Vec<(u32, u32)> = lenient
            .group_a
            .iter()
            .map(|r| (r.capacity, r.applicants))
            .collect();
        assert_eq!(counts, vec![(30, 0), (0, 0), (0, 0)]);
    }

    #[test]
    fn scrape_cells_become_text() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut f,
            r#"[{ "university": "가야대학교", "updateTime": "",
                  "details": [{ "heading": "가군", "headers": ["모집단위"], "rows": [["간호학과", 20, null]] }] },
                { "university": "오류대학교", "error": "timeout" }]"#
                .as_bytes(),
        )
        .unwrap();
        let scrape = read_scrape(&f.path().display().to_string()).unwrap();
        assert_eq!(scrape.len(), 2);
        assert_eq!(scrape[0].update_time, None);
        assert_eq!(scrape[0].details[0].rows[0], vec!["간호학과", "20", ""]);
        assert_eq!(scrape[1].error, Some("timeout".to_string()));
        assert!(scrape[1].details.is_empty());
    }

    #[test]
    fn enriched_fields() {
        let record = CanonicalRecord {
            university: "가야대학교".to_string(),
            campus: "김해".to_string(),
            track: "일반학생".to_string(),
            department: "간호학과".to_string(),
            capacity: 20,
            applicants: 60,
            current_ratio: "3.00 : 1".to_string(),
        };
        let enriched = EnrichedRecord {
            record,
            group: AdmissionGroup::GroupA,
            region: "경남".to_string(),
            region_tier: MatchTier::Exact,
            waitlist_count: 10,
            waitlist_tier: MatchTier::GroupLevel,
            growth_factor: 1.5,
            growth_tier: MatchTier::Default,
            projected_final_ratio: 4.5,
            projected_real_ratio: 10.0 / 3.0,
        };
        let groups = EnrichedGroups {
            group_a: vec![enriched],
            ..EnrichedGroups::default()
        };
        let js = serde_json::to_value(enriched_to_json(&groups)).unwrap();
        let r = &js["가군"][0];
        assert_eq!(r["대학명"], "가야대학교");
        assert_eq!(r["모집인원"], 20);
        assert_eq!(r["증가율"], "1.50");
        assert_eq!(r["예상최종경쟁"], "4.50 : 1");
        assert_eq!(r["예상최종경쟁값"], 4.5);
        assert_eq!(r["예상실질경쟁"], "3.33");
        assert_eq!(r["예상실질경쟁값"].as_f64(), Some(10.0 / 3.0));
        assert_eq!(r["_regionMatch"], "exact");
        assert_eq!(r["_waitlistMatch"], "group");
        assert_eq!(r["_growthMatch"], "default");
        assert!(js.get("기타").is_none());
    }
}
