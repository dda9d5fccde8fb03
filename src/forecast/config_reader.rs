use crate::forecast::*;
use admission_ratio::builder::LabelPolicy;
use admission_ratio::region::RegionRules;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSettings {
    #[serde(rename = "minRatio")]
    pub min_ratio: Option<f64>,
    #[serde(rename = "maxRatio")]
    pub max_ratio: Option<f64>,
    /// "median" or "mean"
    pub aggregation: Option<String>,
}

/// A roster file and the position of its fields.
///
/// Row and column indexes start at 1. Columns may also be given as Excel
/// letters ("A", "AB"). Fields that are not set keep the default layout.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterSource {
    /// "xlsx" or "csv"
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "firstDataRowIndex")]
    _first_data_row_index: Option<JSValue>,
    #[serde(rename = "regionColumnIndex")]
    _region_column_index: Option<JSValue>,
    #[serde(rename = "universityColumnIndex")]
    _university_column_index: Option<JSValue>,
    #[serde(rename = "groupColumnIndex")]
    _group_column_index: Option<JSValue>,
    #[serde(rename = "departmentColumnIndex")]
    _department_column_index: Option<JSValue>,
    #[serde(rename = "capacityColumnIndex")]
    _capacity_column_index: Option<JSValue>,
    #[serde(rename = "ratioColumnIndex")]
    _ratio_column_index: Option<JSValue>,
    #[serde(rename = "waitlistColumnIndex")]
    _waitlist_column_index: Option<JSValue>,
    /// The 3일전 column of each past cycle, most recent first.
    #[serde(rename = "yearStartColumnIndexes")]
    _year_start_column_indexes: Option<Vec<JSValue>>,
    /// The cycle of the first entry of yearStartColumnIndexes.
    #[serde(rename = "latestYear")]
    pub latest_year: Option<u16>,
}

fn provider_for_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "xlsx" | "xlsm" => Some("xlsx"),
        "csv" => Some("csv"),
        _ => None,
    }
}

impl RosterSource {
    /// A source with the default layout. The provider follows the extension
    /// and defaults to xlsx.
    pub fn from_path(path: &str) -> RosterSource {
        RosterSource {
            provider: provider_for_path(path).unwrap_or("xlsx").to_string(),
            file_path: path.to_string(),
            excel_worksheet_name: None,
            _first_data_row_index: None,
            _region_column_index: None,
            _university_column_index: None,
            _group_column_index: None,
            _department_column_index: None,
            _capacity_column_index: None,
            _ratio_column_index: None,
            _waitlist_column_index: None,
            _year_start_column_indexes: None,
            latest_year: None,
        }
    }

    /// The same layout read from another file.
    pub fn with_file_path(&self, path: &str) -> RosterSource {
        RosterSource {
            provider: provider_for_path(path)
                .map(|p| p.to_string())
                .unwrap_or_else(|| self.provider.clone()),
            file_path: path.to_string(),
            ..self.clone()
        }
    }

    fn first_data_row(&self, default: usize) -> ForecastResult<usize> {
        zero_based(&self._first_data_row_index, default)
    }

    pub fn region_layout(&self) -> ForecastResult<RegionLayout> {
        let d = RegionLayout::default();
        Ok(RegionLayout {
            first_data_row: self.first_data_row(d.first_data_row)?,
            region: zero_based(&self._region_column_index, d.region)?,
            university: zero_based(&self._university_column_index, d.university)?,
            group: zero_based(&self._group_column_index, d.group)?,
            department: zero_based(&self._department_column_index, d.department)?,
        })
    }

    pub fn waitlist_layout(&self) -> ForecastResult<WaitlistLayout> {
        let d = WaitlistLayout::default();
        Ok(WaitlistLayout {
            first_data_row: self.first_data_row(d.first_data_row)?,
            university: zero_based(&self._university_column_index, d.university)?,
            group: zero_based(&self._group_column_index, d.group)?,
            department: zero_based(&self._department_column_index, d.department)?,
            capacity: zero_based(&self._capacity_column_index, d.capacity)?,
            ratio: zero_based(&self._ratio_column_index, d.ratio)?,
            waitlist: zero_based(&self._waitlist_column_index, d.waitlist)?,
        })
    }

    pub fn rate_history_layout(&self) -> ForecastResult<RateHistoryLayout> {
        let d = RateHistoryLayout::default();
        let years = match &self._year_start_column_indexes {
            Some(starts) => {
                let latest = self
                    .latest_year
                    .or_else(|| d.years.first().map(|y| y.year))
                    .unwrap_or(0);
                let mut years = Vec::new();
                for (i, start) in starts.iter().enumerate() {
                    let col = read_js_int(start)? - 1;
                    years.push(YearColumns::starting_at(latest.saturating_sub(i as u16), col));
                }
                years
            }
            None => d.years,
        };
        Ok(RateHistoryLayout {
            first_data_row: self.first_data_row(d.first_data_row)?,
            university: zero_based(&self._university_column_index, d.university)?,
            group: zero_based(&self._group_column_index, d.group)?,
            department: zero_based(&self._department_column_index, d.department)?,
            years,
        })
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForecastConfig {
    #[serde(rename = "rawScrapePath")]
    pub raw_scrape_path: Option<String>,
    #[serde(rename = "organizedPath")]
    pub organized_path: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "regionRoster")]
    pub region_roster: Option<RosterSource>,
    #[serde(rename = "waitlistRoster")]
    pub waitlist_roster: Option<RosterSource>,
    #[serde(rename = "rateHistoryRoster")]
    pub rate_history_roster: Option<RosterSource>,
    #[serde(rename = "snapshotDay")]
    pub snapshot_day: Option<String>,
    pub growth: Option<GrowthSettings>,
    /// "lastWriteWins" (default) or "frequencyVote"
    #[serde(rename = "regionGroupPolicy")]
    pub region_group_policy: Option<String>,
}

impl ForecastConfig {
    pub fn growth_rules(&self) -> ForecastResult<GrowthRules> {
        let d = GrowthRules::default();
        let settings = match &self.growth {
            Some(g) => g,
            None => return Ok(d),
        };
        let aggregation = match settings.aggregation.as_deref() {
            None | Some("median") => FactorPolicy::Median,
            Some("mean") => FactorPolicy::Mean,
            Some(x) => whatever!("unknown growth aggregation: {}", x),
        };
        Ok(GrowthRules {
            min_ratio: settings.min_ratio.unwrap_or(d.min_ratio),
            max_ratio: settings.max_ratio.unwrap_or(d.max_ratio),
            aggregation,
        })
    }

    pub fn region_rules(&self) -> ForecastResult<RegionRules> {
        let group_policy = match self.region_group_policy.as_deref() {
            None | Some("lastWriteWins") => LabelPolicy::LastWriteWins,
            Some("frequencyVote") => LabelPolicy::FrequencyVote,
            Some(x) => whatever!("unknown region group policy: {}", x),
        };
        Ok(RegionRules { group_policy })
    }
}

pub fn read_config(path: &str) -> ForecastResult<ForecastConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu { path })
}

fn zero_based(x: &Option<JSValue>, default: usize) -> ForecastResult<usize> {
    match x {
        Some(v) => Ok(read_js_int(v)? - 1),
        None => Ok(default),
    }
}

/// Reads a 1-based index: a number, a string of digits, or Excel column letters.
fn read_js_int(x: &JSValue) -> ForecastResult<usize> {
    let n = match x {
        JSValue::Number(n) => n.as_u64().map(|x| x as usize),
        // Parsing the Excel-style columns
        JSValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => s
            .to_ascii_uppercase()
            .chars()
            .try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(c as usize - 'A' as usize + 1)
            }),
        JSValue::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n >= 1 => Ok(n),
        _ => ParsingJsonNumberSnafu {
            content: x.to_string(),
        }
        .fail(),
    }
}
