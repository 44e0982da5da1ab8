//! Summary statistics over the complaints dataset.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use super::Dataset;

/// Label used for missing cells in raw columns.
const MISSING: &str = "nan";

/// Date layouts seen in `CMPLNT_FR_DT` exports.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];
const DATETIME_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Label frequencies, most frequent first, ties broken by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueCounts(Vec<(String, u64)>);

impl ValueCounts {
    fn tally(values: impl Iterator<Item = String>) -> Self {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
        let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self(entries)
    }

    fn top(mut self, n: usize) -> Self {
        self.0.truncate(n);
        self
    }

    /// Count for `label`, if it occurred.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, n)| *n)
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValueCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, count)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{label}: {count}")?;
        }
        Ok(())
    }
}

/// Response time summary in hours, rounded to two places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseTimeStats {
    pub mean_hours: f64,
    pub median_hours: f64,
    pub max_hours: f64,
}

impl fmt::Display for ResponseTimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean_hours: {}, median_hours: {}, max_hours: {}",
            self.mean_hours, self.median_hours, self.max_hours
        )
    }
}

/// How many complaints carry suspect details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspectInfoKnown {
    pub known: i64,
    pub unknown: u64,
}

impl fmt::Display for SuspectInfoKnown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "known: {}, unknown: {}", self.known, self.unknown)
    }
}

/// Everything the system prompt reports about the dataset.
///
/// Each optional statistic is `None` when its source columns are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetStats {
    pub total_records: usize,
    pub columns: Vec<String>,
    pub crimes_by_borough: Option<ValueCounts>,
    pub crimes_by_category: Option<ValueCounts>,
    pub top_10_offenses: Option<ValueCounts>,
    pub suspect_age_distribution: Option<ValueCounts>,
    pub suspect_race_distribution: Option<ValueCounts>,
    pub suspect_sex_distribution: Option<ValueCounts>,
    pub victim_age_distribution: Option<ValueCounts>,
    pub victim_race_distribution: Option<ValueCounts>,
    pub victim_sex_distribution: Option<ValueCounts>,
    pub crimes_by_time_of_day: Option<ValueCounts>,
    pub felonies_by_time_of_day: Option<ValueCounts>,
    pub top_10_premises: Option<ValueCounts>,
    pub crimes_by_patrol_boro: Option<ValueCounts>,
    pub crimes_by_day_of_week: Option<ValueCounts>,
    pub response_time_stats: Option<ResponseTimeStats>,
    /// Mean severity (1 violation, 2 misdemeanor, 3 felony) per borough, by borough name.
    pub avg_severity_by_borough: Option<Vec<(String, f64)>>,
    pub suspect_info_known: Option<SuspectInfoKnown>,
    /// Missing cells per column, for columns that still have any.
    pub null_counts: ValueCounts,
}

impl DatasetStats {
    /// Compute all statistics in one pass per column.
    #[must_use]
    pub fn compute(dataset: &Dataset) -> Self {
        Self {
            total_records: dataset.len(),
            columns: dataset.columns().to_vec(),
            crimes_by_borough: normalized_counts(dataset, "BORO_NM"),
            crimes_by_category: normalized_counts(dataset, "LAW_CAT_CD"),
            top_10_offenses: normalized_counts(dataset, "OFNS_DESC").map(|c| c.top(10)),
            suspect_age_distribution: raw_counts(dataset, "SUSP_AGE_GROUP"),
            suspect_race_distribution: raw_counts(dataset, "SUSP_RACE"),
            suspect_sex_distribution: raw_counts(dataset, "SUSP_SEX"),
            victim_age_distribution: raw_counts(dataset, "VIC_AGE_GROUP"),
            victim_race_distribution: raw_counts(dataset, "VIC_RACE"),
            victim_sex_distribution: raw_counts(dataset, "VIC_SEX"),
            crimes_by_time_of_day: raw_counts(dataset, "TIME_OF_DAY"),
            felonies_by_time_of_day: felonies_by_time_of_day(dataset),
            top_10_premises: normalized_counts(dataset, "PREM_TYP_DESC").map(|c| c.top(10)),
            crimes_by_patrol_boro: normalized_counts(dataset, "PATROL_BORO"),
            crimes_by_day_of_week: day_of_week_counts(dataset),
            response_time_stats: response_time_stats(dataset),
            avg_severity_by_borough: avg_severity_by_borough(dataset),
            suspect_info_known: suspect_info_known(dataset),
            null_counts: null_counts(dataset),
        }
    }
}

fn normalize(cell: Option<&str>) -> String {
    cell.unwrap_or(MISSING).trim().to_uppercase()
}

fn raw(cell: Option<&str>) -> String {
    cell.unwrap_or(MISSING).to_string()
}

fn normalized_counts(dataset: &Dataset, column: &str) -> Option<ValueCounts> {
    dataset
        .column(column)
        .map(|cells| ValueCounts::tally(cells.map(normalize)))
}

fn raw_counts(dataset: &Dataset, column: &str) -> Option<ValueCounts> {
    dataset
        .column(column)
        .map(|cells| ValueCounts::tally(cells.map(raw)))
}

fn felonies_by_time_of_day(dataset: &Dataset) -> Option<ValueCounts> {
    let categories = dataset.column("LAW_CAT_CD")?;
    let times = dataset.column("TIME_OF_DAY")?;
    let felony_times = categories
        .zip(times)
        .filter(|(category, _)| normalize(*category) == "FELONY")
        .map(|(_, time)| raw(time));
    Some(ValueCounts::tally(felony_times))
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(cell, format).ok())
                .map(|dt| dt.date())
        })
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn day_of_week_counts(dataset: &Dataset) -> Option<ValueCounts> {
    let dates = dataset.column("CMPLNT_FR_DT")?;
    let days = dates
        .flatten()
        .filter_map(parse_date)
        .map(|date| day_name(date.weekday()).to_string());
    Some(ValueCounts::tally(days))
}

/// Numeric value of a cell; unparseable and NaN cells are missing.
fn numeric(cell: Option<&str>) -> Option<f64> {
    cell?.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    }
}

fn response_time_stats(dataset: &Dataset) -> Option<ResponseTimeStats> {
    let mut hours: Vec<f64> = dataset
        .column("RESPONSE_TIME_HRS")?
        .filter_map(numeric)
        .filter(|h| *h >= 0.0)
        .collect();
    if hours.is_empty() {
        return None;
    }
    hours.sort_by(f64::total_cmp);

    Some(ResponseTimeStats {
        mean_hours: round2(mean(&hours)),
        median_hours: round2(median(&hours)),
        max_hours: round2(hours[hours.len() - 1]),
    })
}

fn avg_severity_by_borough(dataset: &Dataset) -> Option<Vec<(String, f64)>> {
    let boroughs = dataset.column("BORO_NM")?;
    let scores = dataset.column("CRIME_SEVERITY_SCORE")?;

    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (borough, score) in boroughs.zip(scores) {
        // Rows without a borough do not form a group.
        let Some(borough) = borough else { continue };
        let entry = groups.entry(borough).or_default();
        if let Some(score) = numeric(score) {
            entry.push(score);
        }
    }

    Some(
        groups
            .into_iter()
            .filter(|(_, scores)| !scores.is_empty())
            .map(|(borough, scores)| (borough.to_string(), round2(mean(&scores))))
            .collect(),
    )
}

fn suspect_info_known(dataset: &Dataset) -> Option<SuspectInfoKnown> {
    let flags: Vec<f64> = dataset
        .column("SUSPECT_INFO_KNOWN")?
        .filter_map(numeric)
        .collect();

    Some(SuspectInfoKnown {
        known: flags.iter().sum::<f64>() as i64,
        unknown: flags.iter().filter(|v| **v == 0.0).count() as u64,
    })
}

fn null_counts(dataset: &Dataset) -> ValueCounts {
    let missing = dataset.columns().iter().flat_map(|name| {
        dataset
            .column(name)
            .into_iter()
            .flatten()
            .filter(Option::is_none)
            .map(move |_| name.clone())
    });
    ValueCounts::tally(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(csv: &str) -> Dataset {
        Dataset::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_borough_counts_are_normalized_and_ordered() {
        let stats = DatasetStats::compute(&dataset(
            "BORO_NM\nbronx\n BRONX \nQUEENS\nBROOKLYN\nBrooklyn\nBronx\n",
        ));

        let boroughs = stats.crimes_by_borough.unwrap();
        assert_eq!(
            boroughs.entries(),
            &[
                ("BRONX".to_string(), 3),
                ("BROOKLYN".to_string(), 2),
                ("QUEENS".to_string(), 1),
            ]
        );
        assert_eq!(stats.total_records, 6);
    }

    #[test]
    fn test_missing_cells_count_as_nan() {
        let stats = DatasetStats::compute(&dataset("BORO_NM,VIC_SEX\nBRONX,\nQUEENS,F\n"));

        assert_eq!(stats.victim_sex_distribution.unwrap().get("nan"), Some(1));
        assert!(stats.crimes_by_category.is_none());
    }

    #[test]
    fn test_top_offenses_truncated_to_ten() {
        let mut csv = String::from("OFNS_DESC\n");
        for i in 0..12 {
            for _ in 0..=i {
                csv.push_str(&format!("offense {i}\n"));
            }
        }
        let offenses = DatasetStats::compute(&dataset(&csv)).top_10_offenses.unwrap();

        assert_eq!(offenses.entries().len(), 10);
        assert_eq!(offenses.entries()[0], ("OFFENSE 11".to_string(), 12));
        assert_eq!(offenses.get("OFFENSE 0"), None);
    }

    #[test]
    fn test_felonies_by_time_of_day() {
        let stats = DatasetStats::compute(&dataset(
            "LAW_CAT_CD,TIME_OF_DAY\nFELONY,Night\nfelony ,Night\nMISDEMEANOR,Night\nFELONY,Morning\n",
        ));

        let felonies = stats.felonies_by_time_of_day.unwrap();
        assert_eq!(felonies.get("Night"), Some(2));
        assert_eq!(felonies.get("Morning"), Some(1));
        assert_eq!(stats.crimes_by_time_of_day.unwrap().get("Night"), Some(3));
    }

    #[test]
    fn test_day_of_week_skips_unparseable_dates() {
        let stats = DatasetStats::compute(&dataset(
            "CMPLNT_FR_DT\n01/05/2025\n2025-01-06\n2025-01-05 13:45:00\nnot a date\n",
        ));

        let days = stats.crimes_by_day_of_week.unwrap();
        assert_eq!(days.get("Sunday"), Some(2));
        assert_eq!(days.get("Monday"), Some(1));
        assert_eq!(days.entries().len(), 2);
    }

    #[test]
    fn test_response_time_ignores_negative_and_garbage() {
        let stats = DatasetStats::compute(&dataset(
            "RESPONSE_TIME_HRS\n1\n2\n-5\nabc\n4\n10\n",
        ));

        assert_eq!(
            stats.response_time_stats,
            Some(ResponseTimeStats {
                mean_hours: 4.25,
                median_hours: 3.0,
                max_hours: 10.0,
            })
        );
    }

    #[test]
    fn test_response_time_absent_without_valid_values() {
        let stats = DatasetStats::compute(&dataset("RESPONSE_TIME_HRS\n-1\nx\n"));
        assert!(stats.response_time_stats.is_none());
    }

    #[test]
    fn test_avg_severity_by_borough() {
        let stats = DatasetStats::compute(&dataset(
            "BORO_NM,CRIME_SEVERITY_SCORE\nBRONX,3\nBRONX,2\nQUEENS,x\nBROOKLYN,1\n,3\n",
        ));

        assert_eq!(
            stats.avg_severity_by_borough.unwrap(),
            vec![("BRONX".to_string(), 2.5), ("BROOKLYN".to_string(), 1.0)]
        );
    }

    #[test]
    fn test_suspect_info_known() {
        let stats = DatasetStats::compute(&dataset("SUSPECT_INFO_KNOWN\n1\n0\n1\n0\n0\n"));

        assert_eq!(
            stats.suspect_info_known,
            Some(SuspectInfoKnown { known: 2, unknown: 3 })
        );
    }

    #[test]
    fn test_null_counts_only_list_columns_with_gaps() {
        let stats = DatasetStats::compute(&dataset(
            "BORO_NM,VIC_SEX,SUSP_SEX\nBRONX,,\nQUEENS,F,\n,M,\n",
        ));

        assert_eq!(
            stats.null_counts.entries(),
            &[
                ("SUSP_SEX".to_string(), 3),
                ("BORO_NM".to_string(), 1),
                ("VIC_SEX".to_string(), 1),
            ]
        );
        assert!(DatasetStats::compute(&dataset("BORO_NM\nBRONX\n")).null_counts.is_empty());
    }

    #[test]
    fn test_value_counts_display() {
        let counts = ValueCounts::tally(["B", "A", "B"].into_iter().map(String::from));
        assert_eq!(counts.to_string(), "B: 2, A: 1");
    }
}
