//! System prompt built from the pre-computed statistics.

use std::fmt::{Display, Write};

use super::DatasetStats;

const PREAMBLE: &str = "\
You are a data analyst assistant for the NYPD Sentinel Pilot 2025 crime dataset.
You have been given pre-computed statistics from a cleaned crime complaints CSV file.
Use ONLY the statistics provided below to answer user questions.
Be specific, cite numbers, and give clear insights.
If a question cannot be answered from the available stats, say so honestly.";

const NOT_AVAILABLE: &str = "Not available";
const NO_NULLS: &str = "None";

fn section(out: &mut String, title: &str, value: Option<&dyn Display>) {
    let _ = write!(out, "\n\n=== {title} ===\n");
    match value {
        Some(value) => {
            let _ = write!(out, "{value}");
        }
        None => out.push_str(NOT_AVAILABLE),
    }
}

fn severity_line(averages: &[(String, f64)]) -> String {
    averages
        .iter()
        .map(|(borough, score)| format!("{borough}: {score}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the analyst instructions followed by one section per statistic.
#[must_use]
pub fn build_system_prompt(stats: &DatasetStats) -> String {
    let mut out = String::from(PREAMBLE);

    let _ = write!(
        out,
        "\n\n=== DATASET OVERVIEW ===\nTotal Records: {}\nColumns: {}",
        stats.total_records,
        stats.columns.join(", ")
    );

    let counts = [
        ("CRIMES BY BOROUGH", &stats.crimes_by_borough),
        ("CRIMES BY LEGAL CATEGORY", &stats.crimes_by_category),
        ("TOP 10 OFFENSE TYPES", &stats.top_10_offenses),
        ("CRIMES BY TIME OF DAY", &stats.crimes_by_time_of_day),
        ("FELONIES BY TIME OF DAY", &stats.felonies_by_time_of_day),
        ("TOP 10 PREMISES", &stats.top_10_premises),
        ("CRIMES BY PATROL BOROUGH", &stats.crimes_by_patrol_boro),
        ("SUSPECT AGE", &stats.suspect_age_distribution),
        ("CRIMES BY DAY OF WEEK", &stats.crimes_by_day_of_week),
        ("SUSPECT RACE", &stats.suspect_race_distribution),
        ("SUSPECT SEX", &stats.suspect_sex_distribution),
        ("VICTIM AGE", &stats.victim_age_distribution),
        ("VICTIM RACE", &stats.victim_race_distribution),
        ("VICTIM SEX", &stats.victim_sex_distribution),
    ];
    for (title, value) in counts {
        section(&mut out, title, value.as_ref().map(|v| v as &dyn Display));
    }

    section(
        &mut out,
        "RESPONSE TIME STATS",
        stats.response_time_stats.as_ref().map(|v| v as &dyn Display),
    );

    let severity = stats.avg_severity_by_borough.as_deref().map(severity_line);
    section(
        &mut out,
        "AVG SEVERITY BY BOROUGH (1=Violation 2=Misdemeanor 3=Felony)",
        severity.as_ref().map(|v| v as &dyn Display),
    );

    section(
        &mut out,
        "SUSPECT INFO KNOWN vs UNKNOWN",
        stats.suspect_info_known.as_ref().map(|v| v as &dyn Display),
    );

    let nulls: &dyn Display = if stats.null_counts.is_empty() {
        &NO_NULLS
    } else {
        &stats.null_counts
    };
    section(&mut out, "REMAINING NULL COUNTS", Some(nulls));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Dataset;

    #[test]
    fn test_prompt_reports_available_sections() {
        let dataset = Dataset::from_reader(
            "BORO_NM,LAW_CAT_CD,CRIME_SEVERITY_SCORE\nBRONX,FELONY,3\nQUEENS,VIOLATION,1\nBRONX,MISDEMEANOR,2\n"
                .as_bytes(),
        )
        .unwrap();
        let prompt = build_system_prompt(&DatasetStats::compute(&dataset));

        assert!(prompt.starts_with("You are a data analyst assistant"));
        assert!(prompt.contains("Total Records: 3"));
        assert!(prompt.contains("Columns: BORO_NM, LAW_CAT_CD, CRIME_SEVERITY_SCORE"));
        assert!(prompt.contains("=== CRIMES BY BOROUGH ===\nBRONX: 2, QUEENS: 1"));
        assert!(prompt.contains("BRONX: 2.5, QUEENS: 1"));
    }

    #[test]
    fn test_prompt_marks_missing_sections() {
        let prompt = build_system_prompt(&DatasetStats::default());

        assert!(prompt.contains("=== VICTIM SEX ===\nNot available"));
        assert!(prompt.contains("=== RESPONSE TIME STATS ===\nNot available"));
        assert!(prompt.contains("=== SUSPECT INFO KNOWN vs UNKNOWN ===\nNot available"));
        assert!(prompt.ends_with("=== REMAINING NULL COUNTS ===\nNone"));
    }

    #[test]
    fn test_prompt_lists_remaining_nulls_last() {
        let dataset = Dataset::from_reader("BORO_NM,VIC_SEX\nBRONX,\nQUEENS,F\n".as_bytes()).unwrap();
        let prompt = build_system_prompt(&DatasetStats::compute(&dataset));

        assert!(prompt.ends_with("=== REMAINING NULL COUNTS ===\nVIC_SEX: 1"));
    }
}
