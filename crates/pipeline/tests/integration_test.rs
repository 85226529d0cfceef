//! Integration tests for the pipeline.
//!
//! These tests verify that projection and the standard filter chain work
//! together on a realistic raw export.

use chrono::NaiveDate;
use pipeline::filters::*;
use pipeline::{ColumnProjector, Filter, FilterConfig, FilterPipeline};
use profile_loader::{CellValue, Record, Table};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn raw_profile(first: &str, last: &str, title: &str, company: &str, start: &str) -> Record {
    Record::new()
        .with("first_name", first)
        .with("last_name", last)
        .with("headline", format!("{title} at {company}"))
        .with("job_1_job_title", title)
        .with("job_1_job_company_name", company)
        .with("job_1_job_start_date", start)
        .with("linkedin_url", format!("https://www.linkedin.com/in/{}", first.to_lowercase()))
}

fn with_past_job(row: Record, index: usize, company: &str, start: &str, end: &str) -> Record {
    row.with(format!("job_{index}_job_title"), "Developer")
        .with(format!("job_{index}_job_company_name"), company)
        .with(format!("job_{index}_job_start_date"), start)
        .with(format!("job_{index}_job_end_date"), end)
}

fn create_test_setup() -> Table {
    let dana = raw_profile("Dana", "Levi", "Backend Engineer", "Wix", "01 Jan 2020");
    let noa = raw_profile("Noa", "Katz", "Software Engineer", "Infosys Ltd", "01 Jan 2021");
    let hopper = with_past_job(
        with_past_job(
            raw_profile("Omer", "Peretz", "Engineer", "Monday.com", "01 Jan 2022"),
            2,
            "Fiverr",
            "01 Jan 2021",
            "01 Jul 2021",
        ),
        3,
        "Gong",
        "01 Jan 2020",
        "01 Oct 2020",
    );
    let veteran = raw_profile("Yael", "Mor", "Engineer", "Intel", "01 Jan 2010");
    let director = raw_profile("Avi", "Shani", "Director of R&D", "Check Point", "01 Jan 2019");
    let senior_manager =
        raw_profile("Tal", "Roth", "Senior Engineering Manager", "Check Point", "01 Jan 2019");
    let undated = raw_profile("Gil", "Bar", "Engineer", "Snyk", "sometime in 2019");
    let past_elbit = with_past_job(
        raw_profile("Ron", "Adler", "Engineer", "Taboola", "01 Jan 2020"),
        2,
        "Elbit Systems",
        "01 Jan 2015",
        "01 Jan 2019",
    );

    ColumnProjector::new(as_of()).project(&Table::from_records(vec![
        dana,
        noa,
        hopper,
        veteran,
        director,
        senior_manager,
        undated,
        past_elbit,
    ]))
}

fn first_names(table: &Table) -> Vec<String> {
    table
        .iter()
        .map(|row| row.text("first_name").unwrap_or_default())
        .collect()
}

#[test]
fn test_full_pipeline() {
    let table = create_test_setup();
    let config = FilterConfig::recommended()
        .with_past_candidates(vec!["Dana Levi".to_string()])
        .with_not_relevant(vec!["Elbit".to_string()]);

    let (kept, stats) = FilterPipeline::standard().apply(&table, &config).unwrap();

    assert_eq!(first_names(&kept), vec!["Tal", "Gil"]);
    assert_eq!(stats.original, 8);
    assert_eq!(stats.removed_by("past_candidates"), Some(1));
    assert_eq!(stats.removed_by("blacklist"), None);
    assert_eq!(stats.removed_by("not_relevant_current"), Some(0));
    assert_eq!(stats.removed_by("not_relevant_past"), Some(1));
    assert_eq!(stats.removed_by("job_hoppers"), Some(1));
    assert_eq!(stats.removed_by("consulting"), Some(1));
    assert_eq!(stats.removed_by("long_tenure"), Some(1));
    assert_eq!(stats.removed_by("management_titles"), Some(1));
    assert_eq!(stats.final_count, 2);
}

#[test]
fn test_removals_sum_to_total() {
    let table = create_test_setup();
    let config = FilterConfig::recommended()
        .with_past_candidates(vec!["noa katz".to_string()])
        .with_blacklist(vec!["wix".to_string(), "snyk".to_string()]);

    let (kept, stats) = FilterPipeline::standard().apply(&table, &config).unwrap();

    let sum: usize = stats.stages.iter().map(|s| s.removed).sum();
    assert_eq!(sum, stats.original - stats.final_count);
    assert_eq!(stats.total_removed, sum);
    assert_eq!(kept.len(), stats.final_count);
}

#[test]
fn test_all_disabled_keeps_everything() {
    let table = create_test_setup();

    let (kept, stats) = FilterPipeline::standard()
        .apply(&table, &FilterConfig::default())
        .unwrap();

    assert_eq!(kept, table);
    assert!(stats.stages.is_empty());
    assert_eq!(stats.final_count, stats.original);
    assert_eq!(
        serde_json::to_value(&stats).unwrap(),
        serde_json::json!({"original": 8, "final": 8, "total_removed": 0})
    );
}

#[test]
fn test_projection_is_idempotent() {
    let projected = create_test_setup();
    let again = ColumnProjector::new(as_of()).project(&projected);
    assert_eq!(again, projected);
}

#[test]
fn test_projected_tenure_and_history() {
    let table = create_test_setup();
    let dana = &table.rows()[0];
    let hopper = &table.rows()[2];
    let undated = &table.rows()[6];

    assert_eq!(dana.get("current_years_in_role"), &CellValue::Float(4.0));
    assert!(undated.get("current_years_in_role").is_missing());
    assert_eq!(
        hopper.text("past_positions"),
        Some(
            "Developer at Fiverr (01 Jan 2021 - 01 Jul 2021) [0.5 yrs] || \
             Developer at Gong (01 Jan 2020 - 01 Oct 2020) [0.8 yrs]"
                .to_string()
        )
    );
}

#[test]
fn test_management_keep_words() {
    let table = create_test_setup();
    let mut config = FilterConfig::new();
    config.filter_management = true;

    let (kept, removed) = ManagementTitlesFilter.apply(&table, &config).unwrap();

    assert_eq!(removed, 1);
    assert!(first_names(&kept).contains(&"Tal".to_string()));
    assert!(!first_names(&kept).contains(&"Avi".to_string()));
}

#[test]
fn test_company_match_is_containment_both_ways() {
    let table = Table::from_records(vec![
        Record::new().with("current_company", "Infosys Ltd"),
        Record::new().with("current_company", "IT"),
        Record::new().with("current_company", "Tel Aviv University"),
    ]);
    let config = FilterConfig::new().with_blacklist(vec!["infosys".to_string(), "ab".to_string()]);

    let (kept, removed) = BlacklistFilter.apply(&table, &config).unwrap();

    assert_eq!(removed, 1);
    assert_eq!(kept.len(), 2);
}

#[test]
fn test_missing_tenure_survives_long_tenure() {
    let table = create_test_setup();
    let mut config = FilterConfig::new();
    config.filter_long_tenure = true;

    let (kept, removed) = LongTenureFilter.apply(&table, &config).unwrap();

    assert_eq!(removed, 1);
    assert!(first_names(&kept).contains(&"Gil".to_string()));
    assert!(!first_names(&kept).contains(&"Yael".to_string()));
}

#[test]
fn test_json_export_skills_keep_source_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("export.json");
    let skills: Vec<String> = (1..=11)
        .map(|i| format!(r#""skill_{i}_name": "S{i}""#))
        .collect();
    std::fs::write(
        &path,
        format!(
            r#"[{{"first_name": "Dana", "job_1_job_title": "Engineer", {}}}]"#,
            skills.join(", ")
        ),
    )
    .unwrap();

    let raw = profile_loader::read_table(&path).unwrap();
    let projected = ColumnProjector::new(as_of()).project(&raw);

    assert_eq!(
        projected.rows()[0].text("skills"),
        Some("S1, S2, S3, S4, S5, S6, S7, S8, S9, S10, S11".to_string())
    );
}
