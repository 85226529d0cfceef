//! Benchmarks for projection and the standard filter chain
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic raw export so the benchmark needs no data files.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::{ColumnProjector, FilterConfig, FilterPipeline};
use profile_loader::{Record, Table};

const COMPANIES: [&str; 8] = [
    "Wix", "Monday.com", "Infosys", "Check Point", "Matrix IT", "Intel", "Snyk", "Elbit Systems",
];
const TITLES: [&str; 5] = [
    "Backend Engineer",
    "Senior Software Engineer",
    "Director of Engineering",
    "Team Lead",
    "VP R&D",
];

fn synthetic_raw_table(rows: usize) -> Table {
    let records = (0..rows)
        .map(|i| {
            let mut row = Record::new()
                .with("first_name", format!("First{i}"))
                .with("last_name", format!("Last{i}"))
                .with("job_1_job_title", TITLES[i % TITLES.len()])
                .with("job_1_job_company_name", COMPANIES[i % COMPANIES.len()])
                .with("job_1_job_start_date", format!("01 Jan {}", 2010 + i % 14))
                .with("skill_1_name", "Rust")
                .with("skill_2_name", "Kafka")
                .with("linkedin_url", format!("https://www.linkedin.com/in/person-{i}"));
            for job in 2..=(2 + i % 5) {
                let year = 2000 + job;
                row = row
                    .with(format!("job_{job}_job_title"), "Developer")
                    .with(format!("job_{job}_job_company_name"), COMPANIES[(i + job) % COMPANIES.len()])
                    .with(format!("job_{job}_job_start_date"), format!("01 Jan {year}"))
                    .with(format!("job_{job}_job_end_date"), format!("01 Sep {year}"));
            }
            row
        })
        .collect();
    Table::from_records(records)
}

fn projector() -> ColumnProjector {
    ColumnProjector::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
}

fn bench_projection(c: &mut Criterion) {
    let raw = synthetic_raw_table(2_000);
    let projector = projector();

    c.bench_function("project_2000_profiles", |b| {
        b.iter(|| black_box(projector.project(black_box(&raw))))
    });
}

fn bench_filter_chain(c: &mut Criterion) {
    let table = projector().project(&synthetic_raw_table(2_000));
    let pipeline = FilterPipeline::standard();
    let config = FilterConfig::recommended()
        .with_past_candidates(vec!["First7 Last7".to_string()])
        .with_blacklist(vec!["Snyk".to_string()])
        .with_not_relevant(vec!["Elbit".to_string()]);

    c.bench_function("standard_chain_2000_profiles", |b| {
        b.iter(|| {
            let result = pipeline.apply(black_box(&table), black_box(&config)).unwrap();
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_projection, bench_filter_chain);
criterion_main!(benches);
