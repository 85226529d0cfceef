//! Column projection from raw enrichment exports to the screening schema.
//!
//! Enrichment exports are wide: every job, school and skill gets its own
//! numbered column family (`job_3_job_title`, `edu_2_degree`,
//! `skill_17_name`, ...). Screening works on a fixed, flat schema with the
//! current role broken out and the history folded into readable strings.
//!
//! ## Algorithm
//! For each row:
//! 1. Copy identity and free-text fields
//! 2. Map job index 1 to the current role and compute years in role
//! 3. Fold job indices 2..=19 into `past_positions`, tagging each entry with
//!    its tenure when both dates parse
//! 4. Fold education indices 1..=9 into `education`
//! 5. Join every `skill_<n>_name` column into `skills`

use crate::tenure::role_tenure;
use chrono::{Local, NaiveDate};
use profile_loader::{CellValue, Record, Table};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Columns of the flat screening schema, in output order.
pub const SCREENING_COLUMNS: [&str; 14] = [
    "first_name",
    "last_name",
    "headline",
    "location",
    "summary",
    "current_title",
    "current_company",
    "current_start_date",
    "current_years_in_role",
    "current_description",
    "past_positions",
    "education",
    "skills",
    "public_url",
];

/// Separator between past-position entries.
pub const PAST_POSITIONS_SEPARATOR: &str = " || ";

/// Separator between education entries.
pub const EDUCATION_SEPARATOR: &str = " | ";

/// Describes a numbered column family such as `job_{i}_job_title`.
#[derive(Debug, Clone, Copy)]
pub struct ColumnFamily {
    pub prefix: &'static str,
    pub first: usize,
    pub last: usize,
}

impl ColumnFamily {
    /// Column name for one field at one index.
    pub fn column(&self, index: usize, field: &str) -> String {
        format!("{}_{}_{}", self.prefix, index, field)
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Positions: index 1 is the current role, 2..=19 are history.
pub const JOB_FAMILY: ColumnFamily = ColumnFamily {
    prefix: "job",
    first: 1,
    last: 19,
};

pub const EDUCATION_FAMILY: ColumnFamily = ColumnFamily {
    prefix: "edu",
    first: 1,
    last: 9,
};

const CURRENT_JOB: usize = 1;

const JOB_TITLE: &str = "job_title";
const JOB_COMPANY: &str = "job_company_name";
const JOB_START: &str = "job_start_date";
const JOB_END: &str = "job_end_date";
const JOB_DESCRIPTION: &str = "job_description";

const EDU_SCHOOL: &str = "school_name";
const EDU_DEGREE: &str = "degree";
const EDU_FIELD: &str = "field_of_study";

static SKILL_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^skill_\d+_name$").expect("skill column pattern is valid"));

/// True when `name` is a `skill_<integer>_name` column.
pub fn is_skill_column(name: &str) -> bool {
    SKILL_COLUMN.is_match(name)
}

/// True when the table is a raw export that still needs projecting.
pub fn needs_projection(table: &Table) -> bool {
    table.has_column(&JOB_FAMILY.column(CURRENT_JOB, JOB_TITLE)) && !table.has_column("current_title")
}

/// Projects raw profile tables onto the screening schema.
///
/// The processing date is fixed at construction so that every tenure in one
/// run is computed against the same day.
#[derive(Debug, Clone)]
pub struct ColumnProjector {
    as_of: NaiveDate,
}

impl ColumnProjector {
    /// Create a projector that measures open-ended roles up to `as_of`.
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    /// Create a projector using the local date.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Project a raw table. Tables already in the screening schema are
    /// returned unchanged.
    pub fn project(&self, table: &Table) -> Table {
        if !needs_projection(table) {
            debug!("Table already in screening schema; skipping projection");
            return table.clone();
        }

        let layout = SourceLayout::detect(table);
        let columns = SCREENING_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut projected = Table::new(columns);
        for row in table {
            projected.push(self.project_row(row, &layout));
        }

        debug!(
            "Projected {} rows from {} source columns",
            projected.len(),
            table.columns().len()
        );
        projected
    }

    fn project_row(&self, row: &Record, layout: &SourceLayout) -> Record {
        let mut out = Record::new();

        for field in ["first_name", "last_name", "headline", "location", "summary"] {
            out.insert(field, layout.copy(row, field));
        }

        let current = |field: &str| JOB_FAMILY.column(CURRENT_JOB, field);
        out.insert("current_title", layout.copy(row, &current(JOB_TITLE)));
        out.insert("current_company", layout.copy(row, &current(JOB_COMPANY)));
        out.insert("current_start_date", layout.copy(row, &current(JOB_START)));
        out.insert(
            "current_years_in_role",
            role_tenure(row.get(&current(JOB_START)), &CellValue::Missing, self.as_of),
        );
        out.insert("current_description", layout.copy(row, &current(JOB_DESCRIPTION)));

        out.insert("past_positions", self.past_positions(row, layout));
        out.insert("education", education(row, layout));
        out.insert("skills", skills(row, layout));
        out.insert("public_url", layout.public_url(row));

        out
    }

    fn past_positions(&self, row: &Record, layout: &SourceLayout) -> String {
        let mut positions = Vec::new();
        for i in JOB_FAMILY.indices().filter(|i| *i != CURRENT_JOB) {
            let title_col = JOB_FAMILY.column(i, JOB_TITLE);
            if !layout.has(&title_col) || row.get(&title_col).is_missing() {
                continue;
            }

            let text = |field: &str| row.get(&JOB_FAMILY.column(i, field)).to_string();
            let start = row.get(&JOB_FAMILY.column(i, JOB_START));
            let end = row.get(&JOB_FAMILY.column(i, JOB_END));

            let mut entry = format!(
                "{} at {} ({} - {})",
                text(JOB_TITLE),
                text(JOB_COMPANY),
                start,
                end
            );
            if let Some(years) = role_tenure(start, end, self.as_of) {
                entry.push_str(&format!(" [{:.1} yrs]", years));
            }
            let description = text(JOB_DESCRIPTION);
            if !description.is_empty() {
                entry.push_str(": ");
                entry.push_str(&description);
            }
            positions.push(entry);
        }
        positions.join(PAST_POSITIONS_SEPARATOR)
    }
}

impl Default for ColumnProjector {
    fn default() -> Self {
        Self::today()
    }
}

fn education(row: &Record, layout: &SourceLayout) -> String {
    let mut entries = Vec::new();
    for i in EDUCATION_FAMILY.indices() {
        let school_col = EDUCATION_FAMILY.column(i, EDU_SCHOOL);
        if !layout.has(&school_col) {
            continue;
        }
        let Some(school) = row.text(&school_col) else {
            continue;
        };

        let mut parts = vec![school];
        if let Some(degree) = non_empty(row, &EDUCATION_FAMILY.column(i, EDU_DEGREE)) {
            parts.push(degree);
        }
        if let Some(field) = non_empty(row, &EDUCATION_FAMILY.column(i, EDU_FIELD)) {
            parts.push(format!("in {}", field));
        }
        entries.push(parts.join(", "));
    }
    entries.join(EDUCATION_SEPARATOR)
}

fn skills(row: &Record, layout: &SourceLayout) -> String {
    layout
        .skill_columns
        .iter()
        .filter_map(|col| row.text(col))
        .collect::<Vec<_>>()
        .join(", ")
}

fn non_empty(row: &Record, column: &str) -> Option<String> {
    row.text(column).filter(|s| !s.is_empty())
}

/// What the source table looks like, worked out once per projection.
struct SourceLayout<'a> {
    table: &'a Table,
    skill_columns: Vec<String>,
    url_column: Option<&'static str>,
}

impl<'a> SourceLayout<'a> {
    fn detect(table: &'a Table) -> Self {
        let skill_columns = table
            .columns()
            .iter()
            .filter(|c| is_skill_column(c))
            .cloned()
            .collect();
        let url_column = ["public_url", "linkedin_url"]
            .into_iter()
            .find(|c| table.has_column(c));
        Self {
            table,
            skill_columns,
            url_column,
        }
    }

    fn has(&self, column: &str) -> bool {
        self.table.has_column(column)
    }

    /// Copy a source cell; a column the source lacks becomes an empty string.
    fn copy(&self, row: &Record, column: &str) -> CellValue {
        if self.has(column) {
            row.get(column).clone()
        } else {
            CellValue::text("")
        }
    }

    fn public_url(&self, row: &Record) -> CellValue {
        match self.url_column {
            Some(column) => row.get(column).clone(),
            None => CellValue::text(""),
        }
    }
}
