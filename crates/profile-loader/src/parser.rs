//! Readers and writers for profile tables.
//!
//! Two upload formats are supported:
//! - CSV exports: header row, one profile per line, blank field = missing
//! - JSON exports: a list of profile objects, flattened one level so nested
//!   objects become `{key}_{sub}` columns

use crate::error::{LoadError, Result};
use crate::types::{CellValue, Record, Table};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Read a table, picking the format from the file extension.
pub fn read_table(path: &Path) -> Result<Table> {
    match extension(path).as_deref() {
        Some("csv") => read_csv(path),
        Some("json") => read_json(path),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Write a table, picking the format from the file extension.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    match extension(path).as_deref() {
        Some("csv") => write_csv(table, path),
        Some("json") => write_json(table, path),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub(crate) fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => LoadError::IoError(e),
    })
}

/// Parse a CSV export.
///
/// Records may be shorter than the header; the trailing columns are missing
/// for that row.
pub fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut table = Table::new(columns.clone());

    for result in reader.records() {
        let record = result?;
        let row: Record = columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.clone(), parse_csv_field(record.get(i))))
            .collect();
        table.push(row);
    }

    debug!(
        "Read {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

fn parse_csv_field(field: Option<&str>) -> CellValue {
    match field {
        Some(s) if !s.is_empty() => CellValue::Text(s.to_string()),
        _ => CellValue::Missing,
    }
}

/// Parse a JSON export: the document must be a list of profile objects.
pub fn read_json(path: &Path) -> Result<Table> {
    let document: serde_json::Value = serde_json::from_reader(open(path)?)?;
    let file = path.display().to_string();

    let items = document.as_array().ok_or_else(|| LoadError::InvalidStructure {
        file: file.clone(),
        reason: "JSON must be a list of profiles".to_string(),
    })?;

    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| LoadError::InvalidStructure {
            file: file.clone(),
            reason: format!("item {} is not an object", idx),
        })?;
        let entries = flatten_entries(object);
        for (column, _) in &entries {
            if seen.insert(column.clone()) {
                columns.push(column.clone());
            }
        }
        records.push(entries.into_iter().collect::<Record>());
    }

    let table = Table::with_rows(columns, records);
    debug!("Read {} profiles from {}", table.len(), path.display());
    Ok(table)
}

/// Flatten one level of nesting.
///
/// - scalar values are kept as cells
/// - nested objects become `{key}_{sub}` columns; their list/object values
///   are stored as JSON text
/// - top-level lists are stored as JSON text
pub fn flatten_profile(object: &serde_json::Map<String, serde_json::Value>) -> Record {
    flatten_entries(object).into_iter().collect()
}

/// Flattened cells in the object's own key order.
fn flatten_entries(object: &serde_json::Map<String, serde_json::Value>) -> Vec<(String, CellValue)> {
    let mut entries = Vec::with_capacity(object.len());
    for (key, value) in object {
        match value {
            serde_json::Value::Object(inner) => {
                for (sub_key, sub_value) in inner {
                    entries.push((format!("{}_{}", key, sub_key), CellValue::from_json(sub_value)));
                }
            }
            other => entries.push((key.clone(), CellValue::from_json(other))),
        }
    }
    entries
}

/// Export a table as CSV, missing cells written as empty fields.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table {
        writer.write_record(table.columns().iter().map(|c| row.get(c).to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Export a table as a pretty-printed JSON list of objects.
pub fn write_json(table: &Table, path: &Path) -> Result<()> {
    let rows: Vec<serde_json::Value> = table
        .iter()
        .map(|row| {
            let object: serde_json::Map<String, serde_json::Value> = table
                .columns()
                .iter()
                .map(|c| (c.clone(), row.get(c).to_json()))
                .collect();
            serde_json::Value::Object(object)
        })
        .collect();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_csv_blank_fields_are_missing() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "profiles.csv",
            "first_name,last_name,job_1_job_title\nDana,,Backend Engineer\nLior,Katz\n",
        );

        let table = read_table(&path).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns().len(), 3);
        assert!(table.rows()[0].get("last_name").is_missing());
        assert_eq!(
            table.rows()[0].text("job_1_job_title"),
            Some("Backend Engineer".to_string())
        );
        // Short record: trailing column is missing
        assert!(table.rows()[1].get("job_1_job_title").is_missing());
    }

    #[test]
    fn test_read_json_flattens_nested_objects() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "profiles.json",
            r#"[{"first_name": "Dana", "linkedin": {"url": "https://linkedin.com/in/dana", "tags": ["a"]}, "skills": ["rust", "go"], "age": null}]"#,
        );

        let table = read_table(&path).unwrap();
        let row = &table.rows()[0];

        assert_eq!(row.text("linkedin_url"), Some("https://linkedin.com/in/dana".to_string()));
        assert_eq!(row.text("linkedin_tags"), Some(r#"["a"]"#.to_string()));
        assert_eq!(row.text("skills"), Some(r#"["rust","go"]"#.to_string()));
        assert!(row.get("age").is_missing());
        assert!(table.has_column("linkedin_url"));
        assert!(!table.has_column("linkedin"));
    }

    #[test]
    fn test_read_json_keeps_source_column_order() {
        let dir = TempDir::new().unwrap();
        let skills: Vec<String> = (1..=11)
            .map(|i| format!(r#""skill_{i}_name": "S{i}""#))
            .collect();
        let path = write_file(
            &dir,
            "profiles.json",
            &format!(r#"[{{"last_name": "Levi", {}, "first_name": "Dana"}}]"#, skills.join(", ")),
        );

        let table = read_table(&path).unwrap();

        let mut expected = vec!["last_name".to_string()];
        expected.extend((1..=11).map(|i| format!("skill_{i}_name")));
        expected.push("first_name".to_string());
        assert_eq!(table.columns(), expected.as_slice());
    }

    #[test]
    fn test_read_json_rejects_non_list() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "profile.json", r#"{"first_name": "Dana"}"#);

        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, LoadError::InvalidStructure { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_table(Path::new("profiles.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = read_table(Path::new("/nonexistent/profiles.csv")).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_csv_export_reads_back() {
        let dir = TempDir::new().unwrap();
        let table = Table::from_records(vec![
            Record::new()
                .with("first_name", "Dana")
                .with("current_years_in_role", CellValue::Float(4.0)),
            Record::new().with("first_name", "Lior"),
        ]);
        let path = dir.path().join("out.csv");

        write_csv(&table, &path).unwrap();
        let back = read_csv(&path).unwrap();

        assert_eq!(back.rows()[0].text("current_years_in_role"), Some("4.0".to_string()));
        assert!(back.rows()[1].get("current_years_in_role").is_missing());
    }
}
