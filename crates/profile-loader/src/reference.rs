//! Loaders for the reference lists that feed the exclusion filters.
//!
//! Recruiters maintain these as small spreadsheets:
//! - past candidates: a CSV with a `Name` column
//! - blacklisted / not-relevant companies: a CSV whose first column holds
//!   company names (the header row is skipped)
//!
//! Values are returned verbatim; case folding and trimming belong to the
//! filters that consume them.

use crate::error::Result;
use crate::parser::open;
use std::path::Path;
use tracing::{debug, warn};

/// Column that holds candidate names in a past-candidates export.
pub const NAME_COLUMN: &str = "Name";

/// Load the first column of a company list, skipping blank cells.
pub fn load_company_list(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);

    let mut companies = Vec::new();
    for result in reader.records() {
        let record = result?;
        if let Some(value) = record.get(0) {
            if !value.trim().is_empty() {
                companies.push(value.to_string());
            }
        }
    }

    debug!("Loaded {} companies from {}", companies.len(), path.display());
    Ok(companies)
}

/// Load the `Name` column of a past-candidates export.
///
/// Returns `Ok(None)` when the file has no `Name` column, which leaves the
/// past-candidates filter switched off rather than failing the run.
pub fn load_name_list(path: &Path) -> Result<Option<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);

    let Some(name_idx) = reader.headers()?.iter().position(|h| h == NAME_COLUMN) else {
        warn!(
            "{} has no '{}' column; past-candidates filter disabled",
            path.display(),
            NAME_COLUMN
        );
        return Ok(None);
    };

    let mut names = Vec::new();
    for result in reader.records() {
        let record = result?;
        if let Some(name) = record.get(name_idx) {
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }

    debug!("Loaded {} past candidates from {}", names.len(), path.display());
    Ok(Some(names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_company_list_uses_first_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blacklist.csv");
        fs::write(&path, "Company,Reason\nInfosys,outsourcing\n,\nWix,poached\n").unwrap();

        let companies = load_company_list(&path).unwrap();

        assert_eq!(companies, vec!["Infosys".to_string(), "Wix".to_string()]);
    }

    #[test]
    fn test_name_list_reads_name_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("past.csv");
        fs::write(&path, "Date,Name\n2024-01-02,Dana Levi\n2024-02-03,\n").unwrap();

        let names = load_name_list(&path).unwrap();

        assert_eq!(names, Some(vec!["Dana Levi".to_string()]));
    }

    #[test]
    fn test_name_list_without_name_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("past.csv");
        fs::write(&path, "Candidate\nDana Levi\n").unwrap();

        assert_eq!(load_name_list(&path).unwrap(), None);
    }
}
