//! # Profile Loader Crate
//!
//! This crate handles loading LinkedIn profile exports into an in-memory
//! table and writing tables back out.
//!
//! ## Main Components
//!
//! - **types**: `CellValue`, `Record` and `Table`
//! - **parser**: CSV/JSON readers and writers, JSON flattening
//! - **reference**: past-candidate and company list loaders
//! - **urls**: LinkedIn URL extraction for enrichment input
//! - **error**: Error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use profile_loader::{read_table, load_company_list};
//! use std::path::Path;
//!
//! let table = read_table(Path::new("exports/candidates.csv"))?;
//! let blacklist = load_company_list(Path::new("lists/blacklist.csv"))?;
//!
//! println!("{} profiles, {} blacklisted companies", table.len(), blacklist.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod reference;
pub mod urls;

// Re-export commonly used types for convenience
pub use error::{LoadError, Result};
pub use types::{CellValue, Record, Table};
pub use parser::{flatten_profile, read_csv, read_json, read_table, write_csv, write_json, write_table};
pub use reference::{load_company_list, load_name_list};
pub use urls::extract_urls;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_creation() {
        let table = Table::new(vec!["first_name".to_string(), "last_name".to_string()]);

        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert!(table.has_column("first_name"));
        assert!(!table.has_column("email"));
    }

    #[test]
    fn test_push_record() {
        let mut table = Table::new(vec!["first_name".to_string()]);

        table.push(Record::new().with("first_name", "Dana"));

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].text("first_name"), Some("Dana".to_string()));
    }

    #[test]
    fn test_record_to_json() {
        let record = Record::new()
            .with("first_name", "Dana")
            .with("current_years_in_role", CellValue::Float(2.5))
            .with("summary", CellValue::Missing);

        let json = record.to_json();

        assert_eq!(json["first_name"], "Dana");
        assert_eq!(json["current_years_in_role"], 2.5);
        assert!(json["summary"].is_null());
    }
}
