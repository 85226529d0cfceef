//! Screening results, ranked, with CSV and JSON exports.

use anyhow::{Context, Result};
use screening_client::{FitLevel, ScreenedCandidate};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Separator for strengths and gaps in CSV cells.
pub const LIST_SEPARATOR: &str = "; ";

const CSV_HEADER: [&str; 8] = [
    "name",
    "linkedin_url",
    "score",
    "fit",
    "summary",
    "strengths",
    "gaps",
    "recommendation",
];

/// Screened candidates, best score first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreeningReport {
    candidates: Vec<ScreenedCandidate>,
}

impl ScreeningReport {
    /// Rank candidates by score, highest first. Ties keep screening order.
    pub fn new(mut candidates: Vec<ScreenedCandidate>) -> Self {
        candidates.sort_by(|a, b| b.result.score.cmp(&a.result.score));
        Self { candidates }
    }

    pub fn candidates(&self) -> &[ScreenedCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Only the candidates whose fit is in `levels`, still ranked.
    pub fn with_fits(&self, levels: &[FitLevel]) -> ScreeningReport {
        Self {
            candidates: self
                .candidates
                .iter()
                .filter(|c| levels.contains(&c.result.fit))
                .cloned()
                .collect(),
        }
    }

    pub fn count_fit(&self, level: FitLevel) -> usize {
        self.candidates.iter().filter(|c| c.result.fit == level).count()
    }

    /// e.g. `Screened 5 candidates: 1 Strong Fit, 2 Good Fit, 1 Partial Fit, 0 Not a Fit, 1 errors`
    pub fn summary_line(&self) -> String {
        let verdicts: Vec<String> = FitLevel::VERDICTS
            .iter()
            .map(|level| format!("{} {}", self.count_fit(*level), level))
            .collect();
        format!(
            "Screened {} candidates: {}, {} errors",
            self.len(),
            verdicts.join(", "),
            self.count_fit(FitLevel::Error)
        )
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer.write_record(CSV_HEADER)?;
        for candidate in &self.candidates {
            let result = &candidate.result;
            let score = result.score.to_string();
            let strengths = result.strengths.join(LIST_SEPARATOR);
            let gaps = result.gaps.join(LIST_SEPARATOR);
            writer.write_record([
                candidate.name.as_str(),
                candidate.linkedin_url.as_str(),
                score.as_str(),
                result.fit.as_str(),
                result.summary.as_str(),
                strengths.as_str(),
                gaps.as_str(),
                result.recommendation.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.candidates)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Export by extension: `.json` writes JSON, anything else CSV.
    pub fn write(&self, path: &Path) -> Result<()> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => self.write_json(path),
            _ => self.write_csv(path),
        }
    }
}
