//! Text matching rules shared by the exclusion filters.
//!
//! Matching is deliberately literal: lowercase, trim, substring. "Infosys Ltd"
//! matches "infosys" and so does "Sela" match "sela group", but there is no
//! tokenizing or fuzzy scoring.

/// Lowercase and trim list entries, dropping ones that end up blank.
///
/// A blank entry would be a substring of every company name.
pub fn normalize_list<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.as_ref().trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Two-way containment between a company name and any normalized entry.
///
/// Missing or blank company names never match.
pub fn company_matches(company: Option<&str>, entries: &[String]) -> bool {
    let Some(company) = company else {
        return false;
    };
    let company = company.trim().to_lowercase();
    if company.is_empty() {
        return false;
    }
    entries
        .iter()
        .any(|entry| company.contains(entry.as_str()) || entry.contains(company.as_str()))
}

/// One-way search: does the text contain any normalized entry?
pub fn text_contains_any(text: Option<&str>, entries: &[String]) -> bool {
    let Some(text) = text else {
        return false;
    };
    if text.trim().is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    entries.iter().any(|entry| text.contains(entry.as_str()))
}
