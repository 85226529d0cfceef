//! Screening verdicts and the candidate rows built from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How well a candidate fits the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitLevel {
    #[serde(rename = "Strong Fit")]
    StrongFit,
    #[serde(rename = "Good Fit")]
    GoodFit,
    #[serde(rename = "Partial Fit")]
    PartialFit,
    #[serde(rename = "Not a Fit")]
    NotAFit,
    /// The profile could not be screened.
    #[serde(rename = "Error")]
    Error,
}

impl FitLevel {
    /// The four verdicts a scoring engine may return.
    pub const VERDICTS: [FitLevel; 4] = [
        FitLevel::StrongFit,
        FitLevel::GoodFit,
        FitLevel::PartialFit,
        FitLevel::NotAFit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitLevel::StrongFit => "Strong Fit",
            FitLevel::GoodFit => "Good Fit",
            FitLevel::PartialFit => "Partial Fit",
            FitLevel::NotAFit => "Not a Fit",
            FitLevel::Error => "Error",
        }
    }
}

impl fmt::Display for FitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitLevel {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        [
            FitLevel::StrongFit,
            FitLevel::GoodFit,
            FitLevel::PartialFit,
            FitLevel::NotAFit,
            FitLevel::Error,
        ]
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| format!("unknown fit level: {s}"))
    }
}

/// A scoring engine's verdict on one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    /// 1..=10 for a real verdict, 0 for the error sentinel.
    pub score: u8,
    pub fit: FitLevel,
    pub summary: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendation: String,
}

impl ScreeningResult {
    /// The sentinel returned when screening fails. Same shape as a real
    /// verdict so a batch can carry on.
    pub fn error(reason: impl fmt::Display) -> Self {
        Self {
            score: 0,
            fit: FitLevel::Error,
            summary: format!("Error screening: {reason}"),
            strengths: Vec::new(),
            gaps: Vec::new(),
            recommendation: "Could not screen".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.fit == FitLevel::Error
    }
}

/// A screening verdict joined with who it is about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenedCandidate {
    pub name: String,
    pub linkedin_url: String,
    #[serde(flatten)]
    pub result: ScreeningResult,
}

impl ScreenedCandidate {
    /// Build from a profile JSON object. `position` is 1-based and only used
    /// when the profile carries no name at all.
    pub fn from_profile(profile: &Value, position: usize, result: ScreeningResult) -> Self {
        Self {
            name: display_name(profile, position),
            linkedin_url: profile_url(profile),
            result,
        }
    }
}

fn field<'a>(profile: &'a Value, key: &str) -> Option<&'a str> {
    profile
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// `"first last"` when either part is set, else `full_name`, else `name`,
/// else `"Profile {position}"`.
pub fn display_name(profile: &Value, position: usize) -> String {
    let first = field(profile, "first_name");
    let last = field(profile, "last_name");
    if first.is_some() || last.is_some() {
        return format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default())
            .trim()
            .to_string();
    }
    field(profile, "full_name")
        .or_else(|| field(profile, "name"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Profile {position}"))
}

/// First non-empty of `public_url`, `linkedin_url`, `linkedin_profile_url`.
pub fn profile_url(profile: &Value) -> String {
    ["public_url", "linkedin_url", "linkedin_profile_url"]
        .iter()
        .find_map(|key| field(profile, key))
        .unwrap_or_default()
        .to_string()
}
