//! Prompt construction for profile screening.

use serde_json::Value;

/// Build the screening prompt for one profile.
///
/// The profile is pretty-printed so the model sees one field per line.
pub fn screening_prompt(profile: &Value, job_description: &str) -> String {
    let profile_text =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| profile.to_string());

    format!(
        r#"You are a recruiter screening candidates. Evaluate this LinkedIn profile against the job description.

JOB DESCRIPTION:
{job_description}

CANDIDATE PROFILE:
{profile_text}

Provide your assessment in this exact JSON format:
{{
    "score": <1-10 where 10 is perfect match>,
    "fit": "<Strong Fit / Good Fit / Partial Fit / Not a Fit>",
    "summary": "<2-3 sentence summary of the candidate>",
    "strengths": ["<strength 1>", "<strength 2>"],
    "gaps": ["<gap 1>", "<gap 2>"],
    "recommendation": "<Brief recommendation>"
}}

Return ONLY the JSON, no other text."#
    )
}
