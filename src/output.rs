//! The structured critique returned by the analysis service.
//!
//! Field names follow the JSON contract embedded in the prompt
//! (camelCase on the wire). Parsing is all-or-nothing: serde enforces field
//! presence and types, then [`AnalysisResult::validate`] checks the value
//! constraints serde cannot express.

use crate::error::ResumeLensError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A complete resume critique for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Overall score, 0–100.
    #[serde(deserialize_with = "whole_number")]
    pub score: u32,
    pub overview: String,
    pub strengths: Vec<String>,
    pub skills: Skills,
    pub missing: Vec<MissingSection>,
    pub improvements: Vec<Improvement>,
    pub role_alignment: RoleAlignment,
    pub action_plan: Vec<String>,
}

/// Skills grouped into the four fixed buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub databases: Vec<String>,
    pub other: Vec<String>,
}

impl Skills {
    /// Buckets in display order, paired with their headings.
    pub fn buckets(&self) -> [(&'static str, &[String]); 4] {
        [
            ("Languages", &self.languages),
            ("Frameworks", &self.frameworks),
            ("Databases", &self.databases),
            ("Other", &self.other),
        ]
    }
}

/// A resume section that is absent or weak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSection {
    pub name: String,
    pub importance: String,
}

/// One WHAT / WHY / HOW recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    pub recommendation: String,
    pub reason: String,
    pub action: String,
}

/// Fit of the candidate for the requested role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAlignment {
    pub match_level: MatchLevel,
    pub gaps: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Coarse alignment rating between candidate and role.
///
/// Parsed case-insensitively; any other value is a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MatchLevel {
    Low,
    Medium,
    High,
}

impl TryFrom<String> for MatchLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "unknown match level '{value}' (expected Low, Medium or High)"
            )),
        }
    }
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// Accept `85` as well as `85.0`; models are loose about JSON number types.
fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(v) = n.as_u64() {
        return u32::try_from(v).map_err(|_| D::Error::custom(format!("score {v} is too large")));
    }
    match n.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(D::Error::custom(format!(
            "score must be a non-negative integer, got {n}"
        ))),
    }
}

impl AnalysisResult {
    /// Parse and validate the JSON text produced by the service.
    pub fn from_json(text: &str) -> Result<Self, ResumeLensError> {
        let result: Self =
            serde_json::from_str(text).map_err(|e| ResumeLensError::MalformedResponse {
                detail: e.to_string(),
            })?;
        result.validate()?;
        Ok(result)
    }

    /// Check the constraints that serde's type mapping does not cover.
    pub fn validate(&self) -> Result<(), ResumeLensError> {
        if self.score > 100 {
            return Err(ResumeLensError::SchemaViolation {
                field: "score".into(),
                problem: format!("must be between 0 and 100, got {}", self.score),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample_json() -> &'static str {
        r#"{
            "score": 72,
            "overview": "Backend engineer with 4 years of Rust and Go.",
            "strengths": ["Shipped a payments service", "Strong systems background"],
            "skills": {
                "languages": ["Rust", "Go"],
                "frameworks": ["Axum"],
                "databases": ["PostgreSQL"],
                "other": ["Kubernetes"]
            },
            "missing": [{"name": "Projects", "importance": "Shows initiative"}],
            "improvements": [{
                "recommendation": "Quantify impact",
                "reason": "Recruiters skim for numbers",
                "action": "Add latency and revenue figures"
            }],
            "roleAlignment": {
                "matchLevel": "Medium",
                "gaps": ["No frontend work"],
                "suggestions": ["Add a React side project"]
            },
            "actionPlan": ["Rewrite summary", "Add metrics", "Add projects section"]
        }"#
    }

    #[test]
    fn parses_full_document() {
        let r = AnalysisResult::from_json(sample_json()).expect("valid");
        assert_eq!(r.score, 72);
        assert_eq!(r.skills.languages, vec!["Rust", "Go"]);
        assert_eq!(r.missing[0].name, "Projects");
        assert_eq!(r.improvements[0].action, "Add latency and revenue figures");
        assert_eq!(r.role_alignment.match_level, MatchLevel::Medium);
        assert_eq!(r.action_plan.len(), 3);
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let r = AnalysisResult::from_json(sample_json()).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("roleAlignment").is_some());
        assert!(v.get("actionPlan").is_some());
        assert_eq!(v["roleAlignment"]["matchLevel"], "Medium");
    }

    #[test]
    fn accepts_whole_float_score() {
        let text = sample_json().replace("\"score\": 72", "\"score\": 72.0");
        assert_eq!(AnalysisResult::from_json(&text).unwrap().score, 72);
    }

    #[test]
    fn rejects_fractional_score() {
        let text = sample_json().replace("\"score\": 72", "\"score\": 72.5");
        let err = AnalysisResult::from_json(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
    }

    #[test]
    fn rejects_out_of_range_score() {
        let text = sample_json().replace("\"score\": 72", "\"score\": 140");
        let err = AnalysisResult::from_json(&text).unwrap_err();
        assert!(matches!(err, ResumeLensError::SchemaViolation { ref field, .. } if field == "score"));
    }

    #[test]
    fn blank_overview_is_accepted() {
        let text = sample_json().replace(
            "\"Backend engineer with 4 years of Rust and Go.\"",
            "\"\"",
        );
        let r = AnalysisResult::from_json(&text).expect("empty overview is still valid");
        assert!(r.overview.is_empty());
    }

    #[test]
    fn rejects_missing_section() {
        let mut v: serde_json::Value = serde_json::from_str(sample_json()).unwrap();
        v.as_object_mut().unwrap().remove("actionPlan");
        let err = AnalysisResult::from_json(&v.to_string()).unwrap_err();
        assert!(matches!(err, ResumeLensError::MalformedResponse { .. }));
        assert!(err.to_string().contains("actionPlan"), "got: {err}");
    }

    #[test]
    fn rejects_wrong_type() {
        let text = sample_json().replace(
            "\"strengths\": [\"Shipped a payments service\", \"Strong systems background\"]",
            "\"strengths\": \"Shipped a payments service\"",
        );
        assert_eq!(
            AnalysisResult::from_json(&text).unwrap_err().kind(),
            ErrorKind::ResponseFormat
        );
    }

    #[test]
    fn match_level_case_insensitive() {
        let text = sample_json().replace("\"Medium\"", "\"HIGH\"");
        let r = AnalysisResult::from_json(&text).unwrap();
        assert_eq!(r.role_alignment.match_level, MatchLevel::High);
        assert_eq!(r.role_alignment.match_level.to_string(), "High");
    }

    #[test]
    fn unknown_match_level_rejected() {
        let text = sample_json().replace("\"Medium\"", "\"Excellent\"");
        let err = AnalysisResult::from_json(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
    }

    #[test]
    fn skills_buckets_in_display_order() {
        let r = AnalysisResult::from_json(sample_json()).unwrap();
        let names: Vec<_> = r.skills.buckets().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["Languages", "Frameworks", "Databases", "Other"]);
    }
}
