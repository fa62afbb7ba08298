use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::action_plan::ActionPlan;
use crate::analysis::scoring::NOT_AVAILABLE;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsAlignment {
    #[serde(rename = "MatchedSkills")]
    pub matched_skills: Vec<String>,
    #[serde(rename = "PartiallyMatched")]
    pub partially_matched: Vec<String>,
    #[serde(rename = "GapAnalysis")]
    pub gap_analysis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceMatch {
    #[serde(rename = "RelevantExperience")]
    pub relevant_experience: String,
    #[serde(rename = "LevelAlignment")]
    pub level_alignment: String,
    #[serde(rename = "IndustryFit")]
    pub industry_fit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(rename = "HighPriority")]
    pub high_priority: Vec<String>,
    #[serde(rename = "MediumPriority")]
    pub medium_priority: Vec<String>,
    #[serde(rename = "KeywordOptimization")]
    pub keyword_optimization: Vec<String>,
    #[serde(rename = "QuantificationOpportunities")]
    pub quantification_opportunities: Vec<String>,
}

/// Typed projection of a validated model reply, used by the presentation layer.
///
/// Built with `from_value`, which never fails: missing or wrongly-typed
/// fields fall back to empty values, and missing scores to `"N/A"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "JD Match")]
    pub jd_match: String,
    #[serde(rename = "ATSScore")]
    pub ats_score: String,
    #[serde(rename = "MissingKeywords")]
    pub missing_keywords: Vec<String>,
    #[serde(rename = "SkillsAlignment")]
    pub skills_alignment: SkillsAlignment,
    #[serde(rename = "ExperienceMatch")]
    pub experience_match: ExperienceMatch,
    #[serde(rename = "Profile Summary")]
    pub profile_summary: String,
    #[serde(rename = "Recommendations")]
    pub recommendations: Recommendations,
    #[serde(rename = "RedFlags")]
    pub red_flags: Vec<String>,
    #[serde(rename = "CompetitiveAdvantage")]
    pub competitive_advantage: String,
}

impl AnalysisResult {
    pub fn from_value(value: &Value) -> Self {
        AnalysisResult {
            jd_match: score_field(value, "JD Match"),
            ats_score: score_field(value, "ATSScore"),
            missing_keywords: string_list(value, &["MissingKeywords"]),
            skills_alignment: SkillsAlignment {
                matched_skills: string_list(value, &["SkillsAlignment", "MatchedSkills"]),
                partially_matched: string_list(value, &["SkillsAlignment", "PartiallyMatched"]),
                gap_analysis: string_field(value, &["SkillsAlignment", "GapAnalysis"]),
            },
            experience_match: ExperienceMatch {
                relevant_experience: string_field(
                    value,
                    &["ExperienceMatch", "RelevantExperience"],
                ),
                level_alignment: string_field(value, &["ExperienceMatch", "LevelAlignment"]),
                industry_fit: string_field(value, &["ExperienceMatch", "IndustryFit"]),
            },
            profile_summary: string_field(value, &["Profile Summary"]),
            recommendations: Recommendations {
                high_priority: string_list(value, &["Recommendations", "HighPriority"]),
                medium_priority: string_list(value, &["Recommendations", "MediumPriority"]),
                keyword_optimization: string_list(
                    value,
                    &["Recommendations", "KeywordOptimization"],
                ),
                quantification_opportunities: string_list(
                    value,
                    &["Recommendations", "QuantificationOpportunities"],
                ),
            },
            red_flags: string_list(value, &["RedFlags"]),
            competitive_advantage: string_field(value, &["CompetitiveAdvantage"]),
        }
    }
}

/// One completed analysis, as held in a session.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// The validated model reply, exactly as accepted.
    pub raw: Value,
    pub result: AnalysisResult,
    pub action_plan: ActionPlan,
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

/// String at `path`, or empty when absent or not a string.
pub(crate) fn string_field(value: &Value, path: &[&str]) -> String {
    lookup(value, path)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// String items of the array at `path`; non-string items are skipped.
pub(crate) fn string_list(value: &Value, path: &[&str]) -> Vec<String> {
    lookup(value, path)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Text form of a score value. Numbers are rendered in decimal.
pub(crate) fn score_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn score_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .map(score_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
