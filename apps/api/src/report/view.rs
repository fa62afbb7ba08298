//! JSON view of a session's current analysis, as returned to interactive clients.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::action_plan::ActionPlan;
use crate::analysis::models::{Analysis, AnalysisResult};
use crate::analysis::scoring::{display_score, ScoreClass, ScoreKind};

const NO_SUMMARY: &str = "No summary available";
const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub session_id: Uuid,
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub scores: Vec<ScoreCard>,
    pub profile_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailsView>,
    pub action_plan: ActionPlan,
    /// Where the printable report can be downloaded.
    pub report_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub kind: ScoreKind,
    pub label: &'static str,
    /// Score text exactly as the model returned it.
    pub raw: String,
    pub value: u32,
    pub display: String,
    pub class: ScoreClass,
    pub color: &'static str,
    pub help: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub skills: SkillsView,
    pub experience: ExperienceView,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<RecommendationGroup>,
    /// Numbered.
    pub red_flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitive_advantage: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillsView {
    pub matched: Vec<String>,
    pub partially_matched: Vec<String>,
    pub gap_analysis: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceView {
    pub relevant_experience: String,
    pub level_alignment: String,
    pub industry_fit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationGroup {
    pub title: &'static str,
    pub items: Vec<String>,
}

impl ScoreCard {
    pub fn new(kind: ScoreKind, raw: &str) -> Self {
        let value = display_score(raw);
        let class = kind.classify(value);
        ScoreCard {
            kind,
            label: kind.label(),
            raw: raw.to_string(),
            value,
            display: format!("{value}%"),
            class,
            color: class.color(),
            help: kind.help(),
        }
    }
}

pub fn report_url(session_id: Uuid) -> String {
    format!("/api/v1/sessions/{session_id}/report")
}

/// Builds the view. Details are included only when `detailed` is set.
pub fn build_view(session_id: Uuid, analysis: &Analysis, detailed: bool) -> AnalysisView {
    let result = &analysis.result;
    AnalysisView {
        session_id,
        analysis_id: analysis.id,
        generated_at: analysis.created_at,
        scores: vec![
            ScoreCard::new(ScoreKind::JobMatch, &result.jd_match),
            ScoreCard::new(ScoreKind::Ats, &result.ats_score),
        ],
        profile_summary: or_default(&result.profile_summary, NO_SUMMARY),
        details: detailed.then(|| details(result)),
        action_plan: analysis.action_plan.clone(),
        report_url: report_url(session_id),
    }
}

fn details(result: &AnalysisResult) -> DetailsView {
    let recs = &result.recommendations;
    let groups = [
        ("High Priority Actions", &recs.high_priority),
        ("Medium Priority Improvements", &recs.medium_priority),
        ("Keyword Optimization Tips", &recs.keyword_optimization),
        ("Add Numbers & Metrics", &recs.quantification_opportunities),
    ];

    DetailsView {
        skills: SkillsView {
            matched: result.skills_alignment.matched_skills.clone(),
            partially_matched: result.skills_alignment.partially_matched.clone(),
            gap_analysis: result.skills_alignment.gap_analysis.clone(),
        },
        experience: ExperienceView {
            relevant_experience: or_default(
                &result.experience_match.relevant_experience,
                NOT_SPECIFIED,
            ),
            level_alignment: or_default(&result.experience_match.level_alignment, NOT_SPECIFIED),
            industry_fit: or_default(&result.experience_match.industry_fit, NOT_SPECIFIED),
        },
        missing_keywords: result.missing_keywords.clone(),
        recommendations: groups
            .into_iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(title, items)| RecommendationGroup {
                title,
                items: numbered(items),
            })
            .collect(),
        red_flags: numbered(&result.red_flags),
        competitive_advantage: Some(result.competitive_advantage.clone())
            .filter(|s| !s.trim().is_empty()),
    }
}

fn numbered(items: &[String]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect()
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
