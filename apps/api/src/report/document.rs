//! Printable report layout: turns an analysis into an ordered list of blocks.
//!
//! The block list is independent of the PDF backend so section order, table
//! contents and status labels can be checked without rendering.

use chrono::NaiveDateTime;

use crate::analysis::action_plan::ActionPlan;
use crate::analysis::models::AnalysisResult;
use crate::analysis::scoring::{display_score, ScoreKind};

pub const REPORT_TITLE: &str = "ATS Resume Analysis Report";
const NOT_SPECIFIED: &str = "Not specified";
const BULLET: &str = "•";

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column widths in points.
    pub column_widths: Vec<f32>,
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Heading(String),
    Subheading(String),
    Paragraph(String),
    ListItem { marker: String, text: String },
    Table(Table),
    /// Vertical gap in points.
    Spacer(f32),
    PageBreak,
    Footer(String),
}

/// Builds the full report. The action plan starts on a new page.
pub fn build_report(
    result: &AnalysisResult,
    action_plan: Option<&ActionPlan>,
    generated_at: NaiveDateTime,
) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title(REPORT_TITLE.to_string()),
        Block::Subtitle(format!(
            "Generated on: {}",
            generated_at.format("%B %d, %Y at %I:%M %p")
        )),
        Block::Spacer(20.0),
    ];

    blocks.push(Block::Heading("Executive Summary".to_string()));
    blocks.push(Block::Paragraph(non_empty_or(
        &result.profile_summary,
        "No summary available",
    )));
    blocks.push(Block::Spacer(15.0));

    blocks.push(Block::Heading("Score Summary".to_string()));
    blocks.push(Block::Table(score_table(result)));
    blocks.push(Block::Spacer(20.0));

    push_skills(&mut blocks, result);
    push_experience(&mut blocks, result);

    if !result.missing_keywords.is_empty() {
        blocks.push(Block::Heading("Missing Keywords".to_string()));
        blocks.push(Block::Paragraph(
            "The following keywords should be added to improve your resume's ATS compatibility:"
                .to_string(),
        ));
        push_bullets(&mut blocks, &result.missing_keywords);
        blocks.push(Block::Spacer(15.0));
    }

    push_recommendations(&mut blocks, result);

    if !result.red_flags.is_empty() {
        blocks.push(Block::Heading("Red Flags to Address".to_string()));
        blocks.push(Block::Paragraph(
            "The following issues might cause automatic rejection and should be addressed immediately:"
                .to_string(),
        ));
        push_bullets(&mut blocks, &result.red_flags);
        blocks.push(Block::Spacer(15.0));
    }

    if !result.competitive_advantage.trim().is_empty() {
        blocks.push(Block::Heading("Your Competitive Edge".to_string()));
        blocks.push(Block::Paragraph(result.competitive_advantage.clone()));
        blocks.push(Block::Spacer(15.0));
    }

    if let Some(plan) = action_plan {
        push_action_plan(&mut blocks, plan);
    }

    blocks.push(Block::Spacer(30.0));
    blocks.push(Block::Footer(
        "This report was generated by Smart ATS Resume Analyzer".to_string(),
    ));
    blocks.push(Block::Footer(
        "For best results, implement recommendations systematically and re-analyze your updated resume."
            .to_string(),
    ));

    blocks
}

/// Header plus one row per score: metric, "N%", status label.
pub fn score_table(result: &AnalysisResult) -> Table {
    let row = |kind: ScoreKind, text: &str| {
        let score = display_score(text);
        vec![
            kind.report_label().to_string(),
            format!("{score}%"),
            kind.classify(score).report_label().to_string(),
        ]
    };

    Table {
        column_widths: vec![180.0, 72.0, 108.0],
        header: Some(vec![
            "Metric".to_string(),
            "Score".to_string(),
            "Status".to_string(),
        ]),
        rows: vec![
            row(ScoreKind::JobMatch, &result.jd_match),
            row(ScoreKind::Ats, &result.ats_score),
        ],
    }
}

fn push_skills(blocks: &mut Vec<Block>, result: &AnalysisResult) {
    let skills = &result.skills_alignment;
    if skills.matched_skills.is_empty()
        && skills.partially_matched.is_empty()
        && skills.gap_analysis.trim().is_empty()
    {
        return;
    }

    blocks.push(Block::Heading("Skills Analysis".to_string()));
    if !skills.matched_skills.is_empty() {
        blocks.push(Block::Subheading("Well-Matched Skills:".to_string()));
        blocks.push(Block::Paragraph(skills.matched_skills.join(", ")));
        blocks.push(Block::Spacer(8.0));
    }
    if !skills.partially_matched.is_empty() {
        blocks.push(Block::Subheading("Partially Matched Skills:".to_string()));
        blocks.push(Block::Paragraph(skills.partially_matched.join(", ")));
        blocks.push(Block::Spacer(8.0));
    }
    if !skills.gap_analysis.trim().is_empty() {
        blocks.push(Block::Subheading("Skill Gap Analysis:".to_string()));
        blocks.push(Block::Paragraph(skills.gap_analysis.clone()));
    }
    blocks.push(Block::Spacer(15.0));
}

fn push_experience(blocks: &mut Vec<Block>, result: &AnalysisResult) {
    let exp = &result.experience_match;
    if [&exp.relevant_experience, &exp.level_alignment, &exp.industry_fit]
        .iter()
        .all(|s| s.trim().is_empty())
    {
        return;
    }

    blocks.push(Block::Heading("Experience Analysis".to_string()));
    blocks.push(Block::Table(Table {
        column_widths: vec![129.6, 266.4],
        header: Some(vec!["Aspect".to_string(), "Assessment".to_string()]),
        rows: vec![
            vec![
                "Relevant Experience".to_string(),
                non_empty_or(&exp.relevant_experience, NOT_SPECIFIED),
            ],
            vec![
                "Level Alignment".to_string(),
                non_empty_or(&exp.level_alignment, NOT_SPECIFIED),
            ],
            vec![
                "Industry Fit".to_string(),
                non_empty_or(&exp.industry_fit, NOT_SPECIFIED),
            ],
        ],
    }));
    blocks.push(Block::Spacer(15.0));
}

fn push_recommendations(blocks: &mut Vec<Block>, result: &AnalysisResult) {
    let recs = &result.recommendations;
    let sections = [
        ("High Priority Actions:", &recs.high_priority),
        ("Medium Priority Improvements:", &recs.medium_priority),
        ("Keyword Optimization Tips:", &recs.keyword_optimization),
        ("Quantification Opportunities:", &recs.quantification_opportunities),
    ];
    if sections.iter().all(|(_, items)| items.is_empty()) {
        return;
    }

    blocks.push(Block::Heading("Improvement Recommendations".to_string()));
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        blocks.push(Block::Subheading(title.to_string()));
        for (i, item) in items.iter().enumerate() {
            blocks.push(Block::ListItem {
                marker: format!("{}.", i + 1),
                text: item.clone(),
            });
        }
        blocks.push(Block::Spacer(10.0));
    }
    blocks.push(Block::Spacer(5.0));
}

fn push_action_plan(blocks: &mut Vec<Block>, plan: &ActionPlan) {
    blocks.push(Block::PageBreak);
    blocks.push(Block::Heading("Action Plan".to_string()));

    if !plan.immediate_actions.is_empty() {
        blocks.push(Block::Subheading(
            "Immediate Actions (Do This First):".to_string(),
        ));
        push_bullets(blocks, &plan.immediate_actions);
        blocks.push(Block::Spacer(10.0));
    }

    if !plan.missing_keywords.is_empty() {
        blocks.push(Block::Subheading("Keywords to Integrate:".to_string()));
        blocks.push(Block::Paragraph(plan.missing_keywords.join(", ")));
        blocks.push(Block::Spacer(10.0));
    }

    if !plan.red_flags_to_fix.is_empty() {
        blocks.push(Block::Subheading("Critical Issues to Fix:".to_string()));
        push_bullets(blocks, &plan.red_flags_to_fix);
    }
}

fn push_bullets(blocks: &mut Vec<Block>, items: &[String]) {
    blocks.extend(items.iter().map(|item| Block::ListItem {
        marker: BULLET.to_string(),
        text: item.clone(),
    }));
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
