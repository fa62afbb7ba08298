//! Action plan: a condensed, prioritized projection of a result.

use serde::{Deserialize, Serialize};

use super::models::{string_field, string_list};
use super::validator::ResultInput;
use super::AnalysisError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    /// `Recommendations.HighPriority`
    pub immediate_actions: Vec<String>,
    /// `Recommendations.KeywordOptimization`
    pub keyword_integration: Vec<String>,
    pub missing_keywords: Vec<String>,
    /// `SkillsAlignment.GapAnalysis`
    pub skill_gaps: String,
    pub red_flags_to_fix: Vec<String>,
    pub competitive_edge: String,
}

/// Derives the action plan. Fails only when given text that is not JSON.
pub fn derive_action_plan<'a>(
    input: impl Into<ResultInput<'a>>,
) -> Result<ActionPlan, AnalysisError> {
    let value = input.into().into_value()?;

    Ok(ActionPlan {
        immediate_actions: string_list(&value, &["Recommendations", "HighPriority"]),
        keyword_integration: string_list(&value, &["Recommendations", "KeywordOptimization"]),
        missing_keywords: string_list(&value, &["MissingKeywords"]),
        skill_gaps: string_field(&value, &["SkillsAlignment", "GapAnalysis"]),
        red_flags_to_fix: string_list(&value, &["RedFlags"]),
        competitive_edge: string_field(&value, &["CompetitiveAdvantage"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::fixtures::sample_result;
    use serde_json::json;

    #[test]
    fn test_fields_are_projected_from_result() {
        let plan = derive_action_plan(sample_result()).unwrap();
        assert_eq!(
            plan.immediate_actions,
            vec!["Add Kubernetes deployments", "Mention Kafka exposure"]
        );
        assert_eq!(plan.keyword_integration, vec!["Use 'event-driven' in summary"]);
        assert_eq!(plan.skill_gaps, "No streaming platform experience.");
        assert_eq!(plan.red_flags_to_fix, vec!["Two-column layout may confuse parsers"]);
        assert_eq!(plan.competitive_edge, "Open-source Rust contributions");
    }

    #[test]
    fn test_missing_keywords_is_identity_projection() {
        let result = sample_result();
        let plan = derive_action_plan(result.clone()).unwrap();
        let expected: Vec<String> = serde_json::from_value(result["MissingKeywords"].clone()).unwrap();
        assert_eq!(plan.missing_keywords, expected);

        let empty = derive_action_plan(json!({"MissingKeywords": []})).unwrap();
        assert!(empty.missing_keywords.is_empty());
    }

    #[test]
    fn test_missing_recommendations_yield_empty_actions() {
        let mut result = sample_result();
        result.as_object_mut().unwrap().remove("Recommendations");
        let plan = derive_action_plan(result).unwrap();
        assert!(plan.immediate_actions.is_empty());
        assert!(plan.keyword_integration.is_empty());
        assert!(!plan.missing_keywords.is_empty());
    }

    #[test]
    fn test_empty_object_yields_default_plan() {
        assert_eq!(derive_action_plan(json!({})).unwrap(), ActionPlan::default());
    }

    #[test]
    fn test_text_input_is_accepted() {
        let text = sample_result().to_string();
        let from_text = derive_action_plan(text.as_str()).unwrap();
        let from_value = derive_action_plan(sample_result()).unwrap();
        assert_eq!(from_text, from_value);
    }

    #[test]
    fn test_unparsable_text_is_malformed_json() {
        let err = derive_action_plan("not json at all").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedJson(_)));
    }

    #[test]
    fn test_non_object_parent_records_are_ignored() {
        let plan = derive_action_plan(json!({
            "Recommendations": "do better",
            "SkillsAlignment": null,
        }))
        .unwrap();
        assert!(plan.immediate_actions.is_empty());
        assert!(plan.skill_gaps.is_empty());
    }
}
