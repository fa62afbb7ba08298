//! The single acceptance gate for a model reply.
//!
//! Checks that the reply is a JSON object, that every required field is
//! present, and that both scores carry a leading integer in 0–100. On success
//! the input value is returned unchanged; validation never transforms.

use serde_json::Value;

use super::models::score_text;
use super::scoring::leading_digits;
use super::AnalysisError;

/// Fields the model must always return. `RedFlags` and `CompetitiveAdvantage` are optional.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "JD Match",
    "MissingKeywords",
    "Profile Summary",
    "SkillsAlignment",
    "ExperienceMatch",
    "Recommendations",
    "ATSScore",
];

pub const SCORE_FIELDS: [&str; 2] = ["JD Match", "ATSScore"];

/// A model reply, either still as text or already parsed.
#[derive(Debug, Clone)]
pub enum ResultInput<'a> {
    Text(&'a str),
    Parsed(Value),
}

impl<'a> From<&'a str> for ResultInput<'a> {
    fn from(text: &'a str) -> Self {
        ResultInput::Text(text)
    }
}

impl<'a> From<&'a String> for ResultInput<'a> {
    fn from(text: &'a String) -> Self {
        ResultInput::Text(text.as_str())
    }
}

impl From<Value> for ResultInput<'_> {
    fn from(value: Value) -> Self {
        ResultInput::Parsed(value)
    }
}

impl ResultInput<'_> {
    pub fn into_value(self) -> Result<Value, AnalysisError> {
        match self {
            ResultInput::Text(text) => serde_json::from_str(text)
                .map_err(|e| AnalysisError::MalformedJson(e.to_string())),
            ResultInput::Parsed(value) => Ok(value),
        }
    }
}

/// Validates a model reply and returns it unchanged.
pub fn validate<'a>(input: impl Into<ResultInput<'a>>) -> Result<Value, AnalysisError> {
    let value = input.into().into_value()?;

    let object = value
        .as_object()
        .ok_or_else(|| AnalysisError::MalformedJson("expected a JSON object".to_string()))?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
        return Err(AnalysisError::MissingField(missing.to_string()));
    }

    for field in SCORE_FIELDS {
        check_score(field, &object[field])?;
    }

    Ok(value)
}

/// Extracts a score and checks it lies in 0–100.
pub fn check_score(field: &str, value: &Value) -> Result<u32, AnalysisError> {
    let text = score_text(value);

    let Some(digits) = leading_digits(&text) else {
        return Err(AnalysisError::ScoreFormat {
            field: field.to_string(),
            value: text,
        });
    };

    // A digit run too long for u64 is out of range by definition.
    match digits.parse::<u64>() {
        Ok(score) if score <= 100 => Ok(score as u32),
        _ => Err(AnalysisError::ScoreRange {
            field: field.to_string(),
            value: digits.to_string(),
        }),
    }
}
