//! Score extraction and classification shared by the validator, the
//! interactive view and the printable report.
//!
//! Scores arrive as free text such as `"45% - weak alignment"`. The numeric
//! value is the leading run of ASCII digits of the first whitespace-delimited
//! token.

use serde::{Deserialize, Serialize};

/// Sentinel shown when a score is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Returns the leading digit run of the first token, if it starts with a digit.
pub fn leading_digits(score_text: &str) -> Option<&str> {
    let token = score_text.split_whitespace().next()?;
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    (end > 0).then(|| &token[..end])
}

/// Numeric value used for display: `0` for `"N/A"` or text without a leading number.
pub fn display_score(score_text: &str) -> u32 {
    if score_text == NOT_AVAILABLE {
        return 0;
    }
    leading_digits(score_text)
        .and_then(|d| d.parse().ok())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    JobMatch,
    Ats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreClass {
    Good,
    Medium,
    Poor,
}

impl ScoreKind {
    /// `(good, medium)` lower bounds, inclusive.
    pub fn thresholds(self) -> (u32, u32) {
        match self {
            ScoreKind::JobMatch => (70, 50),
            ScoreKind::Ats => (80, 60),
        }
    }

    pub fn classify(self, score: u32) -> ScoreClass {
        let (good, medium) = self.thresholds();
        if score >= good {
            ScoreClass::Good
        } else if score >= medium {
            ScoreClass::Medium
        } else {
            ScoreClass::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreKind::JobMatch => "Job Match Score",
            ScoreKind::Ats => "ATS Optimization Score",
        }
    }

    /// Row label in the printable score table.
    pub fn report_label(self) -> &'static str {
        match self {
            ScoreKind::JobMatch => "Job Description Match",
            ScoreKind::Ats => "ATS Optimization Score",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            ScoreKind::JobMatch => "Overall compatibility with job requirements",
            ScoreKind::Ats => "How well your resume will be parsed by ATS systems",
        }
    }
}

impl ScoreClass {
    /// Status text used in the printable report.
    pub fn report_label(self) -> &'static str {
        match self {
            ScoreClass::Good => "Excellent",
            ScoreClass::Medium => "Good",
            ScoreClass::Poor => "Needs Improvement",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreClass::Good => "green",
            ScoreClass::Medium => "orange",
            ScoreClass::Poor => "red",
        }
    }
}
