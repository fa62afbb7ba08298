// Prompt contract for the resume analysis call.
// The template is static; the only variable parts are the resume text and
// the job description, which are inserted verbatim (after trimming).

use super::AnalysisError;

/// Expert persona and task framing. Precedes the resume text.
pub const ANALYSIS_PERSONA: &str = "\
Act as a senior ATS (Applicant Tracking System) specialist and career consultant with 15+ years of experience in:
- Technical recruitment and talent acquisition
- Software engineering, DevOps, and cloud technologies
- Data science, machine learning, and AI
- Data analysis and business intelligence
- Big data engineering and distributed systems
- Product management and technical leadership

You understand how modern ATS systems work, including keyword matching algorithms,
semantic analysis, and ranking mechanisms used by large employers.

ANALYSIS TASK:
Perform a comprehensive evaluation of the following resume against the job description.
Consider the highly competitive job market and provide actionable insights for optimization.";

/// The eight criteria the model must evaluate, in order.
pub const EVALUATION_CRITERIA: [&str; 8] = [
    "Keyword density and relevance matching",
    "Skills alignment with job requirements",
    "Experience level and domain expertise",
    "Education and certification relevance",
    "ATS-friendliness (formatting, structure, parsing)",
    "Achievement quantification and impact demonstration",
    "Industry-specific terminology usage",
    "Role progression and career trajectory",
];

/// Exact output schema. Field names here are the contract checked by the validator.
pub const OUTPUT_SCHEMA: &str = r#"{
    "JD Match": "percentage score between 0-100 with brief justification",
    "ATSScore": "ATS parsing and keyword optimization score (0-100)",
    "MissingKeywords": [
        "critical technical keywords not found in resume",
        "include both hard and soft skills",
        "prioritize by importance to the role"
    ],
    "SkillsAlignment": {
        "MatchedSkills": ["skills that align well with JD"],
        "PartiallyMatched": ["skills with some relevance"],
        "GapAnalysis": "detailed analysis of skill gaps"
    },
    "ExperienceMatch": {
        "RelevantExperience": "assessment of relevant experience years and domains",
        "LevelAlignment": "junior/mid/senior level match analysis",
        "IndustryFit": "industry background compatibility assessment"
    },
    "Profile Summary": "comprehensive 3-4 sentence analysis covering overall match quality, strongest selling points, and competitive positioning",
    "Recommendations": {
        "HighPriority": [
            "most critical improvements for immediate implementation",
            "focus on top 3-5 actionable items"
        ],
        "MediumPriority": [
            "important enhancements for better positioning",
            "include formatting and structure improvements"
        ],
        "KeywordOptimization": [
            "specific phrases and terms to incorporate naturally",
            "suggest placement strategies (summary, skills, experience)"
        ],
        "QuantificationOpportunities": [
            "areas where metrics and numbers should be added",
            "suggest specific types of achievements to highlight"
        ]
    },
    "RedFlags": [
        "potential issues that might cause automatic rejection",
        "formatting or content problems for ATS parsing"
    ],
    "CompetitiveAdvantage": "unique strengths and differentiators to emphasize"
}"#;

pub const CLOSING_NOTES: &str = "\
IMPORTANT NOTES:
- Be specific and actionable in recommendations
- Consider both ATS optimization and human reviewer appeal
- Focus on realistic improvements rather than complete rewrites
- Prioritize changes that provide maximum impact
- Consider current market trends and in-demand skills
- Respond with the JSON object only: no markdown fences, no text before or after it";

/// Builds the analysis prompt. Both inputs must be non-empty after trimming.
pub fn build_prompt(resume_text: &str, job_description: &str) -> Result<String, AnalysisError> {
    let resume_text = resume_text.trim();
    let job_description = job_description.trim();

    if resume_text.is_empty() || job_description.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Resume text and job description cannot be empty".to_string(),
        ));
    }

    let criteria = EVALUATION_CRITERIA
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {c}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "{ANALYSIS_PERSONA}\n\n\
         RESUME CONTENT:\n{resume_text}\n\n\
         JOB DESCRIPTION:\n{job_description}\n\n\
         EVALUATION CRITERIA:\n{criteria}\n\n\
         Provide your analysis in the following JSON format ONLY (no additional text):\n\
         {OUTPUT_SCHEMA}\n\n\
         {CLOSING_NOTES}\n"
    ))
}
