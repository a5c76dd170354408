//! The instruction template sent alongside every resume.
//!
//! Centralising the prompt here means the analysis method and the JSON
//! contract change in exactly one place, and unit tests can inspect the
//! rendered text without calling the service.

use crate::pipeline::DocumentKind;

/// JSON shape the service must return. Mirrors [`crate::output::AnalysisResult`].
pub const RESPONSE_SCHEMA: &str = r#"{
  "score": number (0-100),
  "overview": string,
  "strengths": string[],
  "skills": { "languages": string[], "frameworks": string[], "databases": string[], "other": string[] },
  "missing": [{ "name": string, "importance": string }],
  "improvements": [{ "recommendation": string, "reason": string, "action": string }],
  "roleAlignment": { "matchLevel": string, "gaps": string[], "suggestions": string[] },
  "actionPlan": string[]
}"#;

/// Extra instruction for scanned or photographed resumes.
pub const OCR_INSTRUCTION: &str = "Perform OCR to extract all visible text before analyzing.";

/// Render the analysis prompt for `role`.
///
/// Image uploads get the [`OCR_INSTRUCTION`]; PDFs do not, since the
/// service reads their text layer directly.
pub fn analysis_prompt(role: &str, kind: DocumentKind) -> String {
    let (described_as, ocr) = match kind {
        DocumentKind::Image => ("an image", format!("\n{OCR_INSTRUCTION}")),
        DocumentKind::Document => ("a PDF document", String::new()),
    };

    format!(
        r#"Act as a strict, senior-level technical recruiter and academic resume evaluator.
Analyze this resume (provided as {described_as}) specifically for the role of "{role}".{ocr}
Produce a structured critique following these exact sections:

1. OVERVIEW: 3-4 sentences summarizing the candidate's profile, years of experience, and primary domain.
2. STRENGTHS: Specific bullet points referencing skills, experience, or achievements.
3. SKILLS: Categorized into Languages, Frameworks, Databases, and Other.
4. MISSING: Explicitly list missing or weak sections (e.g., Projects, Metrics) and explain why they matter.
5. IMPROVEMENTS: Actionable advice. For each point, specify WHAT to improve, WHY it matters, and HOW to do it.
6. ALIGNMENT: Analyze fit for "{role}". State match level (Low/Medium/High), gaps, and suggestions.
7. PLAN: A prioritized list of 3-5 next steps.

Return JSON matching this schema:
{RESPONSE_SCHEMA}"#
    )
}
