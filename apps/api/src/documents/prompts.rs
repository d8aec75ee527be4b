// Document analysis and optimization prompt templates.
// Placeholders are filled with llm_client::prompts::fill_template.

pub const ANALYZE_SYSTEM: &str = "\
You are an experienced technical recruiter reviewing application documents. \
You MUST respond with valid JSON only, with no markdown fences and no commentary. \
Judge only what the document says; do not invent experience the candidate has not listed.";

pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Review the following {doc_type}.

DOCUMENT:
{document_text}

TARGET JOB DESCRIPTION (may be empty):
{job_description}

Return exactly this JSON structure:
{
  "overall_score": 0-100,
  "summary": "two or three sentences",
  "strengths": ["string"],
  "weaknesses": ["string"],
  "missing_keywords": ["keywords from the job description absent in the document"],
  "suggestions": [{"section": "string", "suggestion": "string"}]
}"#;

pub const OPTIMIZE_SYSTEM: &str = "\
You rewrite application documents to fit a specific job description. \
You MUST respond with valid JSON only. \
Keep every factual claim from the original; reword and reorder, never fabricate.";

pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Optimize this {doc_type} for the job description below.

ORIGINAL:
{document_text}

JOB DESCRIPTION:
{job_description}

Return exactly this JSON structure:
{
  "optimized_text": "string",
  "changes": [{"before": "string", "after": "string", "reason": "string"}],
  "keywords_added": ["string"]
}"#;
