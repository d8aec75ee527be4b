//! AI document analysis and optimization. The model's JSON reply is handed
//! back to the caller as-is; only the envelope is checked.

use serde_json::Value;
use tracing::info;

use crate::documents::prompts::{
    ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM, OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;

pub fn build_analysis_prompt(doc_type: &str, text: &str, job_description: Option<&str>) -> String {
    let doc_type = doc_type.replace('_', " ");
    fill_template(
        ANALYZE_PROMPT_TEMPLATE,
        &[
            ("doc_type", doc_type.as_str()),
            ("document_text", text),
            ("job_description", job_description.unwrap_or("").trim()),
        ],
    )
}

pub fn build_optimization_prompt(doc_type: &str, text: &str, job_description: &str) -> String {
    let doc_type = doc_type.replace('_', " ");
    fill_template(
        OPTIMIZE_PROMPT_TEMPLATE,
        &[
            ("doc_type", doc_type.as_str()),
            ("document_text", text),
            ("job_description", job_description.trim()),
        ],
    )
}

pub async fn analyze_document(
    llm: &LlmClient,
    doc_type: &str,
    text: &str,
    job_description: Option<&str>,
) -> Result<Value, AppError> {
    let prompt = build_analysis_prompt(doc_type, text, job_description);
    let system = format!("{ANALYZE_SYSTEM} {JSON_ONLY_SYSTEM}");
    let reply: Value = llm
        .call_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Document analysis failed: {e}")))?;
    info!("Document analysis completed ({} chars analysed)", text.len());
    require_object(reply)
}

pub async fn optimize_document(
    llm: &LlmClient,
    doc_type: &str,
    text: &str,
    job_description: &str,
) -> Result<Value, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    let prompt = build_optimization_prompt(doc_type, text, job_description);
    let system = format!("{OPTIMIZE_SYSTEM} {JSON_ONLY_SYSTEM}");
    let reply: Value = llm
        .call_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Document optimization failed: {e}")))?;
    require_object(reply)
}

fn require_object(reply: Value) -> Result<Value, AppError> {
    if reply.is_object() {
        Ok(reply)
    } else {
        Err(AppError::Llm(
            "model reply was valid JSON but not an object".to_string(),
        ))
    }
}
