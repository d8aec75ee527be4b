// Application documents (resumes, cover letters): S3 storage, metadata rows,
// text extraction and LLM analysis/optimization pass-through.
// All model calls go through llm_client.

pub mod analysis;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod storage;
