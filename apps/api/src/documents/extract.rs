use crate::errors::AppError;

/// Characters of document text sent to the model; the rest is cut.
pub const MAX_ANALYSIS_CHARS: usize = 20_000;

pub fn is_pdf(content_type: &str, file_name: &str) -> bool {
    content_type.eq_ignore_ascii_case("application/pdf")
        || file_name.to_ascii_lowercase().ends_with(".pdf")
}

/// Pulls plain text out of an uploaded document: PDFs through `pdf-extract`,
/// everything else must already be UTF-8 text.
pub fn extract_text(content_type: &str, file_name: &str, data: &[u8]) -> Result<String, AppError> {
    let raw = if is_pdf(content_type, file_name) {
        pdf_extract::extract_text_from_mem(data).map_err(|e| {
            AppError::UnprocessableEntity(format!("Could not read PDF '{file_name}': {e}"))
        })?
    } else {
        String::from_utf8(data.to_vec()).map_err(|_| {
            AppError::UnprocessableEntity(format!(
                "'{file_name}' is neither a PDF nor UTF-8 text"
            ))
        })?
    };

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(format!(
            "'{file_name}' contains no extractable text"
        )));
    }
    Ok(truncate_chars(text, MAX_ANALYSIS_CHARS))
}

/// Collapses runs of blank lines and trailing spaces left by PDF extraction.
fn normalize_whitespace(raw: &str) -> String {
    let mut out = Vec::new();
    let mut blank_run = 0;
    for line in raw.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push(line);
    }
    out.join("\n").trim().to_string()
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}
