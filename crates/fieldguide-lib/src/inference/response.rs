use serde_json::Value;

use crate::config::ANSWER_MARKER;

/// Build the text generation prompt from retrieved context and a question.
pub fn build_prompt(query: &str, context: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {query}\n\n{ANSWER_MARKER}")
}

/// Extract the top label from an image classification response.
///
/// Expects a JSON array whose first element is an object with a string
/// `label`; anything else yields `None`.
pub fn parse_species_label(body: &str) -> Option<String> {
    first_string_field(body, "label")
}

/// Extract the answer from a text generation response.
///
/// Expects a JSON array whose first element has a string `generated_text`.
pub fn parse_generated_answer(body: &str) -> Option<String> {
    first_string_field(body, "generated_text").map(|text| extract_answer(&text).to_string())
}

/// Text after the last [`ANSWER_MARKER`], trimmed. The whole text when the
/// marker is absent.
pub fn extract_answer(generated: &str) -> &str {
    generated
        .rsplit(ANSWER_MARKER)
        .next()
        .unwrap_or(generated)
        .trim()
}

fn first_string_field(body: &str, field: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .as_array()?
        .first()?
        .get(field)?
        .as_str()
        .map(str::to_string)
}
