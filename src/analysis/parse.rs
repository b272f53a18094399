use super::AnalysisError;
use crate::nutrition::NutritionPayload;

/// Remove a surrounding markdown code fence (```json ... ``` or ``` ... ```).
/// Content without a complete fence is only trimmed.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|s| s.strip_suffix("```"))
    else {
        return trimmed;
    };

    let body = match inner.split_once('\n') {
        Some((tag, rest)) if !tag.contains(|c: char| c == '{' || c == '[') => rest,
        _ => inner.trim_start_matches("json"),
    };
    body.trim()
}

/// Parse model output into a payload, keeping the raw text on failure.
pub fn parse_payload(content: &str) -> Result<NutritionPayload, AnalysisError> {
    serde_json::from_str::<NutritionPayload>(strip_code_fence(content)).map_err(|e| {
        AnalysisError::Parse {
            raw: content.to_string(),
            reason: e.to_string(),
        }
    })
}
