use serde_json::Value;

use super::DomainError;

/// Extract the first well-formed JSON object embedded in free-form model
/// output.
///
/// Generative models routinely wrap structured payloads in prose or markdown
/// fences, so this scans for candidate `{ ... }` spans with a string-aware
/// brace balancer and returns the first span that parses as a JSON object.
pub fn extract_first_object(text: &str) -> Result<Value, DomainError> {
    let bytes = text.as_bytes();
    let mut start = 0;

    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(end) = balanced_span(bytes, open) {
            let candidate = &text[open..end];
            if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
                return Ok(value);
            }
        }
        start = open + 1;
    }

    Err(DomainError::malformed(
        "no well-formed JSON object found in response",
    ))
}

/// Find the exclusive end of the brace-balanced span opening at `open`.
/// Braces inside string literals (including escaped quotes) do not count.
fn balanced_span(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}
