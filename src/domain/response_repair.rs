//! Best-effort repair of the K-line endpoint's comma-less JSON.
//!
//! Only two malformations are handled: a missing comma between adjacent
//! quoted tokens (`"a" "b"` -> `"a","b"`) and a missing comma between
//! adjacent objects (`}{` -> `},{`). Any other shape drift passes through
//! untouched and is left for the JSON parser to reject.

/// Insert the missing separators. Text inside string literals is never
/// modified, so an empty string value `""` stays intact and already-valid
/// JSON is returned unchanged.
pub fn repair_json_text(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + raw.len() / 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;

        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                let next = skip_whitespace(&chars, i);
                if chars.get(next) == Some(&'"') {
                    out.push(',');
                    i = next;
                }
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '}' => {
                let next = skip_whitespace(&chars, i);
                if chars.get(next) == Some(&'{') {
                    out.push(',');
                    i = next;
                }
            }
            _ => {}
        }
    }

    out
}

/// Repair the text and make sure the result is a JSON array.
pub fn repair_response(raw: &str) -> String {
    let repaired = repair_json_text(raw);
    let trimmed = repaired.trim();
    if trimmed.starts_with('{') {
        format!("[{}]", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}
