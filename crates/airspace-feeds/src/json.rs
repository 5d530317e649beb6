//! Tolerant JSON helpers for upstream payloads.

use std::borrow::Cow;

const NON_FINITE_LITERALS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Replace bare `NaN`, `Infinity` and `-Infinity` tokens with `null`.
///
/// Some balloon files are written by encoders that emit these non-standard
/// literals. Text inside string literals is left untouched.
pub fn replace_non_finite_literals(input: &str) -> Cow<'_, str> {
    if !input.contains("NaN") && !input.contains("Infinity") {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE_LITERALS
            .iter()
            .find(|token| rest.starts_with(**token))
        {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }

        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    Cow::Owned(out)
}
