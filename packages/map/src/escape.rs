//! Escaping for text embedded in HTML and inline scripts.

use std::borrow::Cow;

use serde::Serialize;

/// Escapes `&`, `<`, `>`, `"` and `'` for use in HTML text and quoted
/// attribute values.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Serializes `value` as JSON that can sit inside a `<script>` element.
///
/// `</` and `<!--` are broken up so string content can never close the
/// script element or open a comment; both rewrites stay valid JSON string
/// escapes.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if `value` cannot be serialized.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/").replace("<!--", "<\\u0021--"))
}
