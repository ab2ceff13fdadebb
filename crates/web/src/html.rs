//! HTML fragment helpers.

/// Escapes text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A table row holding one centered message across `colspan` columns.
#[must_use]
pub fn message_row(colspan: usize, text: &str, class: Option<&str>) -> String {
    let class = class.map_or_else(|| "text-center".to_string(), |c| format!("text-center {c}"));
    format!(
        r#"<tr><td colspan="{colspan}" class="{class}">{}</td></tr>"#,
        escape(text)
    )
}

/// `class="..."` attribute, or nothing when `class` is empty.
pub(crate) fn class_attr(class: &str) -> String {
    if class.is_empty() {
        String::new()
    } else {
        format!(r#" class="{}""#, escape(class))
    }
}
