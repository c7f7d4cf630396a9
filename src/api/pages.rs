//! HTML pages served by the front-end.
//!
//! The analysis page is one fixed layout. Only the `{{ message }}` region
//! changes between the empty form, a verdict and an error.

use crate::analysis::domain::FEATURE_NAMES;

const WELCOME_PAGE: &str = include_str!("../../templates/welcome.html");
const ANALYSIS_PAGE: &str = include_str!("../../templates/index.html");

const FIELDS_SLOT: &str = "{{ fields }}";
const MESSAGE_SLOT: &str = "{{ message }}";

/// Escape text so it can be embedded into HTML element content or attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn welcome() -> &'static str {
    WELCOME_PAGE
}

/// Render the analysis form, optionally annotated with a message.
pub fn analysis(message: Option<&str>) -> String {
    ANALYSIS_PAGE
        .replace(FIELDS_SLOT, &form_fields())
        .replace(MESSAGE_SLOT, &message_block(message))
}

fn form_fields() -> String {
    FEATURE_NAMES
        .iter()
        .map(|name| {
            format!(
                "      <label for=\"{name}\">{label}</label>\n      \
                 <input type=\"number\" id=\"{name}\" name=\"{name}\" step=\"1\" required>\n",
                label = name.replace('_', " "),
            )
        })
        .collect()
}

fn message_block(message: Option<&str>) -> String {
    match message {
        Some(text) => format!("      <p class=\"message\">{}</p>", escape(text)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn form_lists_every_field_in_order() {
        let page = analysis(None);
        let positions: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|name| page.find(&format!("name=\"{name}\"")).expect("field rendered"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!page.contains("{{"));
        assert!(!page.contains("class=\"message\""));
    }

    #[test]
    fn only_the_message_region_differs() {
        let empty = analysis(None);
        let annotated = analysis(Some("Input error: <script>"));
        assert!(annotated.contains("Input error: &lt;script&gt;"));

        let (head, tail) = empty.split_once("<section id=\"result\">").unwrap();
        assert!(annotated.starts_with(head));
        let tail_end = tail.split_once("</section>").unwrap().1;
        assert!(annotated.ends_with(tail_end));
    }

    #[test]
    fn welcome_links_to_the_form() {
        assert!(welcome().contains("href=\"/analysis\""));
    }
}
