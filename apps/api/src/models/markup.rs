//! Rich markup carried inside the document model.
//!
//! `SafeMarkup` is the only way formatted text enters a document. Values are
//! produced by the paired rich-text editor (arriving through request
//! deserialization) or by the generation boundary (`from_generated`). The
//! renderer embeds them verbatim and never sanitizes; anything untrusted must
//! be cleaned before it is wrapped here.

use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeMarkup(String);

/// Elements whose end also ends a line of plain text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "blockquote",
];

impl SafeMarkup {
    /// Wraps markup produced by the editing widget.
    pub fn from_editor(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Wraps plain model output: the text is escaped and every blank-line
    /// separated chunk becomes its own paragraph.
    pub fn from_generated(text: &str) -> Self {
        let html = text
            .split("\n\n")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| format!("<p>{}</p>", escape_html(chunk).replace('\n', "<br>")))
            .collect::<Vec<_>>()
            .join("");
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the markup renders no visible text (e.g. `""` or `"<p></p>"`).
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty() || self.to_plain_text().trim().is_empty()
    }

    /// Reduces the markup to plain text: tags are dropped, entities decoded,
    /// and block boundaries become newlines. Formatting is discarded.
    pub fn to_plain_text(&self) -> String {
        let fragment = Html::parse_fragment(&self.0);
        let mut out = String::with_capacity(self.0.len());
        collect_text(fragment.root_element(), &mut out);
        out.replace('\u{a0}', " ").trim_end_matches('\n').to_string()
    }
}

impl From<&str> for SafeMarkup {
    fn from(html: &str) -> Self {
        Self::from_editor(html)
    }
}

fn end_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Appends the text below `el` to `out`, ending a line at `<br>` and after
/// every block element.
fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child.value().name();
                if name == "br" {
                    end_line(out);
                    continue;
                }
                collect_text(child, out);
                if BLOCK_TAGS.contains(&name) {
                    end_line(out);
                }
            }
            _ => {}
        }
    }
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_drops_inline_formatting() {
        let markup = SafeMarkup::from("<b>Led</b> a team");
        assert_eq!(markup.to_plain_text(), "Led a team");
    }

    #[test]
    fn test_plain_text_breaks_blocks_into_lines() {
        let markup = SafeMarkup::from("<ul><li>Shipped v2</li><li>Cut costs</li></ul>");
        assert_eq!(markup.to_plain_text(), "Shipped v2\nCut costs");
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        let markup = SafeMarkup::from("<p>R&amp;D &lt;3 &#65;&#x42;</p>");
        assert_eq!(markup.to_plain_text(), "R&D <3 AB");
    }

    #[test]
    fn test_plain_text_decodes_named_entities() {
        let markup = SafeMarkup::from("<p>Caf&eacute; &mdash; R&amp;D &rsquo;24</p>");
        assert_eq!(markup.to_plain_text(), "Café — R&D ’24");
    }

    #[test]
    fn test_plain_text_ignores_angle_bracket_in_attribute() {
        let markup = SafeMarkup::from(r#"<a href="x" title="a>b">Portfolio</a>"#);
        assert_eq!(markup.to_plain_text(), "Portfolio");
    }

    #[test]
    fn test_plain_text_line_break_and_nbsp() {
        let markup = SafeMarkup::from("<p>One<br>Two&nbsp;Three</p>");
        assert_eq!(markup.to_plain_text(), "One\nTwo Three");
    }

    #[test]
    fn test_plain_text_keeps_bare_ampersand() {
        let markup = SafeMarkup::from("Tom & Jerry");
        assert_eq!(markup.to_plain_text(), "Tom & Jerry");
    }

    #[test]
    fn test_empty_paragraph_is_blank() {
        assert!(SafeMarkup::from("<p></p>").is_blank());
        assert!(SafeMarkup::default().is_blank());
        assert!(!SafeMarkup::from("<p>x</p>").is_blank());
    }

    #[test]
    fn test_from_generated_escapes_and_wraps() {
        let markup = SafeMarkup::from_generated("I build <fast> systems.\n\nSecond para");
        assert_eq!(
            markup.as_str(),
            "<p>I build &lt;fast&gt; systems.</p><p>Second para</p>"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("'quotes'"), "&#39;quotes&#39;");
    }
}
