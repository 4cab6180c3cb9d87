//! Renderer: maps a document model plus a template id onto a visual tree.
//!
//! Rendering is pure: no clock, no counters, no I/O. Attributes and styles are
//! kept in ordered maps so identical inputs serialize to identical markup.
//! Rich markup is carried through as `VisualNode::Markup` and emitted verbatim.

pub mod cover_letter;
pub mod dates;
pub mod handlers;
pub mod resume;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::document::{DocumentContent, DocumentKind};
use crate::models::markup::{escape_html, SafeMarkup};
use crate::templates::{SectionAccent, StylePolicy, Template};

pub use cover_letter::render_cover_letter;
pub use resume::render_resume;

/// Renders either document kind.
pub fn render_document(content: &DocumentContent, template_id: &str) -> VisualTree {
    match content {
        DocumentContent::Resume(resume) => render_resume(resume, template_id),
        DocumentContent::CoverLetter(letter) => render_cover_letter(letter, template_id),
    }
}

/// Attribute marking a populated section block.
pub const SECTION_ATTR: &str = "data-section";
/// Attribute marking structural scaffolding (header wrapper, spacers, letter frame).
pub const ROLE_ATTR: &str = "data-role";

const VOID_TAGS: &[&str] = &["img", "br", "hr"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub children: Vec<VisualNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualNode {
    Element(Element),
    Text { content: String },
    /// Trusted rich markup, injected without escaping.
    Markup { html: SafeMarkup },
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, node: impl Into<VisualNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<VisualNode>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Appends `node` only when present.
    pub fn maybe_child(self, node: Option<impl Into<VisualNode>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(VisualNode::Text {
            content: content.into(),
        })
    }

    pub fn markup(self, html: &SafeMarkup) -> Self {
        self.child(VisualNode::Markup { html: html.clone() })
    }

    pub fn set_style(&mut self, key: &str, value: &str) {
        self.styles.insert(key.to_string(), value.to_string());
    }

    pub fn remove_style(&mut self, key: &str) {
        self.styles.remove(key);
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Depth-first visit of this element and all descendant elements.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            if let VisualNode::Element(el) = child {
                el.walk(visit);
            }
        }
    }

    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for child in &mut self.children {
            if let VisualNode::Element(el) = child {
                el.walk_mut(visit);
            }
        }
    }

    /// Concatenated text content (markup reduced to plain text).
    #[cfg(test)]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                VisualNode::Element(el) => out.push_str(&el.text_content()),
                VisualNode::Text { content } => out.push_str(content),
                VisualNode::Markup { html } => out.push_str(&html.to_plain_text()),
            }
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        if !self.styles.is_empty() {
            let css = self
                .styles
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            out.push_str(" style=\"");
            out.push_str(&escape_html(&css));
            out.push('"');
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            match child {
                VisualNode::Element(el) => el.write_html(out),
                VisualNode::Text { content } => out.push_str(&escape_html(content)),
                VisualNode::Markup { html } => out.push_str(html.as_str()),
            }
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl From<Element> for VisualNode {
    fn from(el: Element) -> Self {
        VisualNode::Element(el)
    }
}

/// A rendered document: the page root element plus what produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualTree {
    pub kind: DocumentKind,
    pub template_id: &'static str,
    pub root: Element,
}

impl VisualTree {
    /// The page element alone, for embedding in an existing page.
    pub fn to_html_fragment(&self) -> String {
        let mut out = String::new();
        self.root.write_html(&mut out);
        out
    }

    /// A standalone HTML document around the page element, used by the
    /// browser backend for rasterizing and printing.
    pub fn to_html_document(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<style>
@page {{ size: A4 portrait; margin: 0; }}
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{
  background: #ffffff;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  -webkit-print-color-adjust: exact;
}}
#{id} ul {{ list-style: disc; padding-left: 1.25em; }}
#{id} ol {{ list-style: decimal; padding-left: 1.25em; }}
</style>
</head>
<body>
{body}
</body>
</html>"#,
            id = self.kind.preview_root_id(),
            body = self.to_html_fragment()
        )
    }

    /// Elements carrying `key`, in document order.
    pub fn elements_with_attr(&self, key: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.root.walk(&mut |el| {
            if el.attributes.contains_key(key) {
                found.push(el);
            }
        });
        found
    }

    /// Names of the populated section blocks, in document order.
    pub fn section_keys(&self) -> Vec<&str> {
        self.elements_with_attr(SECTION_ATTR)
            .into_iter()
            .filter_map(|el| el.get_attr(SECTION_ATTR))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared building blocks
// ────────────────────────────────────────────────────────────────────────────

/// Section container decorated according to the style policy.
pub(crate) fn section(key: &str, policy: &StylePolicy, template: &Template) -> Element {
    let el = Element::new("section")
        .attr(SECTION_ATTR, key)
        .style("margin-bottom", "16px");
    accent(el, policy, template)
}

/// Applies the policy's accent decoration to a block.
pub(crate) fn accent(el: Element, policy: &StylePolicy, template: &Template) -> Element {
    match policy.section_accent {
        SectionAccent::LeftBorder => el
            .style("border-left", format!("2px solid {}", template.primary_color))
            .style("padding-left", "16px"),
        SectionAccent::TopMarker => el
            .style("position", "relative")
            .style("padding-top", "6px")
            .child(
                Element::new("div")
                    .attr(ROLE_ATTR, "accent-marker")
                    .style("position", "absolute")
                    .style("left", "0")
                    .style("top", "0")
                    .style("width", "48px")
                    .style("height", "2px")
                    .style("background-color", template.primary_color),
            ),
        SectionAccent::None => el,
    }
}

/// Applies heading weight and case from the style policy.
pub(crate) fn heading_style(el: Element, policy: &StylePolicy) -> Element {
    let el = el.style("font-weight", policy.heading_weight.to_string());
    if policy.heading_uppercase {
        el.style("text-transform", "uppercase")
    } else {
        el
    }
}

pub(crate) fn section_heading(text: &str, policy: &StylePolicy, template: &Template) -> Element {
    heading_style(Element::new("h2"), policy)
        .style("font-size", "11pt")
        .style("color", template.primary_color)
        .style("margin-bottom", "4px")
        .text(text)
}

/// One contact item; `None` when the value is empty.
pub(crate) fn contact_item(kind: &str, value: &str, dot_color: &str) -> Option<Element> {
    if value.trim().is_empty() {
        return None;
    }
    Some(
        Element::new("span")
            .attr("data-contact", kind)
            .style("display", "inline-flex")
            .style("align-items", "center")
            .style("gap", "4px")
            .child(bullet(dot_color, "5px"))
            .child(Element::new("span").text(value)),
    )
}

pub(crate) fn bullet(color: &str, size: &str) -> Element {
    Element::new("span")
        .style("display", "inline-block")
        .style("width", size)
        .style("height", size)
        .style("border-radius", "50%")
        .style("background-color", color)
}

pub(crate) fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_html_escapes_text_and_attributes() {
        let el = Element::new("p")
            .attr("title", "a \"quote\"")
            .style("color", "red")
            .text("<b>not bold</b>");
        let tree = VisualTree {
            kind: DocumentKind::Resume,
            template_id: "modern-professional",
            root: el,
        };
        assert_eq!(
            tree.to_html_fragment(),
            r#"<p title="a &quot;quote&quot;" style="color: red">&lt;b&gt;not bold&lt;/b&gt;</p>"#
        );
    }

    #[test]
    fn test_markup_is_emitted_verbatim() {
        let el = Element::new("div").markup(&SafeMarkup::from("<b>Led</b> a team"));
        let mut out = String::new();
        el.write_html(&mut out);
        assert_eq!(out, "<div><b>Led</b> a team</div>");
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let el = Element::new("img").attr("src", "x.png");
        let mut out = String::new();
        el.write_html(&mut out);
        assert_eq!(out, r#"<img src="x.png">"#);
    }

    #[test]
    fn test_styles_serialize_in_sorted_order() {
        let el = Element::new("div").style("width", "1px").style("color", "red");
        let mut out = String::new();
        el.write_html(&mut out);
        assert_eq!(out, r#"<div style="color: red; width: 1px"></div>"#);
    }

    #[test]
    fn test_contact_item_omitted_when_blank() {
        assert!(contact_item("email", "  ", "#000").is_none());
        assert!(contact_item("email", "a@b.c", "#000").is_some());
    }
}
