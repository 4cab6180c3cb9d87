use crate::models::document::{CoverLetter, DocumentKind};
use crate::render::dates::format_long_date;
use crate::render::{
    accent, contact_item, heading_style, non_empty, Element, VisualTree, ROLE_ATTR, SECTION_ATTR,
};
use crate::templates::{lookup, style_for, StylePolicy, Template};

const DEFAULT_GREETING: &str = "Dear Hiring Manager,";
const DEFAULT_CLOSING: &str = "Sincerely,";

/// Renders a cover letter against `template_id`. Unknown ids render with the default template.
///
/// Greeting and closing fall back to stock phrases; they are part of the
/// letter frame rather than sections.
pub fn render_cover_letter(letter: &CoverLetter, template_id: &str) -> VisualTree {
    let template = lookup(template_id);
    let policy = style_for(template.id);

    let body = Element::new("div")
        .attr(ROLE_ATTR, "letter-body")
        .style("flex", "1")
        .style("padding", "0 25mm")
        .child(header(letter, &policy, template))
        .maybe_child(letter_date(letter))
        .maybe_child(recipient(letter))
        .maybe_child(subject(letter))
        .child(
            Element::new("div")
                .attr(ROLE_ATTR, "greeting")
                .style("margin-bottom", "24px")
                .child(
                    Element::new("p")
                        .text(non_empty(&letter.greeting).unwrap_or(DEFAULT_GREETING)),
                ),
        )
        .maybe_child(content(letter))
        .child(closing(letter));

    let root = Element::new("div")
        .attr("id", DocumentKind::CoverLetter.preview_root_id())
        .style("width", "210mm")
        .style("min-height", "297mm")
        .style("margin", "0")
        .style("padding", "0")
        .style("display", "flex")
        .style("flex-direction", "column")
        .style("box-sizing", "border-box")
        .style("position", "relative")
        .style("overflow", "hidden")
        .style("background-color", "#ffffff")
        .style("font-size", "11pt")
        .style("line-height", "1.5")
        .style("box-shadow", "0 0 10px rgba(0, 0, 0, 0.1)")
        .child(spacer("35mm"))
        .child(body)
        .child(spacer("80mm"));

    VisualTree {
        kind: DocumentKind::CoverLetter,
        template_id: template.id,
        root,
    }
}

fn spacer(height: &str) -> Element {
    Element::new("div")
        .attr(ROLE_ATTR, "spacer")
        .style("height", height)
}

fn header(letter: &CoverLetter, policy: &StylePolicy, template: &Template) -> Element {
    let name = non_empty(&letter.full_name).map(|name| {
        heading_style(Element::new("h1"), policy)
            .style("font-size", "1.5rem")
            .style("color", template.primary_color)
            .style("margin-bottom", "8px")
            .text(name)
    });
    let title = non_empty(&letter.title)
        .map(|t| Element::new("p").style("color", "#374151").text(t));

    let contacts: Vec<Element> = [
        contact_item("email", &letter.email, template.primary_color),
        contact_item("phone", &letter.phone, template.primary_color),
        contact_item("location", &letter.location, template.primary_color),
    ]
    .into_iter()
    .flatten()
    .collect();
    let contact_row = (!contacts.is_empty()).then(|| {
        Element::new("div")
            .attr(ROLE_ATTR, "contacts")
            .style("display", "flex")
            .style("flex-wrap", "wrap")
            .style("gap", "16px")
            .style("color", "#4b5563")
            .style("margin-top", "8px")
            .children(contacts)
    });

    let el = Element::new("header")
        .attr(ROLE_ATTR, "header")
        .style("margin-bottom", "32px");
    accent(el, policy, template)
        .maybe_child(name)
        .maybe_child(title)
        .maybe_child(contact_row)
}

fn letter_date(letter: &CoverLetter) -> Option<Element> {
    let formatted = format_long_date(&letter.letter_date)?;
    Some(
        Element::new("div")
            .attr(SECTION_ATTR, "date")
            .style("margin-bottom", "24px")
            .child(Element::new("p").text(formatted)),
    )
}

fn recipient(letter: &CoverLetter) -> Option<Element> {
    let lines: Vec<Element> = [
        &letter.recipient_name,
        &letter.recipient_title,
        &letter.company_name,
        &letter.company_address,
    ]
    .into_iter()
    .filter_map(|v| non_empty(v))
    .map(|v| Element::new("p").text(v))
    .collect();

    if lines.is_empty() {
        return None;
    }
    Some(
        Element::new("div")
            .attr(SECTION_ATTR, "recipient")
            .style("margin-bottom", "24px")
            .children(lines),
    )
}

fn subject(letter: &CoverLetter) -> Option<Element> {
    let subject = non_empty(&letter.subject)?;
    Some(
        Element::new("div")
            .attr(SECTION_ATTR, "subject")
            .style("margin-bottom", "24px")
            .child(
                Element::new("p")
                    .style("font-weight", "600")
                    .text(format!("Subject: {subject}")),
            ),
    )
}

fn content(letter: &CoverLetter) -> Option<Element> {
    if letter.content.is_blank() {
        return None;
    }
    Some(
        Element::new("div")
            .attr(SECTION_ATTR, "content")
            .style("margin-bottom", "24px")
            .style("color", "#1f2937")
            .markup(&letter.content),
    )
}

fn closing(letter: &CoverLetter) -> Element {
    Element::new("div")
        .attr(ROLE_ATTR, "closing")
        .child(
            Element::new("p")
                .style("margin-bottom", "32px")
                .text(non_empty(&letter.closing).unwrap_or(DEFAULT_CLOSING)),
        )
        .maybe_child(non_empty(&letter.full_name).map(|n| Element::new("p").text(n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::markup::SafeMarkup;

    fn letter() -> CoverLetter {
        CoverLetter {
            full_name: "Jane Doe".into(),
            title: "Staff Engineer".into(),
            email: "jane@example.com".into(),
            recipient_name: "Sam Lee".into(),
            company_name: "Acme".into(),
            letter_date: "2024-03-01".into(),
            subject: "Application for Staff Engineer Position".into(),
            content: SafeMarkup::from("<p>I am <em>excited</em> to apply.</p>"),
            closing: "Best regards,".into(),
            ..CoverLetter::default()
        }
    }

    #[test]
    fn test_empty_letter_only_has_frame() {
        let tree = render_cover_letter(&CoverLetter::default(), "modern-professional");
        assert!(tree.section_keys().is_empty());
        let html = tree.to_html_fragment();
        assert!(html.contains("Dear Hiring Manager,"));
        assert!(html.contains("Sincerely,"));
        assert!(!html.contains("Subject:"));
        assert!(!html.contains("<h1"));
    }

    #[test]
    fn test_populated_letter_sections_in_order() {
        let tree = render_cover_letter(&letter(), "modern-professional");
        assert_eq!(
            tree.section_keys(),
            vec!["date", "recipient", "subject", "content"]
        );
    }

    #[test]
    fn test_letter_date_and_subject_text() {
        let html = render_cover_letter(&letter(), "modern-professional").to_html_fragment();
        assert!(html.contains("March 1, 2024"));
        assert!(html.contains("Subject: Application for Staff Engineer Position"));
        assert!(html.contains("Best regards,"));
        assert!(!html.contains("Sincerely,"));
        assert!(html.contains("<p>I am <em>excited</em> to apply.</p>"));
    }

    #[test]
    fn test_recipient_skips_empty_lines() {
        let tree = render_cover_letter(&letter(), "modern-professional");
        let recipient = tree
            .elements_with_attr(SECTION_ATTR)
            .into_iter()
            .find(|el| el.get_attr(SECTION_ATTR) == Some("recipient"))
            .unwrap();
        assert_eq!(recipient.children.len(), 2);
    }

    #[test]
    fn test_unknown_template_matches_default() {
        let doc = letter();
        assert_eq!(
            render_cover_letter(&doc, "zzz"),
            render_cover_letter(&doc, "modern-professional")
        );
    }

    #[test]
    fn test_variant_accent_applies_to_header() {
        let minimal = render_cover_letter(&letter(), "minimal-elegant").to_html_fragment();
        assert!(minimal.contains("border-left: 2px solid #3b82f6"));
        assert!(minimal.contains("font-weight: 300"));

        let bold = render_cover_letter(&letter(), "creative-bold").to_html_fragment();
        assert!(bold.contains("accent-marker"));
        assert!(bold.contains("font-weight: 900"));
    }
}
