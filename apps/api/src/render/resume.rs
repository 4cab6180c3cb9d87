use crate::models::document::{CustomSection, DocumentKind, Education, Experience, Resume};
use crate::render::dates::format_long_date;
use crate::render::{
    bullet, contact_item, heading_style, non_empty, section, section_heading, Element, VisualTree,
    ROLE_ATTR,
};
use crate::templates::{lookup, style_for, StylePolicy, Template};

const TEXT_MAIN: &str = "#374151";
const TEXT_MUTED: &str = "#4b5563";
const TEXT_STRONG: &str = "#111827";

/// Renders a resume against `template_id`. Unknown ids render with the default template.
pub fn render_resume(resume: &Resume, template_id: &str) -> VisualTree {
    let template = lookup(template_id);
    let policy = style_for(template.id);

    let root = Element::new("div")
        .attr("id", DocumentKind::Resume.preview_root_id())
        .style("width", "210mm")
        .style("min-height", "297mm")
        .style("padding", "15mm")
        .style("margin", "0 auto")
        .style("box-sizing", "border-box")
        .style("position", "relative")
        .style("overflow", "hidden")
        .style("background-color", "#ffffff")
        .style("font-size", "9pt")
        .style("line-height", "1.3")
        .style("box-shadow", "0 0 10px rgba(0, 0, 0, 0.1)")
        .child(header(resume, &policy, template))
        .maybe_child(about(resume, &policy, template))
        .maybe_child(skills(&resume.skills, &policy, template))
        .maybe_child(experience(&resume.experience, &policy, template))
        .maybe_child(education(&resume.education, &policy, template))
        .children(
            resume
                .custom_sections
                .iter()
                .filter_map(|s| custom_section(s, &policy, template)),
        );

    VisualTree {
        kind: DocumentKind::Resume,
        template_id: template.id,
        root,
    }
}

fn header(resume: &Resume, policy: &StylePolicy, template: &Template) -> Element {
    let photo = non_empty(&resume.photo).map(|src| {
        Element::new("img")
            .attr("src", src)
            .attr("alt", "Profile")
            .attr("crossorigin", "anonymous")
            .style("width", "80px")
            .style("height", "80px")
            .style("border-radius", "50%")
            .style("object-fit", "cover")
    });

    let name = non_empty(&resume.full_name).map(|name| {
        heading_style(Element::new("h1"), policy)
            .style("font-size", "16pt")
            .style("color", template.accent_color)
            .style("margin-bottom", "4px")
            .text(name)
    });

    let title = non_empty(&resume.title).map(|title| {
        Element::new("p")
            .style("font-size", "11pt")
            .style("color", TEXT_MAIN)
            .style("margin-bottom", "8px")
            .text(title)
    });

    let born = format_long_date(&resume.date_of_birth).map(|d| format!("Born: {d}"));
    let contacts: Vec<Element> = [
        contact_item("email", &resume.email, template.primary_color),
        contact_item("phone", &resume.phone, template.primary_color),
        contact_item("location", &resume.location, template.primary_color),
        born.and_then(|b| contact_item("date-of-birth", &b, template.primary_color)),
    ]
    .into_iter()
    .flatten()
    .collect();

    let contact_row = (!contacts.is_empty()).then(|| {
        Element::new("div")
            .attr(ROLE_ATTR, "contacts")
            .style("display", "flex")
            .style("flex-wrap", "wrap")
            .style("gap", "12px")
            .style("font-size", "8.5pt")
            .style("color", TEXT_MUTED)
            .children(contacts)
    });

    Element::new("header")
        .attr(ROLE_ATTR, "header")
        .style("display", "flex")
        .style("gap", "16px")
        .style("align-items", "flex-start")
        .style("margin-bottom", "16px")
        .maybe_child(photo)
        .child(
            Element::new("div")
                .style("flex", "1")
                .maybe_child(name)
                .maybe_child(title)
                .maybe_child(contact_row),
        )
}

fn about(resume: &Resume, policy: &StylePolicy, template: &Template) -> Option<Element> {
    if resume.about.is_blank() {
        return None;
    }
    Some(
        section("about", policy, template)
            .child(section_heading("Summary", policy, template))
            .child(
                Element::new("div")
                    .style("color", TEXT_MAIN)
                    .style("font-size", "9pt")
                    .style("line-height", "1.4")
                    .markup(&resume.about),
            ),
    )
}

fn skills(skills: &[String], policy: &StylePolicy, template: &Template) -> Option<Element> {
    if skills.is_empty() {
        return None;
    }

    let layout = match policy.skill_columns {
        Some(columns) => Element::new("div")
            .style("display", "grid")
            .style(
                "grid-template-columns",
                format!("repeat({columns}, minmax(0, 1fr))"),
            )
            .style("column-gap", if columns == 2 { "24px" } else { "8px" })
            .style("row-gap", if columns == 2 { "4px" } else { "8px" }),
        None => Element::new("div")
            .style("display", "flex")
            .style("flex-wrap", "wrap")
            .style("gap", "8px"),
    };

    let items = skills.iter().map(|skill| {
        Element::new("div")
            .attr("data-entry", "skill")
            .style("display", "flex")
            .style("align-items", "center")
            .style("gap", "8px")
            .child(bullet(template.primary_color, "4px"))
            .child(Element::new("span").style("color", TEXT_MAIN).text(skill))
    });

    Some(
        section("skills", policy, template)
            .child(section_heading("Skill Highlights", policy, template))
            .child(layout.children(items)),
    )
}

fn experience(
    entries: &[Experience],
    policy: &StylePolicy,
    template: &Template,
) -> Option<Element> {
    if entries.is_empty() {
        return None;
    }

    let items = entries.iter().map(|exp| {
        let position = non_empty(&exp.position).map(|p| {
            Element::new("h3")
                .style("font-weight", "600")
                .style("color", TEXT_STRONG)
                .text(p)
        });
        let duration = non_empty(&exp.duration).map(|d| {
            Element::new("span")
                .style("font-size", "8.5pt")
                .style("color", TEXT_MUTED)
                .text(d)
        });
        let title_row = (position.is_some() || duration.is_some()).then(|| {
            Element::new("div")
                .style("display", "flex")
                .style("justify-content", "space-between")
                .style("align-items", "baseline")
                .maybe_child(position)
                .maybe_child(duration)
        });
        let company = non_empty(&exp.company).map(|c| {
            Element::new("p")
                .style("font-weight", "500")
                .style("color", TEXT_MAIN)
                .style("margin-bottom", "4px")
                .text(c)
        });
        let description = (!exp.description.is_blank()).then(|| {
            Element::new("div")
                .style("color", TEXT_MUTED)
                .style("padding-left", "12px")
                .style("line-height", "1.3")
                .markup(&exp.description)
        });

        Element::new("div")
            .attr("data-entry", "experience")
            .style("font-size", "9pt")
            .style("margin-bottom", "12px")
            .maybe_child(title_row)
            .maybe_child(company)
            .maybe_child(description)
    });

    Some(
        section("experience", policy, template)
            .child(section_heading("Experience", policy, template))
            .children(items),
    )
}

fn education(entries: &[Education], policy: &StylePolicy, template: &Template) -> Option<Element> {
    if entries.is_empty() {
        return None;
    }

    let items = entries.iter().map(|edu| {
        let degree = non_empty(&edu.degree).map(|d| {
            Element::new("h3")
                .style("font-weight", "600")
                .style("color", TEXT_STRONG)
                .text(d)
        });
        let year = non_empty(&edu.year).map(|y| {
            Element::new("span")
                .style("font-size", "8.5pt")
                .style("color", TEXT_MUTED)
                .text(y)
        });
        let title_row = (degree.is_some() || year.is_some()).then(|| {
            Element::new("div")
                .style("display", "flex")
                .style("justify-content", "space-between")
                .style("align-items", "baseline")
                .maybe_child(degree)
                .maybe_child(year)
        });
        let school = non_empty(&edu.school)
            .map(|s| Element::new("p").style("color", TEXT_MAIN).text(s));

        Element::new("div")
            .attr("data-entry", "education")
            .style("font-size", "9pt")
            .style("margin-bottom", "8px")
            .maybe_child(title_row)
            .maybe_child(school)
    });

    Some(
        section("education", policy, template)
            .child(section_heading("Education", policy, template))
            .children(items),
    )
}

fn custom_section(
    custom: &CustomSection,
    policy: &StylePolicy,
    template: &Template,
) -> Option<Element> {
    if custom.is_empty() {
        return None;
    }
    let heading = non_empty(&custom.title).map(|t| section_heading(t, policy, template));
    let body = (!custom.content.is_blank()).then(|| {
        Element::new("div")
            .style("color", TEXT_MAIN)
            .style("font-size", "9pt")
            .style("line-height", "1.3")
            .markup(&custom.content)
    });
    Some(
        section("custom", policy, template)
            .maybe_child(heading)
            .maybe_child(body),
    )
}
