//! Structured export: resume model → word-processing document.
//!
//! `build_word_document` produces an intermediate `WordDocument` (plain text,
//! run formatting, paragraph spacing) and `package` turns it into DOCX bytes.
//! Rich markup is flattened to plain text on the way.

use std::io::Cursor;

use docx_rs::{
    BreakType, Docx, LineSpacing, PageMargin, Paragraph, Run, Style, StyleType,
};

use crate::export::ExportError;
use crate::models::document::{join_skills, Resume};
use crate::models::markup::SafeMarkup;

pub const PAGE_MARGIN_TWIPS: i32 = 1000;

const NAME_SIZE: usize = 32;
const TITLE_SIZE: usize = 24;
const HEADING_SIZE: usize = 26;
const HEADING_STYLE: &str = "Heading2";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Half-points.
    pub size: Option<usize>,
    /// Line break before the text (multi-line plain text).
    pub break_before: bool,
}

impl TextRun {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }

    fn sized(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WordBlock {
    Heading { text: String, spacing_after: u32 },
    Paragraph { runs: Vec<TextRun>, spacing_after: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordDocument {
    pub margins_twips: i32,
    pub blocks: Vec<WordBlock>,
}

impl WordDocument {
    fn heading(&mut self, text: &str) {
        self.blocks.push(WordBlock::Heading {
            text: text.to_string(),
            spacing_after: 200,
        });
    }

    fn paragraph(&mut self, runs: Vec<TextRun>, spacing_after: u32) {
        self.blocks.push(WordBlock::Paragraph {
            runs,
            spacing_after,
        });
    }

    /// All text runs in document order.
    #[cfg(test)]
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.blocks.iter().flat_map(|block| match block {
            WordBlock::Paragraph { runs, .. } => runs.as_slice(),
            WordBlock::Heading { .. } => &[] as &[TextRun],
        })
    }
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Plain-text runs for a markup value, one run per line.
fn markup_runs(markup: &SafeMarkup) -> Vec<TextRun> {
    let text = markup.to_plain_text();
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| TextRun {
            break_before: i > 0,
            ..TextRun::plain(line)
        })
        .collect()
}

pub fn build_word_document(resume: &Resume) -> WordDocument {
    let mut doc = WordDocument {
        margins_twips: PAGE_MARGIN_TWIPS,
        blocks: Vec::new(),
    };

    if present(&resume.full_name) {
        doc.paragraph(vec![TextRun::bold(&resume.full_name).sized(NAME_SIZE)], 200);
    }
    if present(&resume.title) {
        doc.paragraph(vec![TextRun::plain(&resume.title).sized(TITLE_SIZE)], 200);
    }

    let contacts: Vec<&str> = [&resume.email, &resume.phone, &resume.location]
        .into_iter()
        .map(String::as_str)
        .filter(|v| present(v))
        .collect();
    if !contacts.is_empty() {
        doc.paragraph(vec![TextRun::plain(contacts.join(" | "))], 400);
    }

    if !resume.about.is_blank() {
        doc.heading("About Me");
        doc.paragraph(markup_runs(&resume.about), 400);
    }

    if !resume.experience.is_empty() {
        doc.heading("Experience");
        for exp in &resume.experience {
            let mut role = Vec::new();
            if present(&exp.position) {
                role.push(TextRun::bold(&exp.position));
            }
            if present(&exp.position) && present(&exp.company) {
                role.push(TextRun::plain(" at "));
            }
            if present(&exp.company) {
                role.push(TextRun::bold(&exp.company));
            }
            if !role.is_empty() {
                doc.paragraph(role, 100);
            }
            if present(&exp.duration) {
                doc.paragraph(vec![TextRun::italic(&exp.duration)], 100);
            }
            if !exp.description.is_blank() {
                doc.paragraph(markup_runs(&exp.description), 200);
            }
        }
    }

    if !resume.education.is_empty() {
        doc.heading("Education");
        for edu in &resume.education {
            let mut line = Vec::new();
            if present(&edu.school) {
                line.push(TextRun::bold(&edu.school));
            }
            if present(&edu.year) {
                line.push(TextRun::plain(format!(" - {}", edu.year)));
            }
            if !line.is_empty() {
                doc.paragraph(line, 100);
            }
            if present(&edu.degree) {
                doc.paragraph(vec![TextRun::plain(&edu.degree)], 200);
            }
        }
    }

    if !resume.skills.is_empty() {
        doc.heading("Skills");
        doc.paragraph(vec![TextRun::plain(join_skills(&resume.skills))], 400);
    }

    for section in &resume.custom_sections {
        if present(&section.title) && !section.content.is_blank() {
            doc.heading(&section.title);
            doc.paragraph(markup_runs(&section.content), 400);
        }
    }

    doc
}

/// `<slug>-resume.docx`, or `resume.docx` when the name has no usable
/// characters. The slug only contains `[a-z0-9-]`; every other run of
/// characters becomes a single `-`.
pub fn docx_filename(full_name: &str) -> String {
    let mut slug = String::with_capacity(full_name.len());
    for c in full_name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "resume.docx".to_string()
    } else {
        format!("{slug}-resume.docx")
    }
}

fn to_run(run: &TextRun) -> Run {
    let mut out = Run::new();
    if run.break_before {
        out = out.add_break(BreakType::TextWrapping);
    }
    out = out.add_text(&run.text);
    if run.bold {
        out = out.bold();
    }
    if run.italic {
        out = out.italic();
    }
    if let Some(size) = run.size {
        out = out.size(size);
    }
    out
}

/// Packages the document as DOCX (a ZIP container).
pub fn package(doc: &WordDocument) -> Result<Vec<u8>, ExportError> {
    let m = doc.margins_twips;
    let mut docx = Docx::new()
        .page_margin(PageMargin::new().top(m).bottom(m).left(m).right(m))
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 2")
                .bold()
                .size(HEADING_SIZE),
        );

    for block in &doc.blocks {
        let paragraph = match block {
            WordBlock::Heading {
                text,
                spacing_after,
            } => Paragraph::new()
                .style(HEADING_STYLE)
                .add_run(Run::new().add_text(text))
                .line_spacing(LineSpacing::new().after(*spacing_after)),
            WordBlock::Paragraph {
                runs,
                spacing_after,
            } => runs
                .iter()
                .fold(Paragraph::new(), |p, run| p.add_run(to_run(run)))
                .line_spacing(LineSpacing::new().after(*spacing_after)),
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Package(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{CustomSection, Education, Experience};

    fn jane() -> Resume {
        Resume {
            full_name: "Jane Doe".into(),
            title: "Engineer".into(),
            email: "jane@example.com".into(),
            location: "Berlin".into(),
            experience: vec![Experience {
                company: "Acme".into(),
                position: "Lead".into(),
                duration: "2020 - 2023".into(),
                description: SafeMarkup::from("<b>Led</b> a team"),
            }],
            education: vec![Education {
                school: "MIT".into(),
                degree: "BSc".into(),
                year: "2015".into(),
            }],
            skills: vec!["Rust".into(), "Go".into()],
            ..Resume::default()
        }
    }

    #[test]
    fn test_name_then_experience_heading_then_role_runs() {
        let doc = build_word_document(&jane());

        match &doc.blocks[0] {
            WordBlock::Paragraph { runs, .. } => {
                assert_eq!(runs[0].text, "Jane Doe");
                assert!(runs[0].bold);
                assert_eq!(runs[0].size, Some(32));
            }
            other => panic!("expected name paragraph, got {other:?}"),
        }

        let experience = doc
            .blocks
            .iter()
            .position(|b| matches!(b, WordBlock::Heading { text, .. } if text == "Experience"))
            .unwrap();
        match &doc.blocks[experience + 1] {
            WordBlock::Paragraph { runs, .. } => {
                let texts: Vec<_> = runs.iter().map(|r| (r.text.as_str(), r.bold)).collect();
                assert_eq!(texts, vec![("Lead", true), (" at ", false), ("Acme", true)]);
            }
            other => panic!("expected role paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_markup_description_flattened_without_bold() {
        let doc = build_word_document(&jane());
        let run = doc.runs().find(|r| r.text.contains("Led")).unwrap();
        assert_eq!(run.text, "Led a team");
        assert!(!run.bold);
    }

    #[test]
    fn test_contacts_pipe_joined_skipping_blanks() {
        let doc = build_word_document(&jane());
        assert!(doc.runs().any(|r| r.text == "jane@example.com | Berlin"));
    }

    #[test]
    fn test_custom_section_needs_title_and_content() {
        let mut resume = Resume::default();
        resume.custom_sections = vec![
            CustomSection {
                title: "Awards".into(),
                content: SafeMarkup::from(""),
            },
            CustomSection {
                title: "Languages".into(),
                content: SafeMarkup::from("<p>German</p>"),
            },
        ];
        let doc = build_word_document(&resume);
        let headings: Vec<_> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                WordBlock::Heading { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(headings, vec!["Languages"]);
    }

    #[test]
    fn test_empty_resume_has_no_blocks() {
        assert!(build_word_document(&Resume::default()).blocks.is_empty());
    }

    #[test]
    fn test_package_emits_zip_container() {
        let bytes = package(&build_word_document(&jane())).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_docx_filename_slug() {
        assert_eq!(docx_filename("Jane  Mary Doe"), "jane-mary-doe-resume.docx");
        assert_eq!(docx_filename("   "), "resume.docx");
    }

    #[test]
    fn test_docx_filename_strips_header_and_path_characters() {
        assert_eq!(docx_filename("Jane \"JD\" Doe"), "jane-jd-doe-resume.docx");
        assert_eq!(docx_filename("a/b\\c; d"), "a-b-c-d-resume.docx");
        assert_eq!(docx_filename("\"\"\""), "resume.docx");
    }
}
