use serde::{Deserialize, Deserializer, Serialize};

use crate::models::markup::SafeMarkup;

/// The two document kinds the builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover-letter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "resume" => Some(DocumentKind::Resume),
            "cover-letter" => Some(DocumentKind::CoverLetter),
            _ => None,
        }
    }

    /// Filename used for raster (PDF) downloads.
    pub fn pdf_filename(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume.pdf",
            DocumentKind::CoverLetter => "cover-letter.pdf",
        }
    }

    /// Element id of the rendered page root.
    pub fn preview_root_id(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume-preview",
            DocumentKind::CoverLetter => "cover-letter-preview",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: SafeMarkup,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomSection {
    pub title: String,
    pub content: SafeMarkup,
}

impl CustomSection {
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.content.is_blank()
    }
}

/// Resume form data. Every field is optional; empty values are simply not rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resume {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub date_of_birth: String,
    /// Embedded image reference (data URL or http URL).
    pub photo: String,
    pub about: SafeMarkup,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    #[serde(deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    pub custom_sections: Vec<CustomSection>,
}

/// Cover letter form data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverLetter {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub recipient_name: String,
    pub recipient_title: String,
    pub company_name: String,
    pub company_address: String,
    pub letter_date: String,
    pub greeting: String,
    pub subject: String,
    pub content: SafeMarkup,
    pub closing: String,
}

/// Either document kind, as stored or posted to the preview endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentContent {
    Resume(Resume),
    CoverLetter(CoverLetter),
}

impl DocumentContent {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentContent::Resume(_) => DocumentKind::Resume,
            DocumentContent::CoverLetter(_) => DocumentKind::CoverLetter,
        }
    }

    /// Deserializes stored JSON using the recorded kind rather than guessing
    /// from the shape (every field is optional, so shapes overlap).
    pub fn from_value(kind: DocumentKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            DocumentKind::Resume => DocumentContent::Resume(serde_json::from_value(value)?),
            DocumentKind::CoverLetter => {
                DocumentContent::CoverLetter(serde_json::from_value(value)?)
            }
        })
    }
}

/// Parses the comma-separated skills input into an ordered skill list.
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts either a list of skills or the raw comma-separated input.
fn deserialize_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SkillsInput {
        List(Vec<String>),
        Text(String),
    }

    Ok(match SkillsInput::deserialize(deserializer)? {
        SkillsInput::List(skills) => skills,
        SkillsInput::Text(text) => parse_skills(&text),
    })
}

/// Joins skills back into the display string shown in the skills input.
pub fn join_skills(skills: &[String]) -> String {
    skills.join(", ")
}
