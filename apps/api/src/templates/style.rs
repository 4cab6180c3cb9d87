//! Style policies: how a template id maps onto one of three visual variants.
//!
//! The mapping is a lookup table keyed by template id. Ids without an entry
//! (including unknown ids) get the standard policy.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleVariant {
    Minimal,
    Bold,
    Standard,
}

/// Decoration applied to every section block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionAccent {
    /// 2px left border in the primary color, content indented.
    LeftBorder,
    /// 48×2px marker bar in the primary color at the section's top-left.
    TopMarker,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StylePolicy {
    pub variant: StyleVariant,
    /// CSS `font-weight` for headings.
    pub heading_weight: u16,
    pub heading_uppercase: bool,
    pub section_accent: SectionAccent,
    /// Skill grid columns; `None` lays skills out as a wrapping row.
    pub skill_columns: Option<u8>,
}

pub const MINIMAL: StylePolicy = StylePolicy {
    variant: StyleVariant::Minimal,
    heading_weight: 300,
    heading_uppercase: false,
    section_accent: SectionAccent::LeftBorder,
    skill_columns: None,
};

pub const BOLD: StylePolicy = StylePolicy {
    variant: StyleVariant::Bold,
    heading_weight: 900,
    heading_uppercase: true,
    section_accent: SectionAccent::TopMarker,
    skill_columns: Some(3),
};

pub const STANDARD: StylePolicy = StylePolicy {
    variant: StyleVariant::Standard,
    heading_weight: 400,
    heading_uppercase: false,
    section_accent: SectionAccent::None,
    skill_columns: Some(2),
};

const STYLE_TABLE: &[(&str, StylePolicy)] =
    &[("minimal-elegant", MINIMAL), ("creative-bold", BOLD)];

pub fn style_for(template_id: &str) -> StylePolicy {
    STYLE_TABLE
        .iter()
        .find(|(id, _)| *id == template_id)
        .map(|(_, policy)| *policy)
        .unwrap_or(STANDARD)
}
