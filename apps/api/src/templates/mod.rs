//! Template Registry: the fixed, ordered catalog of visual themes.
//!
//! Pure data. `lookup` is total: unknown ids resolve to the first template.

pub mod handlers;
pub mod style;

use serde::Serialize;

pub use style::{style_for, SectionAccent, StylePolicy, StyleVariant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub primary_color: &'static str,
    pub accent_color: &'static str,
    pub preview: &'static str,
}

macro_rules! template {
    ($id:literal, $name:literal, $desc:literal, $primary:literal, $accent:literal) => {
        Template {
            id: $id,
            name: $name,
            description: $desc,
            primary_color: $primary,
            accent_color: $accent,
            preview: concat!(
                "https://raw.githubusercontent.com/ieenterprises/ieenterprises.ai/main/templates/",
                $id,
                ".png"
            ),
        }
    };
}

static TEMPLATES: [Template; 10] = [
    template!(
        "modern-professional",
        "Modern Professional",
        "Clean and professional design with orange accents",
        "#f97316",
        "#333333"
    ),
    template!(
        "minimal-elegant",
        "Minimal Elegant",
        "Minimalist design with subtle blue accents",
        "#3b82f6",
        "#1f2937"
    ),
    template!(
        "creative-bold",
        "Creative Bold",
        "Bold design with vibrant purple accents",
        "#8b5cf6",
        "#1f2937"
    ),
    template!(
        "executive-classic",
        "Executive Classic",
        "Traditional design with navy blue accents",
        "#1e40af",
        "#1f2937"
    ),
    template!(
        "tech-modern",
        "Tech Modern",
        "Contemporary design with teal accents",
        "#0d9488",
        "#0f172a"
    ),
    template!(
        "creative-minimalist",
        "Creative Minimalist",
        "Clean design with rose accents",
        "#e11d48",
        "#18181b"
    ),
    template!(
        "corporate-professional",
        "Corporate Professional",
        "Professional design with gray accents",
        "#4b5563",
        "#111827"
    ),
    template!(
        "modern-compact",
        "Modern Compact",
        "Space-efficient design with emerald accents",
        "#059669",
        "#064e3b"
    ),
    template!(
        "elegant-serif",
        "Elegant Serif",
        "Sophisticated design with amber accents",
        "#d97706",
        "#78350f"
    ),
    template!(
        "modern-timeline",
        "Modern Timeline",
        "Timeline-based design with indigo accents",
        "#4f46e5",
        "#312e81"
    ),
];

/// The full catalog, in display order.
pub fn templates() -> &'static [Template] {
    &TEMPLATES
}

/// The fallback template (first registered).
pub fn default_template() -> &'static Template {
    &TEMPLATES[0]
}

/// Returns the template with `id`, or the default template when unknown.
pub fn lookup(id: &str) -> &'static Template {
    find(id).unwrap_or_else(default_template)
}

/// Exact match only; `None` when `id` is not registered.
pub fn find(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREVIEW_BASE: &str =
        "https://raw.githubusercontent.com/ieenterprises/ieenterprises.ai/main/templates";

    #[test]
    fn test_catalog_order_starts_with_default() {
        assert_eq!(templates().len(), 10);
        assert_eq!(templates()[0].id, "modern-professional");
        assert_eq!(default_template().id, "modern-professional");
    }

    #[test]
    fn test_lookup_known_id() {
        let t = lookup("creative-bold");
        assert_eq!(t.name, "Creative Bold");
        assert_eq!(t.primary_color, "#8b5cf6");
    }

    #[test]
    fn test_lookup_unknown_id_falls_back_to_first() {
        for id in ["", "nope", "MINIMAL-ELEGANT", "modern-professional "] {
            assert_eq!(lookup(id).id, "modern-professional", "id {id:?}");
        }
    }

    #[test]
    fn test_template_ids_are_unique() {
        let mut ids: Vec<_> = templates().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), templates().len());
    }

    #[test]
    fn test_preview_urls_point_at_template_image() {
        for t in templates() {
            assert!(t.preview.starts_with(PREVIEW_BASE));
            assert!(t.preview.ends_with(&format!("{}.png", t.id)));
        }
    }
}
