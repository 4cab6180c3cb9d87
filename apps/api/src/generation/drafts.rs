//! Form-level drafting: validate the fields a draft depends on, ask the
//! generator, and write the result back into the document.
//!
//! The document is only touched once generation has succeeded, so a failed
//! draft leaves the form exactly as it was and can simply be retried.

use tracing::info;

use crate::llm_client::{generate_subject, GenerationError, TextGenerator};
use crate::models::document::{CoverLetter, Resume};
use crate::models::markup::SafeMarkup;

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Drafts the resume's About section from its professional title.
pub async fn draft_about(
    generator: &dyn TextGenerator,
    resume: &mut Resume,
) -> Result<(), GenerationError> {
    if blank(&resume.title) {
        return Err(GenerationError::MissingInput(
            "Please enter a professional title first".into(),
        ));
    }

    let text = generator.generate_about(&resume.title).await?;
    resume.about = SafeMarkup::from_generated(&text);
    info!("Drafted About section for '{}'", resume.title);
    Ok(())
}

/// Drafts the description of the experience entry at `index`.
pub async fn draft_experience(
    generator: &dyn TextGenerator,
    resume: &mut Resume,
    index: usize,
) -> Result<(), GenerationError> {
    let entry = resume.experience.get(index).ok_or_else(|| {
        GenerationError::MissingInput(format!("No experience entry at position {index}"))
    })?;
    if blank(&entry.position) || blank(&entry.company) {
        return Err(GenerationError::MissingInput(
            "Please enter both position and company first".into(),
        ));
    }

    let text = generator
        .generate_experience(&entry.position, &entry.company)
        .await?;

    if let Some(entry) = resume.experience.get_mut(index) {
        entry.description = SafeMarkup::from_generated(&text);
    }
    info!("Drafted description for experience entry {index}");
    Ok(())
}

/// Drafts the letter body and sets the subject line from the applied position.
pub async fn draft_cover_letter(
    generator: &dyn TextGenerator,
    letter: &mut CoverLetter,
) -> Result<(), GenerationError> {
    if blank(&letter.title) || blank(&letter.company_name) {
        return Err(GenerationError::MissingInput(
            "Please enter your applied position and company name first".into(),
        ));
    }

    let text = generator
        .generate_cover_letter(&letter.title, &letter.company_name)
        .await?;
    letter.content = SafeMarkup::from_generated(&text);
    letter.subject = generate_subject(&letter.title);
    info!("Drafted cover letter for {}", letter.company_name);
    Ok(())
}
