// Prompt builders for each drafting operation.

pub fn about_prompt(title: &str) -> String {
    format!(
        "Write a professional, first-person 'About Me' section for a resume (2-3 sentences) \
         for a {title}. Focus on general expertise and passion for the field."
    )
}

pub fn experience_prompt(position: &str, company: &str) -> String {
    format!(
        "Write a professional, bullet-point description of achievements and responsibilities \
         (2-3 points) for a {position} position at {company}."
    )
}

pub fn cover_letter_prompt(title: &str, company: &str) -> String {
    format!(
        "Write only the main body paragraphs of a cover letter for a {title} position at \
         {company}. \
         Structure it in 3 clear paragraphs without any headers or labels:\n\n\
         1. Start directly with expressing interest in the position and company, mentioning \
         specific aspects that attract you.\n\
         2. Continue with highlighting your relevant skills and experiences that make you a \
         strong candidate.\n\
         3. End by connecting your background to the company's needs and include a call to \
         action.\n\n\
         Keep it professional, concise, and persuasive. Do not include any paragraph labels or \
         headers - just write the content directly."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_inputs() {
        assert!(about_prompt("Data Scientist").contains("for a Data Scientist."));
        let p = experience_prompt("Lead", "Acme");
        assert!(p.contains("Lead position at Acme"));
        let p = cover_letter_prompt("Engineer", "Acme");
        assert!(p.contains("Engineer position at Acme"));
        assert!(p.contains("3 clear paragraphs"));
    }
}
