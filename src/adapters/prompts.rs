// Prompt templates for the chat-completions calls.

pub fn search_keywords_prompt(num_keywords: usize) -> String {
    format!(
        r#"Generate exactly {num_keywords} job search keywords/titles related to AI and Machine Learning engineering.

Include a variety of:
- AI/ML engineering roles (e.g., "Machine Learning Engineer", "AI Engineer")
- Data science and research roles (e.g., "Data Scientist", "Research Scientist")
- Specialized roles (e.g., "NLP Engineer", "Computer Vision Engineer", "LLM Developer")
- MLOps and infrastructure roles (e.g., "MLOps Engineer", "ML Platform Engineer")

Return ONLY a JSON array of strings, no other text.
Example: ["Machine Learning Engineer", "Data Scientist", "NLP Engineer"]"#
    )
}

pub fn extract_skills_prompt(description: &str) -> String {
    format!(
        r#"Extract the technical skills required or mentioned in this job description.

Include programming languages, ML/AI frameworks and libraries, cloud platforms, databases,
DevOps tools, and AI/ML concepts (e.g., "Python", "PyTorch", "AWS", "Kubernetes", "RAG").
Use the common short name of each skill. Do not include soft skills, degrees, or generic
terms like "programming" or "software".

Job Description:
{description}

Return ONLY a JSON array of skill names, no other text. If none are found, return [].
Example: ["Python", "TensorFlow", "Docker"]"#
    )
}

pub fn discover_skills_prompt(known_list: &str, combined_descriptions: &str) -> String {
    format!(
        r#"Analyze these job descriptions and extract technical skills, tools, frameworks, and technologies.

IMPORTANT: Only return skills that are NOT in this list of already-known skills:
{known_list}

Job Descriptions:
{combined_descriptions}

Find NEW skills/tools/frameworks/technologies that are:
1. Specific and technical (not generic terms like "programming" or "software")
2. NOT already in the known skills list above
3. Mentioned in these job postings

Return ONLY a JSON array of new skill names. If no new skills found, return empty array [].
Example: ["New Tool 1", "New Framework 2"]"#
    )
}
