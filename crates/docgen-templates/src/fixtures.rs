//! Sample payloads for `/schema/{doc_type}` and the CLI's `sample`
//! subcommand — illustrative, not exhaustive; enough to exercise every
//! section emitter once.

use docgen_types::model::DocumentType;
use serde_json::{json, Value};

pub fn sample_data(document_type: DocumentType) -> Value {
    match document_type {
        DocumentType::Resume => json!({
            "personalInfo": {
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+1-555-0100",
                "location": "London, UK",
                "website": "https://adalovelace.dev",
                "linkedin": "linkedin.com/in/adalovelace",
            },
            "summary": "Mathematician and writer, known for work on Charles Babbage's Analytical Engine.",
            "experience": [
                {
                    "position": "Collaborator",
                    "company": "Analytical Engine Project",
                    "startDate": "1842-01",
                    "endDate": "1843-12",
                    "achievements": [
                        "Translated Menabrea's memoir on the Analytical Engine",
                        "Authored the first published algorithm intended for machine execution",
                    ],
                },
            ],
            "education": [
                {
                    "degree": "Private tutoring in mathematics",
                    "institution": "Self-directed, under Augustus De Morgan",
                    "graduationDate": "1840",
                },
            ],
            "skills": {
                "Mathematics": ["Analysis", "Algorithmic thinking"],
                "Languages": ["English", "French", "Italian"],
            },
            "certifications": [],
            "projects": [],
        }),
        DocumentType::CoverLetter => json!({
            "personalInfo": {
                "name": "Ada Lovelace",
                "email": "ada@example.com",
            },
            "recipient": {
                "name": "Charles Babbage",
                "company": "Difference Engine Co.",
            },
            "date": "1843-09-01",
            "body": [
                "I am writing to express my interest in contributing further analysis to the Analytical Engine project.",
                "My recent translation and annotation work demonstrates both the mathematical grounding and the communication clarity this role requires.",
            ],
            "closing": "Sincerely,",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_sample_has_required_fields() {
        let sample = sample_data(DocumentType::Resume);
        assert_eq!(sample["personalInfo"]["name"], "Ada Lovelace");
        assert!(sample["personalInfo"]["email"].is_string());
    }

    #[test]
    fn cover_letter_sample_has_body_as_array() {
        let sample = sample_data(DocumentType::CoverLetter);
        assert!(sample["body"].is_array());
    }
}
