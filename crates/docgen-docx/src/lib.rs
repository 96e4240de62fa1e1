//! DOCX generator (C6): a side-channel path triggered when
//! `format = docx`. Bypasses the Typst pipeline entirely and emits a
//! Word document straight from validated data.

use docgen_types::fallback::field_with_fallback;
use docgen_types::model::DocumentType;
use docx_rs::{AlignmentType, Docx, Paragraph, Run, RunFonts};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("docx serialization failed: {0}")]
    SerializationFailed(String),
}

/// DOCX output never passes through `escape()` (that's a Typst-markup
/// concern) — plain text goes straight into Word runs.
fn plain(text: &str) -> &str {
    text
}

fn field<'a>(data: &'a Value, primary: &str, fallbacks: &[&str]) -> &'a str {
    field_with_fallback(data, primary, fallbacks, "")
}

/// Build the DOCX byte stream for `data`, along with the suggested
/// filename `{type}_{name_with_underscores}.docx`.
pub fn generate_docx(document_type: DocumentType, data: &Value) -> Result<(Vec<u8>, String), DocxError> {
    let personal_info = data
        .get("personalInfo")
        .ok_or_else(|| DocxError::MissingField("personalInfo".to_string()))?;
    let name = field(personal_info, "name", &[]);
    if name.is_empty() {
        return Err(DocxError::MissingField("personalInfo.name".to_string()));
    }

    let docx = match document_type {
        DocumentType::Resume => build_resume(data, personal_info),
        DocumentType::CoverLetter => build_cover_letter(data, personal_info),
    };

    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut std::io::Cursor::new(&mut buffer))
        .map_err(|e| DocxError::SerializationFailed(e.to_string()))?;

    let filename = format!(
        "{}_{}.docx",
        document_type.as_str(),
        name.replace(' ', "_")
    );

    Ok((buffer, filename))
}

fn heading_paragraph(title: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(title).bold().size(24))
}

fn build_resume(data: &Value, personal_info: &Value) -> Docx {
    let mut docx = Docx::new();

    let name = field(personal_info, "name", &[]);
    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(
                Run::new()
                    .add_text(plain(name))
                    .bold()
                    .size(32)
                    .fonts(RunFonts::new().ascii("Calibri")),
            )
            .align(AlignmentType::Center),
    );

    let contact_line = [
        field(personal_info, "email", &[]),
        field(personal_info, "phone", &["phoneNumber"]),
        field(personal_info, "location", &["address", "city"]),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" | ");

    if !contact_line.is_empty() {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(plain(&contact_line)))
                .align(AlignmentType::Center),
        );
    }

    if let Some(summary) = data.get("summary").and_then(Value::as_str) {
        if !summary.is_empty() {
            docx = docx.add_paragraph(heading_paragraph("SUMMARY"));
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(plain(summary))));
        }
    }

    if let Some(entries) = data.get("experience").and_then(Value::as_array) {
        if !entries.is_empty() {
            docx = docx.add_paragraph(heading_paragraph("EXPERIENCE"));
            for entry in entries {
                let position = field(entry, "position", &["title", "role"]);
                let company = field(entry, "company", &["employer", "organization"]);
                let start = field(entry, "startDate", &["start_date"]);
                let end = field(entry, "endDate", &["end_date"]);
                let date_range = if start.is_empty() && end.is_empty() {
                    String::new()
                } else {
                    format!("{start} - {}", if end.is_empty() { "Present" } else { end })
                };

                docx = docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(plain(position)).bold())
                        .add_run(Run::new().add_tab())
                        .add_run(Run::new().add_text(plain(&date_range)).italic()),
                );
                if !company.is_empty() {
                    docx = docx.add_paragraph(
                        Paragraph::new().add_run(Run::new().add_text(plain(company)).italic()),
                    );
                }

                let bullets = entry
                    .get("achievements")
                    .or_else(|| entry.get("bullets"))
                    .and_then(Value::as_array);
                if let Some(bullets) = bullets {
                    for bullet in bullets {
                        if let Some(text) = bullet.as_str() {
                            if !text.is_empty() {
                                docx = docx.add_paragraph(
                                    Paragraph::new()
                                        .add_run(Run::new().add_text(plain(&format!("\u{2022} {text}")))),
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    if let Some(entries) = data.get("education").and_then(Value::as_array) {
        if !entries.is_empty() {
            docx = docx.add_paragraph(heading_paragraph("EDUCATION"));
            for entry in entries {
                let degree = field(entry, "degree", &["qualification"]);
                let institution = field(entry, "institution", &["school", "university"]);
                let date = field(entry, "graduationDate", &["date"]);
                let gpa = field(entry, "gpa", &[]);

                let mut line = format!("{degree}, {institution}");
                if !date.is_empty() {
                    line.push_str(&format!(" ({date})"));
                }
                if !gpa.is_empty() {
                    line.push_str(&format!(" — GPA: {gpa}"));
                }
                docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(plain(&line))));
            }
        }
    }

    if let Some(skills) = data.get("skills") {
        let bullets: Vec<String> = if let Some(items) = skills.as_array() {
            items.iter().filter_map(Value::as_str).map(str::to_string).collect()
        } else if let Some(categories) = skills.as_object() {
            categories
                .iter()
                .filter_map(|(category, items)| {
                    let items = items.as_array()?;
                    let joined = items
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    Some(format!("{category}: {joined}"))
                })
                .collect()
        } else {
            Vec::new()
        };

        if !bullets.is_empty() {
            docx = docx.add_paragraph(heading_paragraph("SKILLS"));
            if skills.is_array() {
                docx = docx.add_paragraph(
                    Paragraph::new().add_run(Run::new().add_text(plain(&bullets.join(", ")))),
                );
            } else {
                for line in &bullets {
                    docx = docx.add_paragraph(
                        Paragraph::new().add_run(Run::new().add_text(plain(&format!("\u{2022} {line}")))),
                    );
                }
            }
        }
    }

    docx
}

fn build_cover_letter(data: &Value, personal_info: &Value) -> Docx {
    let mut docx = Docx::new();

    let name = field(personal_info, "name", &[]);
    docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(plain(name)).bold()));

    let date = field(data, "date", &[]);
    if !date.is_empty() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(plain(date))));
    }

    let salutation = field(data, "salutation", &[]);
    if !salutation.is_empty() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(plain(salutation))));
    }

    match data.get("body") {
        Some(Value::String(s)) if !s.is_empty() => {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(plain(s))));
        }
        Some(Value::Array(items)) => {
            for item in items {
                if let Some(s) = item.as_str() {
                    if !s.is_empty() {
                        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(plain(s))));
                    }
                }
            }
        }
        _ => {}
    }

    let closing = field(data, "closing", &[]);
    docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(if closing.is_empty() {
        "Sincerely,"
    } else {
        closing
    })));
    docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(plain(name))));

    docx
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_personal_info_is_rejected() {
        let err = generate_docx(DocumentType::Resume, &json!({})).unwrap_err();
        assert!(matches!(err, DocxError::MissingField(_)));
    }

    #[test]
    fn resume_produces_nonempty_pdf_bytes_and_filename() {
        let data = json!({
            "personalInfo": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "summary": "Mathematician.",
        });
        let (bytes, filename) = generate_docx(DocumentType::Resume, &data).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(filename, "resume_Ada_Lovelace.docx");
    }

    #[test]
    fn cover_letter_filename_uses_underscored_name() {
        let data = json!({
            "personalInfo": {"name": "A B", "email": "a@b.co"},
            "body": "Hello.",
        });
        let (_, filename) = generate_docx(DocumentType::CoverLetter, &data).unwrap();
        assert_eq!(filename, "cover_letter_A_B.docx");
    }
}
