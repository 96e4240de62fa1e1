//! Section emitters (§4.4.1). Each function looks up its data via
//! `field_with_fallback` against a documented alias list, returns an
//! empty string when nothing is present, and otherwise emits a section
//! header plus structured Typst blocks. All textual leaves pass through
//! `escape`; URLs render as `link(...)[...]`.

use docgen_types::escape::{escape, escape_string_literal};
use docgen_types::fallback::{field_with_fallback, field_with_fallback_owned, get_path};
use serde_json::Value;

fn heading(title: &str) -> String {
    format!("== {title}\n")
}

fn link(url: &str, display: &str) -> String {
    let display = if display.is_empty() { url } else { display };
    format!("#link(\"{}\")[{}]", escape_string_literal(url), escape(display))
}

/// `personalInfo` header block: centered name, then a `|`-joined contact
/// line. Email is raw-quoted to avoid Typst's automatic link detection
/// turning it into an unstyled autolink.
pub fn header(data: &Value) -> String {
    let Some(info) = data.get("personalInfo") else {
        return String::new();
    };

    let name = field_with_fallback(info, "name", &[], "");
    let email = field_with_fallback(info, "email", &[], "");
    let phone = field_with_fallback(info, "phone", &["phoneNumber"], "");
    let location = field_with_fallback(info, "location", &["address", "city"], "");

    let mut contact_parts = Vec::new();
    if !email.is_empty() {
        contact_parts.push(format!("`{email}`"));
    }
    if !phone.is_empty() {
        contact_parts.push(escape(phone));
    }
    if !location.is_empty() {
        contact_parts.push(escape(location));
    }
    for (key, fallbacks) in [("website", &["url"][..]), ("linkedin", &[]), ("github", &[])] {
        let value = field_with_fallback(info, key, fallbacks, "");
        if !value.is_empty() {
            contact_parts.push(link(value, key));
        }
    }

    format!(
        "#align(center)[\n  #text(size: 16pt, weight: \"bold\")[{}]\n\n  {}\n]\n\n",
        escape(name),
        contact_parts.join(" | ")
    )
}

pub fn summary(data: &Value) -> String {
    let text = field_with_fallback(data, "summary", &["objective", "profile"], "");
    if text.is_empty() {
        return String::new();
    }
    format!("{}{}\n\n", heading("SUMMARY"), escape(text))
}

pub fn experience(data: &Value) -> String {
    let Some(entries) = data.get("experience").and_then(Value::as_array) else {
        return String::new();
    };
    if entries.is_empty() {
        return String::new();
    }

    let mut out = heading("EXPERIENCE");
    for entry in entries {
        let position = field_with_fallback(entry, "position", &["title", "role"], "");
        let company = field_with_fallback(entry, "company", &["employer", "organization"], "");
        let location = field_with_fallback(entry, "location", &[], "");
        let start = field_with_fallback(entry, "startDate", &["start_date"], "");
        let end = field_with_fallback(entry, "endDate", &["end_date"], "Present");

        out.push_str(&format!("=== {}\n", escape(position)));
        let mut meta = Vec::new();
        if !company.is_empty() {
            meta.push(escape(company));
        }
        if !location.is_empty() {
            meta.push(escape(location));
        }
        if !start.is_empty() || !end.is_empty() {
            meta.push(format!("{} -- {}", escape(start), escape(end)));
        }
        if !meta.is_empty() {
            out.push_str(&format!("#text(style: \"italic\")[{}]\n\n", meta.join(" | ")));
        }

        let bullets = entry
            .get("achievements")
            .or_else(|| entry.get("bullets"))
            .or_else(|| entry.get("highlights"))
            .and_then(Value::as_array);
        if let Some(bullets) = bullets {
            for bullet in bullets {
                if let Some(text) = bullet.as_str() {
                    if !text.is_empty() {
                        out.push_str(&format!("- {}\n", escape(text)));
                    }
                }
            }
        }
        out.push('\n');
    }
    out
}

pub fn education(data: &Value) -> String {
    let Some(entries) = data.get("education").and_then(Value::as_array) else {
        return String::new();
    };
    if entries.is_empty() {
        return String::new();
    }

    let mut out = heading("EDUCATION");
    for entry in entries {
        let degree = field_with_fallback(entry, "degree", &["qualification"], "");
        let institution = field_with_fallback(entry, "institution", &["school", "university"], "");
        let date = field_with_fallback(entry, "graduationDate", &["date", "endDate"], "");
        let gpa = field_with_fallback(entry, "gpa", &[], "");

        out.push_str(&format!("=== {}\n", escape(degree)));
        let mut meta = Vec::new();
        if !institution.is_empty() {
            meta.push(escape(institution));
        }
        if !date.is_empty() {
            meta.push(escape(date));
        }
        if !gpa.is_empty() {
            meta.push(format!("GPA: {}", escape(gpa)));
        }
        if !meta.is_empty() {
            out.push_str(&format!("{}\n\n", meta.join(" | ")));
        }
    }
    out
}

pub fn skills(data: &Value) -> String {
    let Some(value) = data.get("skills") else {
        return String::new();
    };

    if let Some(items) = value.as_array() {
        if items.is_empty() {
            return String::new();
        }
        let joined = items
            .iter()
            .filter_map(Value::as_str)
            .map(escape)
            .collect::<Vec<_>>()
            .join(", ");
        return format!("{}{}\n\n", heading("SKILLS"), joined);
    }

    if let Some(categories) = value.as_object() {
        if categories.is_empty() {
            return String::new();
        }
        let mut out = heading("SKILLS");
        for (category, items) in categories {
            let Some(items) = items.as_array() else { continue };
            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .map(escape)
                .collect::<Vec<_>>()
                .join(", ");
            if joined.is_empty() {
                continue;
            }
            out.push_str(&format!("*{}*: {}\n\n", escape(category), joined));
        }
        return out;
    }

    String::new()
}

pub fn certifications(data: &Value) -> String {
    emit_simple_list(data, "certifications", "CERTIFICATIONS", |entry| {
        let name = field_with_fallback(entry, "name", &["title"], "");
        let issuer = field_with_fallback(entry, "issuer", &["organization"], "");
        let date = field_with_fallback(entry, "date", &["issueDate"], "");
        join_nonempty(&[name, issuer, date])
    })
}

pub fn projects(data: &Value) -> String {
    let Some(entries) = data.get("projects").and_then(Value::as_array) else {
        return String::new();
    };
    if entries.is_empty() {
        return String::new();
    }

    let mut out = heading("PROJECTS");
    for entry in entries {
        let name = field_with_fallback(entry, "name", &["title"], "");
        let description = field_with_fallback(entry, "description", &["summary"], "");
        let link_url = field_with_fallback(entry, "link", &["url"], "");

        out.push_str(&format!("=== {}\n", escape(name)));
        if !description.is_empty() {
            out.push_str(&format!("{}\n", escape(description)));
        }
        if let Some(technologies) = entry.get("technologies").and_then(Value::as_array) {
            let joined = technologies
                .iter()
                .filter_map(Value::as_str)
                .map(escape)
                .collect::<Vec<_>>()
                .join(", ");
            if !joined.is_empty() {
                out.push_str(&format!("Technologies: {joined}\n"));
            }
        }
        if !link_url.is_empty() {
            out.push_str(&format!("{}\n", link(link_url, "project link")));
        }
        out.push('\n');
    }
    out
}

pub fn publications(data: &Value) -> String {
    emit_simple_list(data, "publications", "PUBLICATIONS", |entry| {
        let title = field_with_fallback(entry, "title", &[], "");
        let venue = field_with_fallback(entry, "venue", &["publisher"], "");
        let date = field_with_fallback(entry, "date", &["year"], "");
        join_nonempty(&[title, venue, date])
    })
}

pub fn awards(data: &Value) -> String {
    emit_simple_list(data, "awards", "AWARDS", |entry| {
        let title = field_with_fallback(entry, "title", &["name"], "");
        let issuer = field_with_fallback(entry, "issuer", &["organization"], "");
        let date = field_with_fallback(entry, "date", &[], "");
        join_nonempty(&[title, issuer, date])
    })
}

pub fn languages(data: &Value) -> String {
    let Some(entries) = data.get("languages").and_then(Value::as_array) else {
        return String::new();
    };
    if entries.is_empty() {
        return String::new();
    }

    let items: Vec<String> = entries
        .iter()
        .map(|entry| {
            if let Some(s) = entry.as_str() {
                escape(s)
            } else {
                let name = field_with_fallback(entry, "name", &["language"], "");
                let proficiency = field_with_fallback(entry, "proficiency", &["level"], "");
                if proficiency.is_empty() {
                    escape(name)
                } else {
                    format!("{} ({})", escape(name), escape(proficiency))
                }
            }
        })
        .filter(|s| !s.is_empty())
        .collect();

    if items.is_empty() {
        return String::new();
    }
    format!("{}{}\n\n", heading("LANGUAGES"), items.join(", "))
}

pub fn volunteer(data: &Value) -> String {
    let Some(entries) = data
        .get("volunteer")
        .or_else(|| data.get("volunteerWork"))
        .and_then(Value::as_array)
    else {
        return String::new();
    };
    if entries.is_empty() {
        return String::new();
    }

    let mut out = heading("VOLUNTEER EXPERIENCE");
    for entry in entries {
        let role = field_with_fallback(entry, "role", &["position", "title"], "");
        let organization = field_with_fallback(entry, "organization", &["company"], "");
        let date = field_with_fallback_owned(entry, "date", &["startDate"], "");

        out.push_str(&format!("=== {}\n", escape(role)));
        let meta = join_nonempty(&[organization, &date]);
        if !meta.is_empty() {
            out.push_str(&format!("{meta}\n"));
        }
        out.push('\n');
    }
    out
}

pub fn references(data: &Value) -> String {
    match data.get("references") {
        Some(Value::String(s)) if s.eq_ignore_ascii_case("available upon request") => {
            format!("{}Available upon request.\n\n", heading("REFERENCES"))
        }
        Some(Value::Array(entries)) if !entries.is_empty() => {
            let mut out = heading("REFERENCES");
            for entry in entries {
                let name = field_with_fallback(entry, "name", &[], "");
                let relation = field_with_fallback(entry, "relationship", &["title"], "");
                let contact = field_with_fallback(entry, "contact", &["email", "phone"], "");
                out.push_str(&format!("{}\n", join_nonempty(&[name, relation, contact])));
            }
            out.push('\n');
            out
        }
        _ => String::new(),
    }
}

fn emit_simple_list(
    data: &Value,
    key: &str,
    title: &str,
    line_of: impl Fn(&Value) -> String,
) -> String {
    let Some(entries) = data.get(key).and_then(Value::as_array) else {
        return String::new();
    };
    if entries.is_empty() {
        return String::new();
    }

    let mut out = heading(title);
    for entry in entries {
        let line = line_of(entry);
        if !line.is_empty() {
            out.push_str(&format!("- {line}\n"));
        }
    }
    out.push('\n');
    out
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| escape(p))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Resolve a dotted-path lookup and escape the result, or empty string.
pub fn escaped_path(data: &Value, path: &str) -> String {
    get_path(data, path)
        .and_then(Value::as_str)
        .map(escape)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_omitted_when_absent() {
        assert_eq!(summary(&json!({})), "");
    }

    #[test]
    fn empty_experience_array_omits_section() {
        assert_eq!(experience(&json!({"experience": []})), "");
    }

    #[test]
    fn experience_uses_title_fallback_for_position() {
        let data = json!({"experience": [{"title": "Engineer", "company": "Acme"}]});
        let out = experience(&data);
        assert!(out.contains("=== Engineer"));
        assert!(out.contains("Acme"));
    }

    #[test]
    fn header_email_is_raw_quoted() {
        let data = json!({"personalInfo": {"name": "A B", "email": "a@b.co"}});
        let out = header(&data);
        assert!(out.contains("`a@b.co`"));
    }

    #[test]
    fn skills_accepts_flat_array_or_categorized_object() {
        let flat = json!({"skills": ["Rust", "Python"]});
        assert!(skills(&flat).contains("Rust, Python"));

        let categorized = json!({"skills": {"Languages": ["Rust"]}});
        assert!(skills(&categorized).contains("*Languages*: Rust"));
    }

    #[test]
    fn references_available_upon_request_literal() {
        let data = json!({"references": "Available upon request"});
        assert!(references(&data).contains("Available upon request."));
    }

    #[test]
    fn special_characters_in_summary_are_escaped() {
        let data = json!({"summary": "C# & $5 value_prop"});
        let out = summary(&data);
        assert!(out.contains("C\\#"));
        assert!(out.contains("\\$5"));
        assert!(out.contains("value\\_prop"));
    }
}
