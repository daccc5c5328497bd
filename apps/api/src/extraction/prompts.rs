// Prompt constants for the structured extraction engine.
// The JSON skeleton below IS the schema contract: field names here must
// stay in lockstep with the serde names in crate::schema.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::schema::ValidationError;

/// The full profile shape the model must emit, with every field present.
/// Shown rather than described: smaller local models follow an example far
/// more reliably than a prose schema.
pub const PROFILE_SHAPE: &str = r#"{
  "full_name": "Jane Doe",
  "email": "jane@example.com",
  "phone": "+1 555 0100",
  "links": [
    {"label": "GitHub", "url": "https://github.com/janedoe"},
    {"label": "Portfolio", "url": null}
  ],
  "title": "Senior Backend Engineer",
  "self_summary": "One-paragraph professional summary.",
  "experiences": [
    {
      "position": "Backend Engineer",
      "company": "Acme Corp",
      "location": "Berlin, Germany",
      "start_date": "Mar 2019",
      "end_date": "Present",
      "bullets": ["What was done, as stated in the CV"],
      "skills": ["Python", "PostgreSQL"]
    }
  ],
  "certificates": [
    {"name": "CKA", "issuer": "CNCF", "date": "2022", "link": {"label": "Credly", "url": null}}
  ],
  "languages": [
    {"language": "English", "proficiency": "Native"}
  ],
  "education": [
    {
      "degree": "BSc Computer Science",
      "institution": "TU Berlin",
      "start_date": "2012",
      "end_date": "2015",
      "details": ["Thesis topic, honors, etc."]
    }
  ],
  "volunteer_work": [],
  "skills": [
    {"category": "Programming Languages", "skills": ["Python", "Rust"]}
  ]
}"#;

/// Instruction for the first extraction attempt. The payload is the raw
/// document text.
pub fn extraction_instruction() -> String {
    format!(
        "{JSON_ONLY_SYSTEM}\n\n\
        You are given the plain text of a person's CV. Extract its content \
        into a JSON object with EXACTLY this shape and these field names:\n\n\
        {PROFILE_SHAPE}\n\n\
        RULES:\n\
        1. Copy dates exactly as written — do not reformat or normalize them.\n\
        2. Every field above must be present. If the CV does not state a value, \
        emit an empty string or an empty array — NEVER omit the field and NEVER \
        invent a value.\n\
        3. `skills` must contain at least one category; group the skills the CV \
        actually lists.\n\
        4. Keep entries in the order they appear in the document."
    )
}

/// Instruction for a repair attempt: the previous raw response plus every
/// violated field path, so one retry can fix all of them.
pub fn repair_instruction(previous_response: &str, error: &ValidationError) -> String {
    format!(
        "{base}\n\n\
        Your previous response failed validation.\n\n\
        PREVIOUS RESPONSE:\n{previous_response}\n\n\
        VALIDATION ERRORS (fix every one):\n{violations}\n\n\
        Return the corrected, complete JSON object.",
        base = extraction_instruction(),
        violations = error.as_prompt_lines(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldViolation;

    #[test]
    fn profile_shape_is_valid_json_matching_the_schema() {
        let value: serde_json::Value = serde_json::from_str(PROFILE_SHAPE).unwrap();
        crate::schema::validate_identified(&value).unwrap();
    }

    #[test]
    fn repair_instruction_names_every_violation() {
        let error = ValidationError {
            violations: vec![
                FieldViolation {
                    path: "title".to_string(),
                    problem: "required field is missing".to_string(),
                },
                FieldViolation {
                    path: "skills".to_string(),
                    problem: "must contain at least one skill group".to_string(),
                },
            ],
        };
        let prompt = repair_instruction("{\"bad\": true}", &error);
        assert!(prompt.contains("- title:"));
        assert!(prompt.contains("- skills:"));
        assert!(prompt.contains("{\"bad\": true}"));
    }
}
