//! Structural validation of model-emitted CV documents.
//!
//! Validates a parsed JSON value against the profile shape and collects
//! *every* violated field path — not just the first — so a single repair
//! prompt can address all issues in one retry instead of iterating
//! field-by-field.

use serde_json::{Map, Value};

use super::{IdentifiedProfile, ProfileRecord};

/// One violated field, addressed by its dotted wire-name path
/// (e.g. `experiences[2].company`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub path: String,
    pub problem: String,
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn describe(&self) -> String {
        let fields: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.path, v.problem))
            .collect();
        format!(
            "{} field(s) failed validation: {}",
            self.violations.len(),
            fields.join("; ")
        )
    }

    /// Violations as one-per-line bullet text for a repair prompt.
    pub fn as_prompt_lines(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("- {}: {}", v.path, v.problem))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A parse failure of the raw model text, treated identically to a
    /// shape violation for retry purposes.
    pub fn not_json(detail: impl std::fmt::Display) -> Self {
        Self {
            violations: vec![FieldViolation {
                path: "$".to_string(),
                problem: format!("response was not a valid JSON object: {detail}"),
            }],
        }
    }
}

/// Validates a candidate against the identified-profile shape (identity
/// fields plus the full record).
pub fn validate_identified(candidate: &Value) -> Result<IdentifiedProfile, ValidationError> {
    let mut violations = Vec::new();
    if let Some(obj) = as_object(candidate, "$", &mut violations) {
        require_str(obj, "full_name", &mut violations);
        require_str(obj, "email", &mut violations);
        require_str(obj, "phone", &mut violations);
        check_optional_array(obj, "links", &mut violations, check_link);
        check_record_fields(obj, &mut violations);
    }
    finish(candidate, violations)
}

/// Validates a candidate against the record shape (no identity fields).
pub fn validate_record(candidate: &Value) -> Result<ProfileRecord, ValidationError> {
    let mut violations = Vec::new();
    if let Some(obj) = as_object(candidate, "$", &mut violations) {
        check_record_fields(obj, &mut violations);
    }
    finish(candidate, violations)
}

fn finish<T: serde::de::DeserializeOwned>(
    candidate: &Value,
    mut violations: Vec<FieldViolation>,
) -> Result<T, ValidationError> {
    if violations.is_empty() {
        match serde_json::from_value(candidate.clone()) {
            Ok(typed) => return Ok(typed),
            Err(e) => violations.push(FieldViolation {
                path: "$".to_string(),
                problem: format!("well-formed but failed to deserialize: {e}"),
            }),
        }
    }
    Err(ValidationError { violations })
}

fn check_record_fields(obj: &Map<String, Value>, out: &mut Vec<FieldViolation>) {
    require_str(obj, "title", out);
    require_str(obj, "self_summary", out);
    check_optional_array(obj, "experiences", out, check_experience);
    check_optional_array(obj, "certificates", out, check_certificate);
    check_optional_array(obj, "languages", out, check_language);
    check_optional_array(obj, "education", out, check_education);
    check_optional_array(obj, "volunteer_work", out, check_experience);

    // The one cross-field invariant: at least one skill group.
    match obj.get("skills") {
        Some(Value::Array(groups)) if !groups.is_empty() => {
            for (i, group) in groups.iter().enumerate() {
                check_skill_group(group, &format!("skills[{i}]"), out);
            }
        }
        Some(Value::Array(_)) | None => out.push(FieldViolation {
            path: "skills".to_string(),
            problem: "must contain at least one skill group".to_string(),
        }),
        Some(_) => out.push(FieldViolation {
            path: "skills".to_string(),
            problem: "must be an array of skill groups".to_string(),
        }),
    }
}

fn check_experience(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    let Some(obj) = as_object(value, path, out) else {
        return;
    };
    for field in ["position", "company", "location", "start_date", "end_date"] {
        require_str_at(obj, path, field, out);
    }
    // Required-present, may be empty. Omission is what triggers the repair loop.
    match obj.get("bullets") {
        Some(value) => check_string_array(value, &format!("{path}.bullets"), out),
        None => out.push(FieldViolation {
            path: format!("{path}.bullets"),
            problem: "required field is missing (use an empty array if there are none)"
                .to_string(),
        }),
    }
    if let Some(value) = obj.get("skills") {
        if !value.is_null() {
            check_string_array(value, &format!("{path}.skills"), out);
        }
    }
}

fn check_certificate(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    let Some(obj) = as_object(value, path, out) else {
        return;
    };
    for field in ["name", "issuer", "date"] {
        require_str_at(obj, path, field, out);
    }
    if let Some(link) = obj.get("link") {
        if !link.is_null() {
            check_link(link, &format!("{path}.link"), out);
        }
    }
}

fn check_language(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    let Some(obj) = as_object(value, path, out) else {
        return;
    };
    require_str_at(obj, path, "language", out);
    require_str_at(obj, path, "proficiency", out);
}

fn check_education(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    let Some(obj) = as_object(value, path, out) else {
        return;
    };
    for field in ["degree", "institution", "start_date", "end_date"] {
        require_str_at(obj, path, field, out);
    }
    if let Some(details) = obj.get("details") {
        if !details.is_null() {
            check_string_array(details, &format!("{path}.details"), out);
        }
    }
}

fn check_skill_group(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    let Some(obj) = as_object(value, path, out) else {
        return;
    };
    require_str_at(obj, path, "category", out);
    match obj.get("skills") {
        Some(value) => check_string_array(value, &format!("{path}.skills"), out),
        None => out.push(FieldViolation {
            path: format!("{path}.skills"),
            problem: "required field is missing".to_string(),
        }),
    }
}

fn check_link(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    let Some(obj) = as_object(value, path, out) else {
        return;
    };
    require_str_at(obj, path, "label", out);
    if let Some(url) = obj.get("url") {
        if !url.is_null() && !url.is_string() {
            out.push(FieldViolation {
                path: format!("{path}.url"),
                problem: "must be a string or null".to_string(),
            });
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────────────

fn as_object<'a>(
    value: &'a Value,
    path: &str,
    out: &mut Vec<FieldViolation>,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(obj) => Some(obj),
        None => {
            out.push(FieldViolation {
                path: path.to_string(),
                problem: "must be a JSON object".to_string(),
            });
            None
        }
    }
}

fn require_str(obj: &Map<String, Value>, field: &str, out: &mut Vec<FieldViolation>) {
    match obj.get(field) {
        Some(Value::String(_)) => {}
        Some(_) => out.push(FieldViolation {
            path: field.to_string(),
            problem: "must be a string".to_string(),
        }),
        None => out.push(FieldViolation {
            path: field.to_string(),
            problem: "required field is missing (use an empty string if unknown)".to_string(),
        }),
    }
}

fn require_str_at(
    obj: &Map<String, Value>,
    parent: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    match obj.get(field) {
        Some(Value::String(_)) => {}
        Some(_) => out.push(FieldViolation {
            path: format!("{parent}.{field}"),
            problem: "must be a string".to_string(),
        }),
        None => out.push(FieldViolation {
            path: format!("{parent}.{field}"),
            problem: "required field is missing (use an empty string if unknown)".to_string(),
        }),
    }
}

fn check_string_array(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    match value.as_array() {
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    out.push(FieldViolation {
                        path: format!("{path}[{i}]"),
                        problem: "must be a string".to_string(),
                    });
                }
            }
        }
        None => out.push(FieldViolation {
            path: path.to_string(),
            problem: "must be an array of strings".to_string(),
        }),
    }
}

fn check_optional_array(
    obj: &Map<String, Value>,
    field: &str,
    out: &mut Vec<FieldViolation>,
    check_element: fn(&Value, &str, &mut Vec<FieldViolation>),
) {
    match obj.get(field) {
        None => {} // absent collections deserialize as empty
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_element(item, &format!("{field}[{i}]"), out);
            }
        }
        Some(_) => out.push(FieldViolation {
            path: field.to_string(),
            problem: "must be an array".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Value {
        json!({
            "title": "Backend Engineer",
            "self_summary": "Builds reliable services.",
            "experiences": [{
                "position": "Engineer",
                "company": "Acme",
                "location": "Remote",
                "start_date": "2019",
                "end_date": "2023",
                "bullets": ["Shipped the billing service"],
                "skills": ["Python"]
            }],
            "certificates": [],
            "languages": [],
            "education": [],
            "volunteer_work": [],
            "skills": [{"category": "Languages", "skills": ["Python", "Rust"]}]
        })
    }

    fn valid_identified() -> Value {
        let mut value = valid_record();
        let obj = value.as_object_mut().unwrap();
        obj.insert("full_name".into(), json!("Jane Doe"));
        obj.insert("email".into(), json!("jane@x.com"));
        obj.insert("phone".into(), json!("+1 555 0100"));
        obj.insert("links".into(), json!([{"label": "GitHub", "url": "https://github.com/janedoe"}]));
        value
    }

    #[test]
    fn accepts_valid_record() {
        let record = validate_record(&valid_record()).unwrap();
        assert_eq!(record.title, "Backend Engineer");
        assert_eq!(record.skills.len(), 1);
    }

    #[test]
    fn accepts_valid_identified_profile() {
        let profile = validate_identified(&valid_identified()).unwrap();
        assert_eq!(profile.full_name, "Jane Doe");
        assert_eq!(profile.record.experiences[0].company, "Acme");
    }

    #[test]
    fn rejects_empty_skills() {
        let mut value = valid_record();
        value["skills"] = json!([]);
        let err = validate_record(&value).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].path, "skills");
    }

    #[test]
    fn rejects_missing_skills() {
        let mut value = valid_record();
        value.as_object_mut().unwrap().remove("skills");
        let err = validate_record(&value).unwrap_err();
        assert!(err.violations.iter().any(|v| v.path == "skills"));
    }

    #[test]
    fn accepts_one_nonempty_skill_group() {
        let mut value = valid_record();
        value["skills"] = json!([{"category": "Core", "skills": ["Rust"]}]);
        assert!(validate_record(&value).is_ok());
    }

    #[test]
    fn collects_every_violation_not_just_the_first() {
        let mut value = valid_record();
        let obj = value.as_object_mut().unwrap();
        obj.remove("title");
        obj.insert("skills".into(), json!([]));
        obj["experiences"][0].as_object_mut().unwrap().remove("company");
        let err = validate_record(&value).unwrap_err();
        let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"title"));
        assert!(paths.contains(&"skills"));
        assert!(paths.contains(&"experiences[0].company"));
        assert_eq!(err.violations.len(), 3);
    }

    #[test]
    fn nested_paths_carry_indices() {
        let mut value = valid_record();
        value["experiences"]
            .as_array_mut()
            .unwrap()
            .push(json!({"position": "Dev"}));
        let err = validate_record(&value).unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.path == "experiences[1].bullets"));
        assert!(err
            .violations
            .iter()
            .any(|v| v.path == "experiences[1].company"));
    }

    #[test]
    fn bullets_must_be_present_but_may_be_empty() {
        let mut value = valid_record();
        value["experiences"][0]["bullets"] = json!([]);
        assert!(validate_record(&value).is_ok());

        value["experiences"][0]
            .as_object_mut()
            .unwrap()
            .remove("bullets");
        let err = validate_record(&value).unwrap_err();
        assert_eq!(err.violations[0].path, "experiences[0].bullets");
    }

    #[test]
    fn certificate_without_link_validates() {
        let mut value = valid_record();
        value["certificates"] = json!([{"name": "CKA", "issuer": "CNCF", "date": "2022"}]);
        assert!(validate_record(&value).is_ok());
    }

    #[test]
    fn link_without_url_validates() {
        let mut value = valid_record();
        value["certificates"] =
            json!([{"name": "CKA", "issuer": "CNCF", "date": "2022", "link": {"label": "Credly"}}]);
        assert!(validate_record(&value).is_ok());
    }

    #[test]
    fn link_with_non_string_url_is_rejected() {
        let mut value = valid_record();
        value["certificates"] = json!([{
            "name": "CKA", "issuer": "CNCF", "date": "2022",
            "link": {"label": "Credly", "url": 42}
        }]);
        let err = validate_record(&value).unwrap_err();
        assert_eq!(err.violations[0].path, "certificates[0].link.url");
    }

    #[test]
    fn wrong_type_is_reported_with_path() {
        let mut value = valid_record();
        value["title"] = json!(["not", "a", "string"]);
        let err = validate_record(&value).unwrap_err();
        assert_eq!(err.violations[0].path, "title");
        assert!(err.violations[0].problem.contains("string"));
    }

    #[test]
    fn identified_requires_identity_fields() {
        let err = validate_identified(&valid_record()).unwrap_err();
        let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"full_name"));
        assert!(paths.contains(&"email"));
        assert!(paths.contains(&"phone"));
    }

    #[test]
    fn non_object_candidate_is_a_single_violation() {
        let err = validate_record(&json!("just a string")).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].path, "$");
    }

    #[test]
    fn missing_collections_are_tolerated() {
        let value = json!({
            "title": "Engineer",
            "self_summary": "Summary",
            "skills": [{"category": "Core", "skills": ["Rust"]}]
        });
        let record = validate_record(&value).unwrap();
        assert!(record.experiences.is_empty());
    }

    #[test]
    fn describe_names_every_field() {
        let mut value = valid_record();
        let obj = value.as_object_mut().unwrap();
        obj.remove("title");
        obj.remove("self_summary");
        let err = validate_record(&value).unwrap_err();
        let text = err.describe();
        assert!(text.contains("title"));
        assert!(text.contains("self_summary"));
        assert!(text.starts_with("2 field(s)"));
    }
}
