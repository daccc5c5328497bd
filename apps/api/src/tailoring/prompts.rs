// Prompt constants for the tailoring engine.
//
// Identity fields never appear here: the instruction is built from the
// stripped record, so misstated contact details are impossible by
// construction rather than by prompting.

use crate::llm_client::prompts::{IDENTITY_INSTRUCTION, JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};
use crate::schema::ValidationError;

/// The record shape the model must emit — the profile without identity
/// fields. Field names must stay in lockstep with crate::schema.
pub const RECORD_SHAPE: &str = r#"{
  "title": "Senior Backend Engineer",
  "self_summary": "One-paragraph professional summary tailored to the role.",
  "experiences": [
    {
      "position": "Backend Engineer",
      "company": "Acme Corp",
      "location": "Berlin, Germany",
      "start_date": "Mar 2019",
      "end_date": "Present",
      "bullets": ["Reworded to emphasize what the role asks for"],
      "skills": ["Python", "PostgreSQL"]
    }
  ],
  "certificates": [
    {"name": "CKA", "issuer": "CNCF", "date": "2022", "link": null}
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
      "details": []
    }
  ],
  "volunteer_work": [],
  "skills": [
    {"category": "Programming Languages", "skills": ["Python", "Rust"]}
  ]
}"#;

/// Instruction for a tailoring attempt. The base CV and the narrative are
/// embedded here as the only permitted source material; the payload is the
/// target role description.
pub fn tailoring_instruction(base_record_json: &str, narrative: &str) -> String {
    let narrative_block = if narrative.trim().is_empty() {
        "(none provided)".to_string()
    } else {
        narrative.to_string()
    };
    format!(
        "{JSON_ONLY_SYSTEM}\n\n\
        You are an expert CV writer. Rework the CV below so it is tailored to \
        the job description supplied by the user, emphasizing the most relevant \
        experience and skills and rewording bullets in the language of the role.\n\n\
        {NO_FABRICATION_INSTRUCTION}\n\n\
        {IDENTITY_INSTRUCTION}\n\n\
        CURRENT CV (source of truth, together with the background story):\n\
        {base_record_json}\n\n\
        BACKGROUND STORY from the candidate (may add detail, not new facts \
        beyond what it states):\n\
        {narrative_block}\n\n\
        Respond with a JSON object of EXACTLY this shape and these field names:\n\
        {RECORD_SHAPE}\n\n\
        RULES:\n\
        1. Keep dates, employers, institutions, and credentials exactly as given.\n\
        2. Every field above must be present; use an empty string or array when \
        there is nothing to say.\n\
        3. `skills` must keep at least one category, drawn only from the CV and \
        the background story.\n\
        4. You may drop or reorder entries to fit the role; you may not add new ones."
    )
}

/// Repair instruction embedding the previous raw response and every
/// violated field path.
pub fn repair_instruction(
    base_record_json: &str,
    narrative: &str,
    previous_response: &str,
    error: &ValidationError,
) -> String {
    format!(
        "{base}\n\n\
        Your previous response failed validation.\n\n\
        PREVIOUS RESPONSE:\n{previous_response}\n\n\
        VALIDATION ERRORS (fix every one):\n{violations}\n\n\
        Return the corrected, complete JSON object.",
        base = tailoring_instruction(base_record_json, narrative),
        violations = error.as_prompt_lines(),
    )
}
