//! Tailoring — regenerates the non-identity part of a profile against a
//! target role description, then re-attaches the untouched identity fields.
//!
//! The defining property: `full_name`, `email`, `phone`, and `links` are
//! copied verbatim from the base profile and never cross the model boundary,
//! removing contact-detail fabrication structurally. The no-new-facts rule
//! for everything else is prompt-enforced only — the engine validates shape,
//! not factual grounding.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::MAX_ATTEMPTS;
use crate::llm_client::{strip_json_fences, GenerateText, LlmError};
use crate::schema::{validate_record, IdentifiedProfile, ProfileRecord, ValidationError};
use crate::tailoring::prompts::{repair_instruction, tailoring_instruction};

#[derive(Debug, Error)]
pub enum TailoringError {
    #[error("generation capability failed: {0}")]
    Generation(#[from] LlmError),

    #[error("tailoring failed after {attempts} attempts: {last}")]
    AttemptsExhausted {
        attempts: u32,
        last: ValidationError,
    },

    #[error("failed to serialize the base profile: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct ProfileTailor {
    llm: Arc<dyn GenerateText>,
}

impl ProfileTailor {
    pub fn new(llm: Arc<dyn GenerateText>) -> Self {
        Self { llm }
    }

    /// Produces a role-tailored profile from a base profile, a free-text
    /// narrative, and the target role description.
    pub async fn tailor(
        &self,
        base: IdentifiedProfile,
        narrative: &str,
        role_description: &str,
    ) -> Result<IdentifiedProfile, TailoringError> {
        // Identity fields stay on this side of the model boundary.
        let IdentifiedProfile {
            full_name,
            email,
            phone,
            links,
            record: base_record,
        } = base;

        let base_record_json = serde_json::to_string_pretty(&base_record)?;

        let mut attempt: u32 = 1;
        let mut instruction = tailoring_instruction(&base_record_json, narrative);

        loop {
            let raw = self.llm.invoke(&instruction, role_description).await?;

            match parse_and_validate(&raw) {
                Ok(record) => {
                    info!(
                        "tailoring succeeded on attempt {attempt}: {} experience entries kept",
                        record.experiences.len()
                    );
                    return Ok(IdentifiedProfile::from_record(
                        record, full_name, email, phone, links,
                    ));
                }
                Err(error) => {
                    warn!(
                        "tailoring attempt {attempt}/{MAX_ATTEMPTS} failed validation: {}",
                        error.describe()
                    );
                    if attempt == MAX_ATTEMPTS {
                        return Err(TailoringError::AttemptsExhausted {
                            attempts: attempt,
                            last: error,
                        });
                    }
                    instruction = repair_instruction(&base_record_json, narrative, &raw, &error);
                    attempt += 1;
                }
            }
        }
    }
}

fn parse_and_validate(raw: &str) -> Result<ProfileRecord, ValidationError> {
    let stripped = strip_json_fences(raw);
    let value: serde_json::Value =
        serde_json::from_str(stripped).map_err(ValidationError::not_json)?;
    validate_record(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use crate::schema::{Experience, Link, SkillGroup};

    struct ScriptedGenerator {
        responses: Vec<String>,
        calls: AtomicU32,
        instructions: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<String>) -> Self {
            Self {
                responses,
                calls: AtomicU32::new(0),
                instructions: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerateText for ScriptedGenerator {
        async fn invoke(&self, instruction: &str, _payload: &str) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            self.instructions
                .lock()
                .unwrap()
                .push(instruction.to_string());
            Ok(self.responses[n.min(self.responses.len() - 1)].clone())
        }
    }

    fn base_profile() -> IdentifiedProfile {
        IdentifiedProfile::from_record(
            ProfileRecord {
                title: "Backend Engineer".to_string(),
                summary: "Backend engineer with Python focus.".to_string(),
                experiences: vec![Experience {
                    position: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    location: "Remote".to_string(),
                    start_date: "2019".to_string(),
                    end_date: "2023".to_string(),
                    bullets: vec!["Built the billing pipeline".to_string()],
                    skills: None,
                }],
                certificates: vec![],
                languages: vec![],
                education: vec![],
                volunteer: vec![],
                skills: vec![SkillGroup {
                    category: "Programming".to_string(),
                    skills: vec!["Python".to_string()],
                }],
            },
            "Jane Doe".to_string(),
            "jane@x.com".to_string(),
            "+1 555 0100".to_string(),
            vec![Link {
                label: "GitHub".to_string(),
                url: Some("https://github.com/janedoe".to_string()),
            }],
        )
    }

    fn tailored_record_json() -> String {
        serde_json::json!({
            "title": "Platform Engineer",
            "self_summary": "Engineer focused on billing platforms.",
            "experiences": [{
                "position": "Engineer",
                "company": "Acme",
                "location": "Remote",
                "start_date": "2019",
                "end_date": "2023",
                "bullets": ["Owned the billing pipeline end to end"],
                "skills": ["Python"]
            }],
            "certificates": [],
            "languages": [],
            "education": [],
            "volunteer_work": [],
            "skills": [{"category": "Programming", "skills": ["Python"]}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn identity_fields_are_preserved_verbatim() {
        let stub = Arc::new(ScriptedGenerator::new(vec![tailored_record_json()]));
        let engine = ProfileTailor::new(stub.clone());
        let base = base_profile();

        let tailored = engine
            .tailor(base.clone(), "I also mentored juniors.", "Platform role")
            .await
            .unwrap();

        assert_eq!(tailored.full_name, base.full_name);
        assert_eq!(tailored.email, base.email);
        assert_eq!(tailored.phone, base.phone);
        assert_eq!(tailored.links, base.links);
        assert_eq!(tailored.record.title, "Platform Engineer");
    }

    #[tokio::test]
    async fn identity_fields_never_reach_the_prompt() {
        let stub = Arc::new(ScriptedGenerator::new(vec![tailored_record_json()]));
        let engine = ProfileTailor::new(stub.clone());

        engine
            .tailor(base_profile(), "story", "role")
            .await
            .unwrap();

        let instructions = stub.instructions.lock().unwrap();
        assert!(!instructions[0].contains("jane@x.com"));
        assert!(!instructions[0].contains("+1 555 0100"));
        // Non-identity content is embedded.
        assert!(instructions[0].contains("Acme"));
        assert!(instructions[0].contains("story"));
    }

    #[tokio::test]
    async fn model_emitted_identity_fields_are_ignored() {
        // Even if the model disobeys and emits contact fields, the attached
        // identity comes from the base profile, not the response.
        let mut value: serde_json::Value =
            serde_json::from_str(&tailored_record_json()).unwrap();
        value["full_name"] = serde_json::json!("Someone Else");
        value["email"] = serde_json::json!("attacker@example.com");
        let stub = Arc::new(ScriptedGenerator::new(vec![value.to_string()]));
        let engine = ProfileTailor::new(stub);

        let tailored = engine
            .tailor(base_profile(), "", "role")
            .await
            .unwrap();

        assert_eq!(tailored.full_name, "Jane Doe");
        assert_eq!(tailored.email, "jane@x.com");
    }

    #[tokio::test]
    async fn invalid_responses_exhaust_exactly_max_attempts() {
        let stub = Arc::new(ScriptedGenerator::new(vec![
            r#"{"title": "no skills"}"#.to_string(),
        ]));
        let engine = ProfileTailor::new(stub.clone());

        let err = engine
            .tailor(base_profile(), "", "role")
            .await
            .unwrap_err();

        assert_eq!(stub.calls(), MAX_ATTEMPTS);
        match err {
            TailoringError::AttemptsExhausted { attempts, last } => {
                assert_eq!(attempts, MAX_ATTEMPTS);
                assert!(last.violations.iter().any(|v| v.path == "skills"));
            }
            other => panic!("expected AttemptsExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn repair_attempt_carries_previous_response_and_violations() {
        let stub = Arc::new(ScriptedGenerator::new(vec![
            r#"{"title": "incomplete"}"#.to_string(),
            tailored_record_json(),
        ]));
        let engine = ProfileTailor::new(stub.clone());

        engine.tailor(base_profile(), "", "role").await.unwrap();

        assert_eq!(stub.calls(), 2);
        let instructions = stub.instructions.lock().unwrap();
        assert!(instructions[1].contains("incomplete"));
        assert!(instructions[1].contains("- self_summary:"));
    }
}
