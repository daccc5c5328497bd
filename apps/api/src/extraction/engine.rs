//! Structured extraction — turns extracted CV text into a validated
//! [`IdentifiedProfile`] by instructing the generation capability and
//! repairing its output.
//!
//! Flow: compose instruction → invoke → fence-strip + parse → validate →
//! on failure, re-invoke with the violations embedded, up to
//! [`MAX_ATTEMPTS`] total attempts. A parse failure counts as a validation
//! failure; a failed invocation is terminal (retrying the transport is the
//! caller's concern, not this engine's).

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::prompts::{extraction_instruction, repair_instruction};
use crate::llm_client::{strip_json_fences, GenerateText, LlmError};
use crate::schema::{validate_identified, IdentifiedProfile, ValidationError};

/// Total attempts including the first — the recommended bound of 3.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("generation capability failed: {0}")]
    Generation(#[from] LlmError),

    #[error("extraction failed after {attempts} attempts: {last}")]
    AttemptsExhausted {
        attempts: u32,
        last: ValidationError,
    },
}

pub struct ProfileExtractor {
    llm: Arc<dyn GenerateText>,
}

impl ProfileExtractor {
    pub fn new(llm: Arc<dyn GenerateText>) -> Self {
        Self { llm }
    }

    /// Extracts a validated profile from plain CV text.
    pub async fn extract_profile(&self, text: &str) -> Result<IdentifiedProfile, ExtractionError> {
        let mut attempt: u32 = 1;
        let mut instruction = extraction_instruction();

        loop {
            let raw = self.llm.invoke(&instruction, text).await?;

            match parse_and_validate(&raw) {
                Ok(profile) => {
                    info!(
                        "extraction succeeded on attempt {attempt}: {} experience entries, {} skill groups",
                        profile.record.experiences.len(),
                        profile.record.skills.len()
                    );
                    return Ok(profile);
                }
                Err(error) => {
                    warn!(
                        "extraction attempt {attempt}/{MAX_ATTEMPTS} failed validation: {}",
                        error.describe()
                    );
                    if attempt == MAX_ATTEMPTS {
                        return Err(ExtractionError::AttemptsExhausted {
                            attempts: attempt,
                            last: error,
                        });
                    }
                    instruction = repair_instruction(&raw, &error);
                    attempt += 1;
                }
            }
        }
    }
}

/// Parses a raw model response and validates it against the identified
/// profile shape. A non-JSON response is a validation failure, not a
/// transport failure — the repair loop can ask for a corrected one.
fn parse_and_validate(raw: &str) -> Result<IdentifiedProfile, ValidationError> {
    let stripped = strip_json_fences(raw);
    let value: serde_json::Value =
        serde_json::from_str(stripped).map_err(ValidationError::not_json)?;
    validate_identified(&value)
}
