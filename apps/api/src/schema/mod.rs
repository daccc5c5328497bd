//! CV schema — the canonical structured profile types.
//!
//! Wire field names are the contract: template authors and the model-facing
//! prompts both rely on them, so renaming any serde name is a breaking change.
//! The record's summary serializes as `self_summary` and the volunteer list
//! as `volunteer_work`.

use serde::{Deserialize, Serialize};

pub mod validation;

pub use validation::{validate_identified, validate_record, FieldViolation, ValidationError};

/// A labelled hyperlink. `url` is optional because extraction may recover a
/// label without a resolvable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One work (or volunteer) position. Date fields are opaque free-form
/// strings — no parsing or normalization is ever applied to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub position: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub name: String,
    pub issuer: String,
    pub date: String,
    #[serde(default)]
    pub link: Option<Link>,
}

/// Free-text language + proficiency pair. No enumerated scale is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageProficiency {
    pub language: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub details: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<String>,
}

/// The structured CV without identity fields — what the tailoring model is
/// allowed to regenerate. Collections default to empty when absent; `skills`
/// must be non-empty (enforced by [`validation`], not serde).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub title: String,
    #[serde(rename = "self_summary")]
    pub summary: String,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub languages: Vec<LanguageProficiency>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default, rename = "volunteer_work")]
    pub volunteer: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
}

/// A [`ProfileRecord`] plus the fields that name a specific person.
/// Flattened on the wire, so the JSON shape matches the persisted `cv.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub record: ProfileRecord,
}

impl IdentifiedProfile {
    /// Drops the identity fields, keeping every other field intact.
    pub fn into_record(self) -> ProfileRecord {
        self.record
    }

    /// Attaches identity fields to a record. Inverse of [`Self::into_record`]:
    /// round-trips every non-identity field exactly.
    pub fn from_record(
        record: ProfileRecord,
        full_name: String,
        email: String,
        phone: String,
        links: Vec<Link>,
    ) -> Self {
        Self {
            full_name,
            email,
            phone,
            links,
            record,
        }
    }
}
