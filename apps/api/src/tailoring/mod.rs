// Tailoring: base profile + user narrative + target role description →
// a new profile whose identity fields are copied verbatim from the base.
// Same bounded repair-retry structure as extraction, over the record shape.

pub mod engine;
pub mod handlers;
pub mod prompts;

pub use engine::{ProfileTailor, TailoringError};
