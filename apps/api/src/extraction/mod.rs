// Structured extraction: unstructured CV text → validated IdentifiedProfile
// via a schema-constrained model call with a bounded repair-retry loop.
// All model traffic goes through the injected GenerateText capability.

pub mod engine;
pub mod handlers;
pub mod prompts;

pub use engine::{ExtractionError, ProfileExtractor, MAX_ATTEMPTS};
