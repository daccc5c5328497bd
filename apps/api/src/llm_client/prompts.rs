// Cross-cutting prompt fragments shared by the extraction and tailoring
// engines. Each engine defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// The non-fabrication constraint shared by every generation prompt.
/// Soft by nature: the engines validate shape, not factual grounding, and
/// callers must treat this as best-effort rather than a guarantee.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Use ONLY information present in the supplied material. \
    Do NOT introduce skills, employers, job titles, dates, credentials, or \
    institutions that do not appear in it. Rephrasing and reordering are \
    allowed; inventing is not. If the material does not support a field, \
    use an empty string or an empty array — never a guess.";

/// Fields that must survive untouched. Appended to prompts operating on an
/// already-identified profile so the model does not echo altered contact data.
pub const IDENTITY_INSTRUCTION: &str = "\
    Do NOT output full_name, email, phone, or links fields. \
    Contact details are attached outside the model and must not be restated.";
