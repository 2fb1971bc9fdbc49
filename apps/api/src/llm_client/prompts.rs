// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to every rewriting prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only rephrase what the resume already says. Do NOT invent employers, \
    titles, dates, degrees, metrics or technologies. If the resume does not support \
    a keyword, leave it out rather than fabricating experience.";
