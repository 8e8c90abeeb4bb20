//! Mock responder
//!
//! Pure, deterministic fallback used when no real backend is configured, so
//! the endpoint degrades gracefully instead of hard-failing on missing
//! configuration. No I/O happens here.

use crate::messages::{NormalizedRequest, NormalizedResponse};

/// Provider tag carried by mock responses
pub const PROVIDER_NAME: &str = "mock";

/// Placeholder principles embedded in every mock document
const PRINCIPLES: [&str; 4] = [
    "Keep the scope small and the feedback loop short.",
    "Prefer working software over speculative design.",
    "Document decisions where the code cannot speak for itself.",
    "Automate the checks you expect to repeat.",
];

/// Synthesize a templated Markdown response embedding the request verbatim.
///
/// Total and deterministic: identical input yields byte-identical output.
#[must_use]
pub fn respond(request: &NormalizedRequest) -> NormalizedResponse {
    let mut text = String::from("# Project Constitution (Mock generated)\n\n");
    text.push_str(&request.flattened_prompt());
    text.push_str("\n\n## Principles\n");
    for principle in PRINCIPLES {
        text.push_str("- ");
        text.push_str(principle);
        text.push('\n');
    }
    text.push_str("\n*(no provider configured; this is a generated placeholder)*\n");

    NormalizedResponse::new(text, PROVIDER_NAME)
}
