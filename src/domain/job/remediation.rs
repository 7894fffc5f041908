//! Remediation hints for failed jobs
//!
//! Maps the free-form error text reported by the service to concrete
//! actions an operator can take on the analysis host.

/// Known failure fragments and the suggestion each one triggers.
/// Matching is case-insensitive on the whole error text.
const HINTS: &[(&[&str], &str)] = &[
    (
        &["openai_api_key"],
        "Set OPENAI_API_KEY in the service environment or .env file and restart the server.",
    ),
    (
        &["openai import failed"],
        "Install openai in the service environment (pip install openai).",
    ),
    (
        &["invalid api key", "authentication"],
        "Check that OPENAI_API_KEY is valid and has access to the API.",
    ),
    (
        &["insufficient_quota", "billing"],
        "Enable billing, add credits or use a key from a funded project.",
    ),
    (
        &["reportlab"],
        "Install reportlab (pip install reportlab) in the service environment.",
    ),
    (
        &["faster-whisper", "faster_whisper"],
        "Install faster-whisper and PyAV with a compatible FFmpeg build.",
    ),
    (
        &["transcription unavailable"],
        "Install faster-whisper or set OPENAI_API_KEY for the openai backend.",
    ),
    (
        &["openai transcription failed"],
        "Verify OPENAI_API_KEY is valid and the service has network access.",
    ),
    (
        &["no module named"],
        "Install the missing Python modules and restart the server.",
    ),
    (
        &["pipeline import failed"],
        "Fix pipeline import errors (reportlab, pydub, faster-whisper), then restart.",
    ),
    (
        &["check api connectivity", "failed to poll"],
        "Make sure the analysis service is running and reachable at the configured api_base.",
    ),
];

/// Suggestions for the given error text, in a stable order
pub fn suggest(error_text: &str) -> Vec<&'static str> {
    let text = error_text.to_lowercase();
    HINTS
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| text.contains(n)))
        .map(|(_, hint)| *hint)
        .collect()
}
