//! Detection of model refusals in free-form completion text.
//!
//! The upstream API has no structured "refused" status for vision prompts, so
//! refusals are recognized by phrase. Matching is a case-insensitive substring
//! search after typographic apostrophes are folded to ASCII.

const REFUSAL_PHRASES: &[&str] = &[
    "i'm sorry",
    "i am sorry",
    "i cannot",
    "i can't",
    "can't assist",
    "cannot assist",
    "unable to assist",
    "can't help with",
];

fn normalize_text(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// True when `text` contains any known refusal phrase.
pub fn is_refusal(text: &str) -> bool {
    let normalized = normalize_text(text);
    REFUSAL_PHRASES
        .iter()
        .any(|phrase| normalized.contains(phrase))
}

/// Narrower check applied to upstream *error* messages: only an explicit
/// "can't assist" is treated as a moderation decision there.
pub fn mentions_cannot_assist(message: &str) -> bool {
    normalize_text(message).contains("can't assist")
}
