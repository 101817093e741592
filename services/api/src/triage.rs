//! Emergency triage gate
//!
//! A local keyword heuristic that runs before any remote call. Matching is
//! plain case-insensitive substring containment: there is no negation
//! handling and no word-boundary check, so "overdosed on homework" is
//! classified as an emergency. The gate is approximate and must not be
//! treated as a clinical classifier.

/// Phrases that route a question to the emergency warning
pub const EMERGENCY_PHRASES: &[&str] = &[
    "chest pain",
    "can't breathe",
    "cannot breathe",
    "not breathing",
    "bleeding a lot",
    "overdose",
    "suicidal",
    "kill myself",
    "want to hurt myself",
    "stroke",
    "heart attack",
    "passed out",
    "unconscious",
];

/// Fixed answer returned for emergency questions
pub const EMERGENCY_MESSAGE: &str = "⚠️ Your question sounds like it could involve a medical emergency.\n\n\
Please call 911 or your local emergency number, or go to the nearest emergency room \
or urgent care immediately.\n\n\
This assistant cannot evaluate, diagnose, or respond to emergencies.";

/// Outcome of the triage check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triage {
    /// At least one emergency phrase matched
    Emergency,
    /// Safe to forward to the assistant
    Normal,
}

/// Classify a raw question
pub fn classify(question: &str) -> Triage {
    if matched_phrase(question).is_some() {
        Triage::Emergency
    } else {
        Triage::Normal
    }
}

/// Return the first emergency phrase contained in the question, if any
pub fn matched_phrase(question: &str) -> Option<&'static str> {
    let lowered = question.to_lowercase();
    EMERGENCY_PHRASES
        .iter()
        .copied()
        .find(|phrase| lowered.contains(phrase))
}
