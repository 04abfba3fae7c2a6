//! Keyword classifier mapping free-text symptoms to a medical specialty.
//!
//! Every keyword is matched as a plain substring of the lower-cased input.
//! The classifier only commits to a specialty when the matches agree: a
//! prompt that hits keywords from two different departments falls back to
//! [`Specialty::General`], as does a prompt that hits nothing.

use std::collections::BTreeSet;

use strum::{AsRefStr, Display, EnumString};

/// A medical department bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Specialty {
    Otolaryngology,
    Pulmonology,
    Orthopedics,
    Neurology,
    Cardiology,
    Gastroenterology,
    Dermatology,
    Urology,
    General,
}

/// Keyword → specialty table, grouped by department.
pub const KEYWORDS: &[(&str, Specialty)] = &[
    ("runny nose", Specialty::Otolaryngology),
    ("sore throat", Specialty::Otolaryngology),
    ("cough", Specialty::Otolaryngology),
    ("ear pain", Specialty::Otolaryngology),
    ("nasal congestion", Specialty::Otolaryngology),
    ("sinus", Specialty::Otolaryngology),
    ("shortness of breath", Specialty::Pulmonology),
    ("wheezing", Specialty::Pulmonology),
    ("asthma", Specialty::Pulmonology),
    ("chest tightness", Specialty::Pulmonology),
    ("lung pain", Specialty::Pulmonology),
    ("trouble breathing", Specialty::Pulmonology),
    ("broken", Specialty::Orthopedics),
    ("fracture", Specialty::Orthopedics),
    ("sprain", Specialty::Orthopedics),
    ("joint pain", Specialty::Orthopedics),
    ("bone", Specialty::Orthopedics),
    ("back pain", Specialty::Orthopedics),
    ("headache", Specialty::Neurology),
    ("migraine", Specialty::Neurology),
    ("dizzy", Specialty::Neurology),
    ("numbness", Specialty::Neurology),
    ("seizure", Specialty::Neurology),
    ("tremor", Specialty::Neurology),
    ("palpitations", Specialty::Cardiology),
    ("chest pain", Specialty::Cardiology),
    ("high blood pressure", Specialty::Cardiology),
    ("arrhythmia", Specialty::Cardiology),
    ("tightness in chest", Specialty::Cardiology),
    ("stomach pain", Specialty::Gastroenterology),
    ("diarrhea", Specialty::Gastroenterology),
    ("constipation", Specialty::Gastroenterology),
    ("nausea", Specialty::Gastroenterology),
    ("rash", Specialty::Dermatology),
    ("itching", Specialty::Dermatology),
    ("acne", Specialty::Dermatology),
    ("eczema", Specialty::Dermatology),
    ("urination pain", Specialty::Urology),
    ("frequent urination", Specialty::Urology),
    ("blood in urine", Specialty::Urology),
];

/// Distinct specialties whose keywords occur in `text`.
pub fn matched_specialties(text: &str) -> BTreeSet<Specialty> {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, specialty)| specialty)
        .collect()
}

/// Classify `text` into a single specialty.
///
/// Returns the matched specialty when exactly one department matched,
/// otherwise [`Specialty::General`].
pub fn categorize(text: &str) -> Specialty {
    let matched = matched_specialties(text);
    match (matched.len(), matched.first()) {
        (1, Some(&only)) => only,
        _ => Specialty::General,
    }
}
