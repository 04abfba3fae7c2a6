//! Symptom → place-search keyword lookup for the nearby-hospital search.

/// Keyword used when the symptom is not in [`SEARCH_TERMS`].
pub const FALLBACK_SEARCH_TERM: &str = "hospital";

/// Exact-match symptom table, keys lower-case.
pub const SEARCH_TERMS: &[(&str, &str)] = &[
    ("stomachache", "gastroenterology"),
    ("fever", "general hospital"),
    ("cardiac", "cardiology"),
    ("headache", "neurology"),
    ("cough", "pulmonology"),
    ("fracture", "orthopedics"),
    ("skin", "dermatology"),
    ("maternity", "maternity hospital"),
    ("eye", "ophthalmology"),
];

/// Search keyword for `symptom`, or [`FALLBACK_SEARCH_TERM`].
pub fn search_term(symptom: &str) -> &'static str {
    let key = symptom.trim().to_lowercase();
    SEARCH_TERMS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(_, term)| term)
        .unwrap_or(FALLBACK_SEARCH_TERM)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_symptoms_map_to_their_term() {
        for &(symptom, term) in SEARCH_TERMS {
            assert_eq!(search_term(symptom), term);
        }
        assert_eq!(search_term("  Fever "), "general hospital");
    }

    #[test]
    fn lookup_is_exact_not_substring() {
        assert_eq!(search_term("bad headache since monday"), FALLBACK_SEARCH_TERM);
        assert_eq!(search_term(""), FALLBACK_SEARCH_TERM);
    }
}
