//! Reduce a free-text medication recommendation to a drug-label search term.

/// Phrases that mean "no medication".
const NONE_MARKERS: &[&str] = &["none", "n/a", "not applicable", "no medication", "consult"];

/// Lead-ins stripped before the drug name.
const LEAD_INS: &[&str] = &["e.g.", "eg.", "e.g", "otc:", "over-the-counter:", "such as"];

/// First drug name in `recommendation`, lower-cased, without dosage.
///
/// `"Ibuprofen 200mg, or acetaminophen"` becomes `"ibuprofen"`. Returns
/// `None` for an empty recommendation or one that advises against medicating.
pub fn lookup_term(recommendation: &str) -> Option<String> {
    let lower = recommendation.trim().to_lowercase();
    if lower.is_empty() || NONE_MARKERS.iter().any(|m| lower.starts_with(m)) {
        return None;
    }

    let mut rest = lower.as_str();
    while let Some(stripped) = LEAD_INS.iter().find_map(|p| rest.strip_prefix(p)) {
        rest = stripped.trim_start_matches([',', ':', ' ']);
    }

    let first = rest
        .split([',', ';', '(', '/', '.'])
        .next()
        .unwrap_or_default();
    let first = first
        .split(" or ")
        .next()
        .and_then(|s| s.split(" and ").next())
        .unwrap_or_default();

    let name = first
        .split_whitespace()
        .take_while(|w| !w.starts_with(|c: char| c.is_ascii_digit()))
        .filter(|w| !matches!(*w, "otc" | "over-the-counter"))
        .collect::<Vec<_>>()
        .join(" ");

    let name = name.trim_matches(|c: char| !c.is_alphanumeric() && c != '-');
    (!name.is_empty()).then(|| name.to_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_dosage_and_alternatives() {
        assert_eq!(lookup_term("Ibuprofen 200mg, or acetaminophen").as_deref(), Some("ibuprofen"));
        assert_eq!(lookup_term("Acetaminophen (Tylenol)").as_deref(), Some("acetaminophen"));
        assert_eq!(lookup_term("loratadine or cetirizine").as_deref(), Some("loratadine"));
        assert_eq!(lookup_term("e.g. ibuprofen").as_deref(), Some("ibuprofen"));
        assert_eq!(lookup_term("OTC: ibuprofen 200mg").as_deref(), Some("ibuprofen"));
    }

    #[test]
    fn keeps_multi_word_names() {
        assert_eq!(lookup_term("Calamine lotion").as_deref(), Some("calamine lotion"));
    }

    #[test]
    fn no_medication_yields_none() {
        assert_eq!(lookup_term(""), None);
        assert_eq!(lookup_term("   "), None);
        assert_eq!(lookup_term("None recommended"), None);
        assert_eq!(lookup_term("Consult a doctor before taking anything"), None);
        assert_eq!(lookup_term("500mg"), None);
    }
}
