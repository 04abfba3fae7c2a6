//! Extraction of assessment fields from the model's reply.
//!
//! Two decoders live here. [`Assessment::from_structured`] reads the JSON
//! object the model returns when a response schema was requested.
//! [`parse_labeled`] is the line scanner for free-text replies: it looks for
//! lines that start with one of the [`Field`] labels and keeps whatever
//! follows the first colon. Neither one fails; a field the model left out is
//! an empty string.

use serde::{Deserialize, Serialize};

/// One labeled line of the reply format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UrgencyScore,
    MostLikelyCondition,
    RecommendedClinic,
    RecommendedMedication,
    WhatYouCanDoNow,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::UrgencyScore,
        Field::MostLikelyCondition,
        Field::WhatYouCanDoNow,
        Field::RecommendedClinic,
        Field::RecommendedMedication,
    ];

    /// Line prefix the scanner matches on.
    pub fn label(self) -> &'static str {
        match self {
            Field::UrgencyScore => "Urgency Score",
            Field::MostLikelyCondition => "Most Likely Condition",
            Field::RecommendedClinic => "Recommended Clinic",
            Field::RecommendedMedication => "Recommended Medication",
            Field::WhatYouCanDoNow => "What You Can Do Now",
        }
    }

    /// Label as written in the instruction template and the rendered reply.
    pub fn heading(self) -> &'static str {
        match self {
            Field::UrgencyScore => "Urgency Score (1–10)",
            other => other.label(),
        }
    }
}

/// Structured fields pulled out of a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub urgency_score: String,
    pub most_likely_condition: String,
    pub recommended_clinic: String,
    pub recommended_medication: String,
    pub what_you_can_do_now: String,
}

impl Assessment {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::UrgencyScore => &self.urgency_score,
            Field::MostLikelyCondition => &self.most_likely_condition,
            Field::RecommendedClinic => &self.recommended_clinic,
            Field::RecommendedMedication => &self.recommended_medication,
            Field::WhatYouCanDoNow => &self.what_you_can_do_now,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::UrgencyScore => &mut self.urgency_score,
            Field::MostLikelyCondition => &mut self.most_likely_condition,
            Field::RecommendedClinic => &mut self.recommended_clinic,
            Field::RecommendedMedication => &mut self.recommended_medication,
            Field::WhatYouCanDoNow => &mut self.what_you_can_do_now,
        }
    }

    /// `true` when no field carries a value.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|&f| self.get(f).is_empty())
    }

    /// Decode a JSON reply produced under the structured response schema.
    ///
    /// A surrounding markdown code fence is tolerated. Returns `None` when the
    /// text is not a JSON object of the expected shape. An urgency score that
    /// is not an integer in `1..=10` is blanked rather than rejected.
    pub fn from_structured(raw: &str) -> Option<Self> {
        let body = strip_code_fence(raw);
        let reply: StructuredReply = serde_json::from_str(body).ok()?;
        let urgency = match &reply.urgency_score {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        let urgency_score = urgency
            .filter(|n| (1..=10).contains(n))
            .map(|n| n.to_string())
            .unwrap_or_default();
        Some(Self {
            urgency_score,
            most_likely_condition: reply.most_likely_condition.trim().to_owned(),
            recommended_clinic: reply.recommended_clinic.trim().to_owned(),
            recommended_medication: reply.recommended_medication.trim().to_owned(),
            what_you_can_do_now: reply.what_you_can_do_now.trim().to_owned(),
        })
    }

    /// Decode `raw` as structured JSON, falling back to the line scanner.
    ///
    /// The flag is `true` when the structured decode succeeded.
    pub fn from_reply(raw: &str) -> (Self, bool) {
        match Self::from_structured(raw) {
            Some(assessment) => (assessment, true),
            None => (parse_labeled(raw), false),
        }
    }

    /// Render as the labeled text format, one line per non-empty field.
    pub fn to_labeled_text(&self) -> String {
        Field::ALL
            .iter()
            .filter(|&&f| !self.get(f).is_empty())
            .map(|&f| format!("{}: {}", f.heading(), self.get(f)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredReply {
    #[serde(default)]
    urgency_score: serde_json::Value,
    #[serde(default, deserialize_with = "lenient_text")]
    most_likely_condition: String,
    #[serde(default, deserialize_with = "lenient_text")]
    recommended_clinic: String,
    #[serde(default, deserialize_with = "lenient_text")]
    recommended_medication: String,
    #[serde(default, deserialize_with = "lenient_text")]
    what_you_can_do_now: String,
}

/// A string field the model may have sent as `null`, a number or some other
/// JSON value. Strings and numbers keep their text; anything else is empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// JSON schema handed to the model when structured replies are requested.
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "urgencyScore":          { "type": "INTEGER" },
            "mostLikelyCondition":   { "type": "STRING" },
            "whatYouCanDoNow":       { "type": "STRING" },
            "recommendedClinic":     { "type": "STRING" },
            "recommendedMedication": { "type": "STRING" },
        },
        "required": [
            "urgencyScore",
            "mostLikelyCondition",
            "whatYouCanDoNow",
            "recommendedClinic",
            "recommendedMedication",
        ],
    })
}

/// Scan a free-text reply for labeled lines.
pub fn parse_labeled(text: &str) -> Assessment {
    let mut out = Assessment::default();
    for line in text.lines() {
        let line = line
            .trim()
            .trim_start_matches(['-', '*', '#', '>'])
            .trim_start();
        let Some(field) = Field::ALL.into_iter().find(|f| line.starts_with(f.label())) else {
            continue;
        };
        let value = line
            .split_once(':')
            .map(|(_, rest)| rest.trim().trim_matches('*').trim())
            .unwrap_or_default();
        *out.slot(field) = value.to_owned();
    }
    out
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
