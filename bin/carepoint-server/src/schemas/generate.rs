use carepoint_triage::Assessment;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// The user's description of their symptoms.
    #[validate(custom(function = "not_blank", message = "Prompt is required"))]
    pub prompt: String,
    /// Owner of the stored interaction.
    #[validate(custom(function = "not_blank", message = "Username is required"))]
    pub username: String,
    /// Offer the user's most recent interactions to the model as context.
    #[serde(default)]
    pub use_history_context: bool,
}

/// Summary of an openFDA label; each section is the label's first entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrugLabel {
    pub brand_name: Option<String>,
    pub generic_name: Option<String>,
    pub purpose: Option<String>,
    pub indications_and_usage: Option<String>,
    pub warnings: Option<String>,
    pub dosage_and_administration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Id of the stored interaction.
    pub id: String,
    /// Reply text shown to the user.
    pub text: String,
    /// Specialty bucket the prompt was filed under.
    pub category: String,
    /// Fields extracted from the reply.
    #[schema(value_type = Object)]
    pub assessment: Assessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_info: Option<DrugLabel>,
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
