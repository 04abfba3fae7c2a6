//! Symptom submission: prompt → model → assessment → stored interaction.
//!
//! The prompt is filed under a specialty by keyword match, optionally
//! prefixed with the user's recent interactions, and sent to the model. The
//! reply is decoded into an [`Assessment`]; a recommended medication is looked
//! up on openFDA. One interaction row is written per call.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Extension, Json, Router};
use carepoint_triage::{categorize, medication, prompt, Assessment, HistoryExcerpt};
use chrono::Utc;
use tracing::{debug, info};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::entities::interaction::DEFAULT_COLLECTION;
use crate::entities::{Interaction, InteractionStore};
use crate::error::ServerError;
use crate::extract::ValidatedJson;
use crate::middleware::auth::Caller;
use crate::schemas::generate::{DrugLabel, GenerateRequest, GenerateResponse};
use crate::state::AppState;

/// Stored and returned when the model produced no candidate text.
pub const NO_REPLY: &str = "No response from the model.";

#[derive(OpenApi)]
#[openapi(
    paths(generate),
    components(schemas(GenerateRequest, GenerateResponse, DrugLabel))
)]
pub struct GenerateApi;

/// Register the generate route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/generate", post(generate))
}

#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Model reply and extracted assessment", body = GenerateResponse),
        (status = 400, description = "Prompt or username missing"),
        (status = 500, description = "Model or drug-label API error"),
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(req): ValidatedJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ServerError> {
    caller.ensure_owner(&req.username)?;

    let category = categorize(&req.prompt);
    let history = if req.use_history_context && state.config.history_context > 0 {
        recent_excerpts(&state, &req.username).await?
    } else {
        Vec::new()
    };
    debug!(%category, history = history.len(), "assembling prompt");

    let full_prompt = prompt::assemble(&req.prompt, &history);
    let raw = state
        .upstream
        .gemini
        .generate(&full_prompt)
        .await?
        .unwrap_or_else(|| NO_REPLY.to_owned());

    let (assessment, structured) = Assessment::from_reply(&raw);
    let text = if structured && !assessment.is_empty() {
        assessment.to_labeled_text()
    } else {
        raw.clone()
    };

    let medication_info = match medication::lookup_term(&assessment.recommended_medication) {
        Some(term) => state.upstream.fda.label(&term).await?,
        None => None,
    };

    let collection = if state.config.partition_by_category {
        category.to_string()
    } else {
        DEFAULT_COLLECTION.to_owned()
    };
    let record = Interaction {
        id: Uuid::new_v4(),
        username: req.username,
        collection,
        prompt: req.prompt,
        response: raw,
        category: category.to_string(),
        urgency_score: assessment.urgency_score.clone(),
        condition: assessment.most_likely_condition.clone(),
        created_at: Utc::now(),
    };
    let id = record.id;
    state.store.insert_interaction(record).await?;

    info!(
        %id,
        %category,
        structured,
        urgency = %assessment.urgency_score,
        medication_info = medication_info.is_some(),
        "interaction stored"
    );

    Ok(Json(GenerateResponse {
        id: id.to_string(),
        text,
        category: category.to_string(),
        assessment,
        medication_info,
    }))
}

/// The user's latest interactions, oldest first.
async fn recent_excerpts(
    state: &AppState,
    username: &str,
) -> Result<Vec<HistoryExcerpt>, ServerError> {
    let mut recent = state
        .store
        .list_interactions(username, Some(state.config.history_context))
        .await?;
    recent.reverse();
    Ok(recent
        .into_iter()
        .map(|i| HistoryExcerpt {
            prompt: i.prompt,
            condition: i.condition,
            urgency_score: i.urgency_score,
        })
        .collect())
}
