use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::annotate::annotate_itinerary;
use crate::generate::{GenerationError, ItineraryGenerator};
use crate::images::ImageSearch;
use crate::models::{GenerateItineraryRequest, GenerateItineraryResponse, GenerationFailure};
use crate::prompt::itinerary_prompt;

const EXHAUSTED_MESSAGE: &str =
    "Failed to generate itinerary. All models are currently busy or an error occurred.";

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ItineraryGenerator>,
    pub images: Arc<dyn ImageSearch>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-itinerary", post(generate_itinerary))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn generate_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<GenerateItineraryRequest>, JsonRejection>,
) -> Response {
    let prompt = match payload {
        Ok(Json(GenerateItineraryRequest {
            prompt: Some(prompt),
        })) if !prompt.trim().is_empty() => prompt,
        Ok(_) => return missing_prompt(),
        Err(rejection) => {
            tracing::debug!("rejected request body: {}", rejection);
            return missing_prompt();
        }
    };

    match state.generator.generate(&itinerary_prompt(&prompt)).await {
        Ok(text) => {
            let itinerary = annotate_itinerary(&text, state.images.as_ref()).await;
            (StatusCode::OK, Json(GenerateItineraryResponse { itinerary })).into_response()
        }
        Err(e) => {
            let details = match e {
                GenerationError::Exhausted { last_error } => last_error,
                other => Some(other.to_string()),
            };
            let body = GenerationFailure {
                error: EXHAUSTED_MESSAGE.to_string(),
                details,
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

fn missing_prompt() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "Prompt is missing"})),
    )
        .into_response()
}
