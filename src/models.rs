use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateItineraryRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateItineraryResponse {
    pub itinerary: String,
}

/// Body returned when every generation backend failed.
#[derive(Debug, Serialize)]
pub struct GenerationFailure {
    pub error: String,
    pub details: Option<String>,
}

/// A single photo picked for a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub url: String,
    pub description: Option<String>,
}
