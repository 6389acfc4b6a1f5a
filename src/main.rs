use std::sync::Arc;

mod annotate;
mod api;
mod config;
mod generate;
mod images;
mod models;
mod prompt;
#[cfg(test)]
mod testing;

use api::AppState;
use config::Config;
use generate::{GeminiClient, ItineraryGenerator};
use images::UnsplashClient;

const USER_AGENT: &str = "itinerary-planner-api/0.1";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::info!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("could not read .env file: {}", e),
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let http = reqwest::ClientBuilder::new()
        .user_agent(USER_AGENT)
        .build()?;

    let gemini = GeminiClient::new(http.clone(), &config.gemini_api_base, &config.gemini_api_key);
    let generator = ItineraryGenerator::new(Arc::new(gemini), config.models.clone());
    tracing::info!("generation fallback order: {}", generator.models().join(", "));

    let state = AppState {
        generator: Arc::new(generator),
        images: Arc::new(UnsplashClient::new(
            http,
            &config.unsplash_api_base,
            &config.unsplash_access_key,
        )),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, api::router(state)).await?;
    Ok(())
}
