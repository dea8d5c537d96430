use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};

use crate::config::{Config, MapMode};
use crate::controller::AppState;
use crate::helpers::normalizer::PhotoUrlBuilder;
use crate::repositories::places_repo::GooglePlacesRepo;
use crate::services::places_service::{PlacesService, TrendingPolicy, TrendingTieBreak};

pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    info!("Starting halal finder backend in {} environment", config.environment);
    if config.map_mode() == MapMode::Simulated {
        warn!("No usable maps credential configured, clients will fall back to the simulated map");
    }

    let api_key = config.api_key().unwrap_or_default();
    let places_repo = GooglePlacesRepo::new(
        &config.places_base_url,
        api_key,
        config.outbound_proxy(),
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to build the places client")?;

    let places_service = PlacesService::new(
        Arc::new(places_repo),
        PhotoUrlBuilder::new(&config.places_base_url, api_key),
        TrendingPolicy {
            limit: config.trending_limit,
            tie_break: if config.trending_review_tie_break {
                TrendingTieBreak::ReviewCount
            } else {
                TrendingTieBreak::RatingOnly
            },
        },
    );

    let app_state = AppState {
        places_service: Arc::new(places_service),
        map_mode: config.map_mode(),
        default_location: config.default_location(),
    };

    controller::serve(app_state, &config).await
}
