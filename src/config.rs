use clap::{ArgAction, Parser};
use serde::Serialize;

use crate::models::restaurant::Location;

/// Credential values shipped in sample `.env` files.
const PLACEHOLDER_KEYS: [&str; 3] = ["your_api_key_here", "YOUR_API_KEY", "VOTRE_CLE_API"];

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    /// Places and maps credential.
    #[clap(env = "GOOGLE_MAPS_API_KEY", long)]
    pub places_api_key: Option<String>,

    #[clap(env, long)]
    pub outbound_proxy: Option<String>,

    #[clap(env, long, default_value = "https://maps.googleapis.com/maps/api/place")]
    pub places_base_url: String,

    /// Comma-separated CORS origins.
    #[clap(env, long, default_value = "http://localhost:3000")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = 8080)]
    pub port: u16,

    #[clap(env, long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    #[clap(env, long, default_value_t = 10)]
    pub trending_limit: usize,

    /// Order equally rated trending restaurants by review count.
    #[clap(env, long, default_value_t = true, action = ArgAction::Set)]
    pub trending_review_tie_break: bool,

    #[clap(env, long, default_value_t = 48.8566)]
    pub default_lat: f64,

    #[clap(env, long, default_value_t = 2.3522)]
    pub default_lng: f64,
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    Live,
    Simulated,
}

impl Config {
    /// Usable credential, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.places_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_KEYS.contains(key))
    }

    pub fn map_mode(&self) -> MapMode {
        match self.api_key() {
            Some(_) => MapMode::Live,
            None => MapMode::Simulated,
        }
    }

    pub fn outbound_proxy(&self) -> Option<&str> {
        self.outbound_proxy
            .as_deref()
            .map(str::trim)
            .filter(|proxy| !proxy.is_empty())
    }

    pub fn default_location(&self) -> Location {
        Location::new(self.default_lat, self.default_lng)
    }
}
