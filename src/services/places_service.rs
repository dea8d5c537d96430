use std::cmp::Ordering;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::helpers::errors::{NormalizeError, PlacesError};
use crate::helpers::normalizer::{
    extract_country, normalize_details, normalize_listing, PhotoUrlBuilder,
};
use crate::models::filter::country_filter;
use crate::models::place::PlaceRecord;
use crate::models::restaurant::{Location, Restaurant};
use crate::repositories::places_repo::{
    NearbyQuery, PlacesProvider, RankBy, TextQuery, HALAL_KEYWORD,
};

pub const DEFAULT_SEARCH_RADIUS: u32 = 5000;
pub const TEXT_SEARCH_RADIUS: u32 = 10000;
pub const TEXT_SEARCH_QUALIFIER: &str = "halal restaurant";
pub const DEFAULT_TRENDING_LIMIT: usize = 10;

pub const COUNTRY_FIELDS: [&str; 1] = ["address_components"];
pub const DETAIL_FIELDS: [&str; 15] = [
    "place_id",
    "name",
    "formatted_address",
    "geometry",
    "rating",
    "formatted_phone_number",
    "website",
    "opening_hours",
    "reviews",
    "photos",
    "price_level",
    "types",
    "user_ratings_total",
    "address_components",
    "vicinity",
];

/// How trending results are ranked and cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendingTieBreak {
    ReviewCount,
    RatingOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrendingPolicy {
    pub limit: usize,
    pub tie_break: TrendingTieBreak,
}

impl Default for TrendingPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TRENDING_LIMIT,
            tie_break: TrendingTieBreak::ReviewCount,
        }
    }
}

impl TrendingPolicy {
    /// Highest rating first, then the tie-break. Stable for equal keys.
    pub fn rank(&self, mut restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
        restaurants.sort_by(|a, b| {
            let by_rating = b.rating.total_cmp(&a.rating);
            match (by_rating, self.tie_break) {
                (Ordering::Equal, TrendingTieBreak::ReviewCount) => b
                    .user_ratings_total
                    .unwrap_or(0)
                    .cmp(&a.user_ratings_total.unwrap_or(0)),
                (ordering, _) => ordering,
            }
        });
        restaurants.truncate(self.limit);
        restaurants
    }
}

/// Result of shaping one record of a batch.
#[derive(Debug)]
pub enum RecordOutcome {
    Kept(Restaurant),
    Excluded { place_id: String, country: String },
    Dropped { name: String, reason: String },
}

impl RecordOutcome {
    pub fn into_restaurant(self) -> Option<Restaurant> {
        match self {
            RecordOutcome::Kept(restaurant) => Some(restaurant),
            RecordOutcome::Excluded { place_id, country } => {
                debug!("Skipping place {} located in {}", place_id, country);
                None
            }
            RecordOutcome::Dropped { name, reason } => {
                warn!("Dropping restaurant {} from results due to: {}", name, reason);
                None
            }
        }
    }
}

/// Keeps the restaurants located in `country`, ignoring case.
/// Blank or "all" keeps everything.
pub fn in_country(restaurants: Vec<Restaurant>, country: Option<&str>) -> Vec<Restaurant> {
    match country_filter(country) {
        Some(country) => restaurants
            .into_iter()
            .filter(|restaurant| restaurant.country.to_lowercase() == country.to_lowercase())
            .collect(),
        None => restaurants,
    }
}

/// Halal restaurant retrieval on top of a [`PlacesProvider`].
pub struct PlacesService {
    provider: Arc<dyn PlacesProvider>,
    photo_urls: PhotoUrlBuilder,
    trending: TrendingPolicy,
}

impl PlacesService {
    pub fn new(
        provider: Arc<dyn PlacesProvider>,
        photo_urls: PhotoUrlBuilder,
        trending: TrendingPolicy,
    ) -> Self {
        Self {
            provider,
            photo_urls,
            trending,
        }
    }

    pub async fn search_nearby(
        &self,
        location: Location,
        radius: u32,
    ) -> Result<Vec<Restaurant>, PlacesError> {
        info!(
            "Searching halal restaurants at {} within {}m",
            location, radius
        );
        let query = NearbyQuery {
            location,
            radius,
            keyword: HALAL_KEYWORD.to_string(),
            rank_by: RankBy::Radius,
        };
        let places = self.provider.nearby_search(&query).await?.into_results()?;

        Ok(self.shape_batch(places, None).await)
    }

    pub async fn trending(
        &self,
        location: Location,
        country: Option<&str>,
    ) -> Result<Vec<Restaurant>, PlacesError> {
        info!("Retrieving trending restaurants near {}", location);
        let query = NearbyQuery {
            location,
            radius: DEFAULT_SEARCH_RADIUS,
            keyword: HALAL_KEYWORD.to_string(),
            rank_by: RankBy::Prominence,
        };
        let places = self.provider.nearby_search(&query).await?.into_results()?;
        let restaurants = self.shape_batch(places, country_filter(country)).await;

        Ok(self.trending.rank(restaurants))
    }

    pub async fn search_by_text(
        &self,
        text: &str,
        location: Location,
        country: Option<&str>,
    ) -> Result<Vec<Restaurant>, PlacesError> {
        info!("Text search for \"{}\" near {}", text, location);
        let query = TextQuery {
            query: format!("{} {}", text.trim(), TEXT_SEARCH_QUALIFIER),
            location,
            radius: TEXT_SEARCH_RADIUS,
        };
        let places = self.provider.text_search(&query).await?.into_results()?;

        Ok(self.shape_batch(places, country_filter(country)).await)
    }

    pub async fn search_by_country(
        &self,
        location: Location,
        country: Option<&str>,
    ) -> Result<Vec<Restaurant>, PlacesError> {
        let restaurants = self.search_nearby(location, DEFAULT_SEARCH_RADIUS).await?;

        Ok(in_country(restaurants, country))
    }

    pub async fn details(&self, place_id: &str) -> Result<Restaurant, PlacesError> {
        info!("Retrieving details for place {}", place_id);
        let place = self
            .provider
            .place_details(place_id, &DETAIL_FIELDS)
            .await?
            .into_result(place_id)?;

        normalize_details(place_id, place, &self.photo_urls).map_err(|e| match e {
            NormalizeError::MissingId => PlacesError::NotFound {
                place_id: place_id.to_string(),
            },
            other => PlacesError::Decode(other.to_string()),
        })
    }

    async fn resolve_country(&self, place_id: &str) -> Result<String, PlacesError> {
        let place = self
            .provider
            .place_details(place_id, &COUNTRY_FIELDS)
            .await?
            .into_result(place_id)?;

        Ok(extract_country(place.address_components.as_deref()))
    }

    /// Looks up every record's country concurrently and keeps the records
    /// that resolve and normalize. Input order is preserved.
    async fn shape_batch(
        &self,
        places: Vec<PlaceRecord>,
        country: Option<&str>,
    ) -> Vec<Restaurant> {
        let total = places.len();
        let outcomes = join_all(
            places
                .into_iter()
                .map(|place| self.shape_record(place, country)),
        )
        .await;

        let restaurants = outcomes
            .into_iter()
            .filter_map(RecordOutcome::into_restaurant)
            .collect::<Vec<_>>();
        info!("Kept {} of {} restaurants", restaurants.len(), total);
        restaurants
    }

    async fn shape_record(&self, place: PlaceRecord, country: Option<&str>) -> RecordOutcome {
        let place_id = match place.place_id.clone() {
            Some(place_id) => place_id,
            None => {
                return RecordOutcome::Dropped {
                    name: place.name,
                    reason: NormalizeError::MissingId.to_string(),
                }
            }
        };

        let place_country = match self.resolve_country(&place_id).await {
            Ok(place_country) => place_country,
            Err(e) => {
                return RecordOutcome::Dropped {
                    name: place.name,
                    reason: e.to_string(),
                }
            }
        };

        if let Some(country) = country {
            if place_country != country {
                return RecordOutcome::Excluded {
                    place_id,
                    country: place_country,
                };
            }
        }

        let name = place.name.clone();
        match normalize_listing(place, place_country, &self.photo_urls) {
            Ok(restaurant) => RecordOutcome::Kept(restaurant),
            Err(e) => RecordOutcome::Dropped {
                name,
                reason: e.to_string(),
            },
        }
    }
}
