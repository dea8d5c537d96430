use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use crate::controller::AppState;
use crate::helpers::errors::PlacesError;
use crate::helpers::view_model::{available_countries, results_heading, ResultSlices, TabCounts};
use crate::models::filter::{deserialize_country, deserialize_cuisine, ActiveTab, FilterCriteria};
use crate::models::restaurant::{Cuisine, Location, Restaurant};
use crate::services::places_service::{in_country, PlacesService, DEFAULT_SEARCH_RADIUS};

/// Position used when the browser could not geolocate the user.
#[derive(Clone, Copy, Debug)]
pub struct FallbackLocation(pub Location);

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/nearby", get(search_nearby_restaurants))
        .route("/trending", get(retrieve_trending_restaurants))
        .route("/search", get(search_restaurants_by_text))
        .route("/by-country", get(search_restaurants_by_country))
        .route("/details/:place_id", get(retrieve_restaurant_details))
        .route("/view", get(retrieve_restaurants_view))
        .route_layer(Extension(app_state.places_service))
        .route_layer(Extension(FallbackLocation(app_state.default_location)))
}

/// Resolves optional coordinates, falling back when both are absent.
fn resolve_location(
    lat: Option<f64>,
    lng: Option<f64>,
    fallback: FallbackLocation,
) -> Result<Location, String> {
    let location = match (lat, lng) {
        (Some(lat), Some(lng)) => Location::new(lat, lng),
        (None, None) => fallback.0,
        _ => return Err("lat and lng must be given together".to_string()),
    };

    if location.is_valid() {
        Ok(location)
    } else {
        Err(format!("invalid coordinates: {}", location))
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn places_failure(context: &str, e: PlacesError) -> Response {
    warn!("Something went wrong {} due to: {}", context, e);
    (
        e.status_code(),
        Json(json!({ "error": format!("Failed {}, please try again", context) })),
    ).into_response()
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct NearbyParam {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
}

pub async fn search_nearby_restaurants(
    Extension(places_service): Extension<Arc<PlacesService>>,
    Extension(fallback): Extension<FallbackLocation>,
    Query(query): Query<NearbyParam>,
) -> Response {
    let location = match resolve_location(query.lat, query.lng, fallback) {
        Ok(location) => location,
        Err(message) => return bad_request(message),
    };

    let restaurants_res = places_service
        .search_nearby(
            location,
            query.radius.unwrap_or(DEFAULT_SEARCH_RADIUS),
        ).await;

    return match restaurants_res {
        Ok(restaurants) => (StatusCode::OK, Json(restaurants)).into_response(),
        Err(e) => places_failure("searching nearby restaurants", e),
    };
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct CountryParam {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub country: Option<String>,
}

pub async fn retrieve_trending_restaurants(
    Extension(places_service): Extension<Arc<PlacesService>>,
    Extension(fallback): Extension<FallbackLocation>,
    Query(query): Query<CountryParam>,
) -> Response {
    let location = match resolve_location(query.lat, query.lng, fallback) {
        Ok(location) => location,
        Err(message) => return bad_request(message),
    };

    let trending_res = places_service
        .trending(location, query.country.as_deref())
        .await;

    return match trending_res {
        Ok(restaurants) => (StatusCode::OK, Json(restaurants)).into_response(),
        Err(e) => places_failure("retrieving trending restaurants", e),
    };
}

pub async fn search_restaurants_by_country(
    Extension(places_service): Extension<Arc<PlacesService>>,
    Extension(fallback): Extension<FallbackLocation>,
    Query(query): Query<CountryParam>,
) -> Response {
    let location = match resolve_location(query.lat, query.lng, fallback) {
        Ok(location) => location,
        Err(message) => return bad_request(message),
    };

    let restaurants_res = places_service
        .search_by_country(location, query.country.as_deref())
        .await;

    return match restaurants_res {
        Ok(restaurants) => (StatusCode::OK, Json(restaurants)).into_response(),
        Err(e) => places_failure("searching restaurants by country", e),
    };
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct TextSearchParam {
    pub query: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub country: Option<String>,
}

pub async fn search_restaurants_by_text(
    Extension(places_service): Extension<Arc<PlacesService>>,
    Extension(fallback): Extension<FallbackLocation>,
    Query(query): Query<TextSearchParam>,
) -> Response {
    let text = match query.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(text) => text,
        None => return bad_request("query must not be blank".to_string()),
    };
    let location = match resolve_location(query.lat, query.lng, fallback) {
        Ok(location) => location,
        Err(message) => return bad_request(message),
    };

    let restaurants_res = places_service
        .search_by_text(text, location, query.country.as_deref())
        .await;

    return match restaurants_res {
        Ok(restaurants) => (StatusCode::OK, Json(restaurants)).into_response(),
        Err(e) => places_failure("searching restaurants", e),
    };
}

pub async fn retrieve_restaurant_details(
    Extension(places_service): Extension<Arc<PlacesService>>,
    Path(place_id): Path<String>,
) -> Response {
    let restaurant_res = places_service
        .details(&place_id)
        .await;

    return match restaurant_res {
        Ok(restaurant) => (StatusCode::OK, Json(restaurant)).into_response(),
        Err(e) => places_failure("retrieving restaurant details", e),
    };
}

#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViewParam {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub tab: ActiveTab,
    #[serde(default, deserialize_with = "deserialize_cuisine")]
    pub cuisine: Option<Cuisine>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub open_now: bool,
    #[serde(default, deserialize_with = "deserialize_country")]
    pub country: Option<String>,
    pub query: Option<String>,
}

impl ViewParam {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            cuisine: self.cuisine,
            rating: self.rating,
            open_now: self.open_now,
            country: self.country.clone(),
        }
    }

    fn search_text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

const SLICE_FAILURE_MESSAGE: &str = "Failed to load these restaurants, please try again";

#[derive(Clone, Serialize, Debug)]
pub struct SliceError {
    pub slice: ActiveTab,
    pub message: String,
}

#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantsView {
    pub tab: ActiveTab,
    pub heading: String,
    pub restaurants: Vec<Restaurant>,
    pub countries: Vec<String>,
    pub counts: TabCounts,
    pub errors: Vec<SliceError>,
}

fn slice_or_empty(
    slice: ActiveTab,
    result: Result<Vec<Restaurant>, PlacesError>,
    errors: &mut Vec<SliceError>,
) -> Vec<Restaurant> {
    match result {
        Ok(restaurants) => restaurants,
        Err(e) => {
            warn!("Something went wrong loading the {:?} slice due to: {}", slice, e);
            errors.push(SliceError {
                slice,
                message: SLICE_FAILURE_MESSAGE.to_string(),
            });
            Vec::new()
        }
    }
}

/// Primary and trending results fetched side by side, filtered for the active tab.
pub async fn retrieve_restaurants_view(
    Extension(places_service): Extension<Arc<PlacesService>>,
    Extension(fallback): Extension<FallbackLocation>,
    Query(query): Query<ViewParam>,
) -> Response {
    let location = match resolve_location(query.lat, query.lng, fallback) {
        Ok(location) => location,
        Err(message) => return bad_request(message),
    };
    let criteria = query.criteria();
    let country = criteria.country.as_deref();

    // the primary slice is fetched unfiltered so the country facet keeps every option
    let primary = async {
        match query.search_text() {
            Some(text) => places_service.search_by_text(text, location, None).await,
            None => places_service.search_nearby(location, DEFAULT_SEARCH_RADIUS).await,
        }
    };
    let trending = places_service.trending(location, country);
    let (primary_res, trending_res) = tokio::join!(primary, trending);

    if let (Err(primary_err), Err(trending_err)) = (&primary_res, &trending_res) {
        warn!(
            "Both restaurant slices failed: {} / {}",
            primary_err, trending_err
        );
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "Failed to retrieve restaurants, please try again" })),
        ).into_response();
    }

    let mut errors = Vec::new();
    let primary = slice_or_empty(ActiveTab::Restaurants, primary_res, &mut errors);
    let countries = available_countries(&primary);
    let slices = ResultSlices {
        restaurants: in_country(primary, country),
        trending: slice_or_empty(ActiveTab::Trending, trending_res, &mut errors),
    };
    let restaurants = slices.displayed(query.tab, &criteria);

    let view = RestaurantsView {
        tab: query.tab,
        heading: results_heading(query.search_text(), query.tab, country, restaurants.len()),
        countries,
        counts: TabCounts::from(&slices),
        restaurants,
        errors,
    };

    (StatusCode::OK, Json(view)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapMode;
    use crate::controller::router_endpoints;
    use crate::helpers::normalizer::PhotoUrlBuilder;
    use crate::models::place::{
        AddressComponent, DetailsResponse, Geometry, LatLng, PlaceOpeningHours, PlaceRecord,
        SearchResponse,
    };
    use crate::repositories::places_repo::{NearbyQuery, PlacesProvider, RankBy, TextQuery};
    use crate::services::places_service::TrendingPolicy;
    use async_trait::async_trait;
    use axum::body::{Body, HttpBody};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Serves two Moroccan places in France and fails prominence queries on demand.
    struct StubProvider {
        fail_trending: bool,
    }

    fn record(id: &str, rating: f64, open_now: Option<bool>) -> PlaceRecord {
        PlaceRecord {
            place_id: Some(id.to_string()),
            name: format!("Riad {}", id),
            vicinity: Some("Lyon".to_string()),
            geometry: Some(Geometry {
                location: LatLng { lat: 45.76, lng: 4.83 },
            }),
            types: vec!["restaurant".to_string(), "moroccan_restaurant".to_string()],
            rating: Some(rating),
            opening_hours: Some(PlaceOpeningHours {
                open_now,
                periods: None,
            }),
            ..Default::default()
        }
    }

    #[async_trait]
    impl PlacesProvider for StubProvider {
        async fn nearby_search(&self, query: &NearbyQuery) -> Result<SearchResponse, PlacesError> {
            if self.fail_trending && query.rank_by == RankBy::Prominence {
                return Ok(SearchResponse {
                    status: "REQUEST_DENIED".to_string(),
                    results: Vec::new(),
                    error_message: Some("The provided API key is invalid.".to_string()),
                });
            }
            Ok(SearchResponse {
                status: "OK".to_string(),
                results: vec![record("a", 4.7, Some(true)), record("b", 3.9, None)],
                error_message: None,
            })
        }

        async fn text_search(&self, _query: &TextQuery) -> Result<SearchResponse, PlacesError> {
            Ok(SearchResponse {
                status: "ZERO_RESULTS".to_string(),
                results: Vec::new(),
                error_message: None,
            })
        }

        async fn place_details(
            &self,
            place_id: &str,
            _fields: &[&str],
        ) -> Result<DetailsResponse, PlacesError> {
            if place_id == "missing" {
                return Ok(DetailsResponse {
                    status: "NOT_FOUND".to_string(),
                    result: None,
                    error_message: None,
                });
            }
            let mut place = record(place_id, 4.7, Some(true));
            place.address_components = Some(vec![AddressComponent {
                long_name: "France".to_string(),
                short_name: "FR".to_string(),
                types: vec!["country".to_string()],
            }]);
            Ok(DetailsResponse {
                status: "OK".to_string(),
                result: Some(place),
                error_message: None,
            })
        }
    }

    fn app(fail_trending: bool) -> Router {
        let places_service = PlacesService::new(
            Arc::new(StubProvider { fail_trending }),
            PhotoUrlBuilder::new("https://places.test", "key"),
            TrendingPolicy::default(),
        );
        router_endpoints(AppState {
            places_service: Arc::new(places_service),
            map_mode: MapMode::Simulated,
            default_location: Location::new(48.8566, 2.3522),
        })
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let mut body = response.into_body();
        let mut bytes = Vec::new();
        while let Some(chunk) = body.data().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn nearby_falls_back_to_default_position() {
        let (status, body) = fetch(app(false), "/restaurants/nearby").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["country"], "France");
        assert_eq!(body[0]["cuisine"], "marocain");
        assert!(body[1]["openNow"].is_null());
    }

    #[tokio::test]
    async fn rejects_half_given_or_invalid_coordinates() {
        let (status, _) = fetch(app(false), "/restaurants/nearby?lat=48.8").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = fetch(app(false), "/restaurants/trending?lat=120&lng=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_text_search_is_rejected() {
        let (status, _) = fetch(app(false), "/restaurants/search?query=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = fetch(app(false), "/restaurants/search?query=tajine").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn provider_failures_map_to_bad_gateway() {
        let (status, body) = fetch(app(true), "/restaurants/trending?lat=45.7&lng=4.8").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn details_map_missing_place_to_not_found() {
        let (status, body) = fetch(app(false), "/restaurants/details/abc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "abc");
        assert!(body["hours"].is_object());

        let (status, _) = fetch(app(false), "/restaurants/details/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn view_filters_active_tab_and_reports_counts() {
        let (status, body) = fetch(
            app(false),
            "/restaurants/view?lat=45.76&lng=4.83&tab=trending&openNow=true&cuisine=marocain",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tab"], "trending");
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 1);
        assert_eq!(body["restaurants"][0]["id"], "a");
        assert_eq!(body["counts"]["restaurants"], 2);
        assert_eq!(body["counts"]["trending"], 2);
        assert_eq!(body["countries"], json!(["France"]));
        assert_eq!(body["heading"], "Restaurants tendance (1)");
    }

    #[tokio::test]
    async fn view_survives_one_failed_slice() {
        let (status, body) = fetch(app(true), "/restaurants/view?rating=4").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 1);
        assert_eq!(body["counts"]["trending"], 0);
        assert_eq!(body["errors"][0]["slice"], "trending");
        assert_eq!(body["errors"][0]["message"], SLICE_FAILURE_MESSAGE);
        assert!(!body.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn view_keeps_every_country_once_one_is_selected() {
        let (status, body) = fetch(app(false), "/restaurants/view?country=Maroc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["restaurants"], json!([]));
        assert_eq!(body["counts"]["restaurants"], 0);
        assert_eq!(body["countries"], json!(["France"]));
        assert_eq!(body["heading"], "Restaurants en Maroc (0)");

        let (_, body) = fetch(app(false), "/restaurants/view?country=france").await;
        assert_eq!(body["counts"]["restaurants"], 2);
        assert_eq!(body["countries"], json!(["France"]));
    }

    #[tokio::test]
    async fn exposes_client_config_and_json_404() {
        let (status, body) = fetch(app(false), "/client-config").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mapMode"], "simulated");
        assert_eq!(body["defaultCenter"]["lat"], 48.8566);

        let (status, _) = fetch(app(false), "/favourites").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
