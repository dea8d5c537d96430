use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::helpers::errors::PlacesError;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PlacePhoto {
    pub photo_reference: String,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub width: Option<i64>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PeriodPoint {
    pub day: u8,
    pub time: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct OpeningPeriod {
    pub open: PeriodPoint,
    #[serde(default)]
    pub close: Option<PeriodPoint>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PlaceOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    /// `None` when no schedule is published. An empty list is a week without openings.
    #[serde(default)]
    pub periods: Option<Vec<OpeningPeriod>>,
}

#[serde_as]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PlaceReview {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub relative_time_description: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// One place as the provider returns it, for list and detail payloads alike.
#[serde_as]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PlaceRecord {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<i64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
    #[serde(default)]
    pub opening_hours: Option<PlaceOpeningHours>,
    #[serde(default)]
    pub address_components: Option<Vec<AddressComponent>>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub reviews: Option<Vec<PlaceReview>>,
}

/// Envelope of nearby and text search responses.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct SearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceRecord>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl SearchResponse {
    pub fn into_results(self) -> Result<Vec<PlaceRecord>, PlacesError> {
        match self.status.as_str() {
            STATUS_OK => Ok(self.results),
            STATUS_ZERO_RESULTS => Ok(Vec::new()),
            _ => Err(PlacesError::provider(self.status, self.error_message)),
        }
    }
}

/// Envelope of a place details response.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<PlaceRecord>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl DetailsResponse {
    pub fn into_result(self, place_id: &str) -> Result<PlaceRecord, PlacesError> {
        match self.status.as_str() {
            STATUS_OK => self.result.ok_or_else(|| PlacesError::NotFound {
                place_id: place_id.to_string(),
            }),
            STATUS_ZERO_RESULTS | "NOT_FOUND" => Err(PlacesError::NotFound {
                place_id: place_id.to_string(),
            }),
            _ => Err(PlacesError::provider(self.status, self.error_message)),
        }
    }
}
