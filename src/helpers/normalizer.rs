//! Maps raw provider place records into [`Restaurant`] values.
//!
//! Nothing here fails on a missing optional field; each gets a fixed default.
//! A record is only rejected when it cannot be identified or placed on a map.

use reqwest::Url;
use tracing::warn;

use crate::helpers::errors::NormalizeError;
use crate::models::place::{AddressComponent, OpeningPeriod, PlaceRecord};
use crate::models::restaurant::{
    Cuisine, Location, OpeningHours, PriceTier, Restaurant, Review, Weekday,
    COUNTRY_NOT_SPECIFIED, PLACEHOLDER_IMAGE_URL,
};

pub const LIST_PHOTO_MAX_WIDTH: u32 = 400;
pub const DETAIL_PHOTO_MAX_WIDTH: u32 = 800;
pub const MAX_DETAIL_PHOTOS: usize = 5;
pub const CLOSED_LABEL: &str = "Fermé";

const OPEN_ENDED_CLOSE: &str = "00:00";

/// Specific cuisine categories, checked in this order.
const CUISINE_CATEGORIES: [(&str, Cuisine); 7] = [
    ("middle_eastern_restaurant", Cuisine::MiddleEastern),
    ("indian_restaurant", Cuisine::Indian),
    ("turkish_restaurant", Cuisine::Turkish),
    ("moroccan_restaurant", Cuisine::Moroccan),
    ("lebanese_restaurant", Cuisine::Lebanese),
    ("pakistani_restaurant", Cuisine::Pakistani),
    ("african_restaurant", Cuisine::African),
];

const TAKEAWAY_CATEGORIES: [&str; 2] = ["meal_takeaway", "meal_delivery"];

/// Builds photo URLs against the provider's photo endpoint.
#[derive(Clone, Debug)]
pub struct PhotoUrlBuilder {
    base_url: String,
    api_key: String,
}

impl PhotoUrlBuilder {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn url(&self, photo_reference: &str, max_width: u32) -> String {
        let endpoint = format!("{}/photo", self.base_url);
        let params = [
            ("maxwidth", max_width.to_string()),
            ("photoreference", photo_reference.to_string()),
            ("key", self.api_key.clone()),
        ];

        match Url::parse_with_params(&endpoint, &params) {
            Ok(url) => url.into(),
            Err(e) => {
                warn!("Cannot build photo url on {}: {}", self.base_url, e);
                PLACEHOLDER_IMAGE_URL.to_string()
            }
        }
    }
}

pub fn classify_cuisine(types: &[String]) -> Cuisine {
    let has = |category: &str| types.iter().any(|t| t == category);

    if has("restaurant") {
        if let Some((_, cuisine)) = CUISINE_CATEGORIES
            .iter()
            .find(|(category, _)| has(*category))
        {
            return *cuisine;
        }
    }

    if TAKEAWAY_CATEGORIES.iter().any(|category| has(*category)) {
        return Cuisine::FastFood;
    }

    Cuisine::Misc
}

pub fn price_tier(price_level: Option<i64>) -> PriceTier {
    match price_level {
        Some(2) => PriceTier::Moderate,
        Some(3) => PriceTier::Expensive,
        Some(4) => PriceTier::VeryExpensive,
        _ => PriceTier::Inexpensive,
    }
}

pub fn normalize_rating(rating: Option<f64>) -> f64 {
    match rating {
        Some(rating) if rating.is_finite() => rating.clamp(0.0, 5.0),
        _ => 0.0,
    }
}

/// Long country name among the address components, or the sentinel.
pub fn extract_country(components: Option<&[AddressComponent]>) -> String {
    components
        .and_then(|components| {
            components
                .iter()
                .find(|component| component.types.iter().any(|t| t == "country"))
        })
        .map(|component| component.long_name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(COUNTRY_NOT_SPECIFIED)
        .to_string()
}

/// Turns a provider "hhmm" time into "hh:mm". Anything else is returned as is.
pub fn format_time(time: &str) -> String {
    match (time.get(0..2), time.get(2..4)) {
        (Some(hours), Some(minutes)) if time.len() == 4 => format!("{}:{}", hours, minutes),
        _ => time.to_string(),
    }
}

pub fn format_hours(periods: &[OpeningPeriod]) -> OpeningHours {
    Weekday::WEEK
        .into_iter()
        .map(|day| {
            let slots = periods
                .iter()
                .filter(|period| period.open.day == day.index())
                .map(|period| {
                    let close = period
                        .close
                        .as_ref()
                        .map(|close| format_time(&close.time))
                        .unwrap_or_else(|| OPEN_ENDED_CLOSE.to_string());
                    format!("{} - {}", format_time(&period.open.time), close)
                })
                .collect::<Vec<_>>();

            if slots.is_empty() {
                (day, CLOSED_LABEL.to_string())
            } else {
                (day, slots.join(", "))
            }
        })
        .collect()
}

fn location_of(place: &PlaceRecord, place_id: &str) -> Result<Location, NormalizeError> {
    place
        .geometry
        .as_ref()
        .map(|geometry| Location::new(geometry.location.lat, geometry.location.lng))
        .filter(Location::is_valid)
        .ok_or_else(|| NormalizeError::MissingLocation {
            place_id: place_id.to_string(),
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Normalizes a search hit. `country` comes from a separate details lookup.
pub fn normalize_listing(
    place: PlaceRecord,
    country: String,
    photo_urls: &PhotoUrlBuilder,
) -> Result<Restaurant, NormalizeError> {
    let id = place.place_id.clone().ok_or(NormalizeError::MissingId)?;
    let location = location_of(&place, &id)?;
    let image = place
        .photos
        .first()
        .map(|photo| photo_urls.url(&photo.photo_reference, LIST_PHOTO_MAX_WIDTH))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

    Ok(Restaurant {
        id,
        cuisine: classify_cuisine(&place.types),
        rating: normalize_rating(place.rating),
        price: price_tier(place.price_level),
        open_now: place.opening_hours.as_ref().and_then(|hours| hours.open_now),
        address: place
            .vicinity
            .or(place.formatted_address)
            .unwrap_or_default(),
        name: place.name,
        location,
        image,
        country: if country.trim().is_empty() {
            COUNTRY_NOT_SPECIFIED.to_string()
        } else {
            country
        },
        user_ratings_total: place.user_ratings_total,
        hours: None,
        phone: None,
        website: None,
        photos: None,
        reviews: None,
    })
}

/// Normalizes a details payload into a fully populated restaurant.
///
/// The requested `place_id` wins over whatever the payload carries so a
/// restaurant keeps its identity between the list and the details views.
pub fn normalize_details(
    place_id: &str,
    place: PlaceRecord,
    photo_urls: &PhotoUrlBuilder,
) -> Result<Restaurant, NormalizeError> {
    if place_id.trim().is_empty() {
        return Err(NormalizeError::MissingId);
    }
    let location = location_of(&place, place_id)?;
    let country = extract_country(place.address_components.as_deref());

    let photos = place
        .photos
        .iter()
        .take(MAX_DETAIL_PHOTOS)
        .map(|photo| photo_urls.url(&photo.photo_reference, DETAIL_PHOTO_MAX_WIDTH))
        .collect::<Vec<_>>();
    let image = photos
        .first()
        .cloned()
        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

    let hours = place
        .opening_hours
        .as_ref()
        .and_then(|hours| hours.periods.as_deref())
        .map(format_hours)
        .unwrap_or_default();

    let reviews = place
        .reviews
        .unwrap_or_default()
        .into_iter()
        .map(|review| Review {
            author: review.author_name,
            rating: normalize_rating(review.rating),
            time: review.time,
            relative_time: review.relative_time_description,
            text: review.text,
        })
        .collect();

    Ok(Restaurant {
        id: place_id.to_string(),
        name: place.name,
        address: place
            .formatted_address
            .or(place.vicinity)
            .unwrap_or_default(),
        location,
        cuisine: classify_cuisine(&place.types),
        rating: normalize_rating(place.rating),
        price: price_tier(place.price_level),
        image,
        open_now: place.opening_hours.as_ref().and_then(|hours| hours.open_now),
        country,
        user_ratings_total: Some(place.user_ratings_total.unwrap_or(0)),
        hours: Some(hours),
        phone: non_blank(place.formatted_phone_number),
        website: non_blank(place.website),
        photos: Some(photos),
        reviews: Some(reviews),
    })
}
