use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Shown when a place has no country among its address components.
pub const COUNTRY_NOT_SPECIFIED: &str = "Non spécifié";

/// Stock picture used when the provider has no photo for a place.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://images.unsplash.com/photo-1546833998-877b37c2e4c6?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=60";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Cuisine {
    #[serde(rename = "méditerranéen")]
    MiddleEastern,
    #[serde(rename = "indien")]
    Indian,
    #[serde(rename = "turc")]
    Turkish,
    #[serde(rename = "marocain")]
    Moroccan,
    #[serde(rename = "libanais")]
    Lebanese,
    #[serde(rename = "pakistanais")]
    Pakistani,
    #[serde(rename = "africain")]
    African,
    #[serde(rename = "fast-food")]
    FastFood,
    #[serde(rename = "divers")]
    Misc,
}

impl Cuisine {
    pub const ALL: [Cuisine; 9] = [
        Cuisine::MiddleEastern,
        Cuisine::Indian,
        Cuisine::Turkish,
        Cuisine::Moroccan,
        Cuisine::Lebanese,
        Cuisine::Pakistani,
        Cuisine::African,
        Cuisine::FastFood,
        Cuisine::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::MiddleEastern => "méditerranéen",
            Cuisine::Indian => "indien",
            Cuisine::Turkish => "turc",
            Cuisine::Moroccan => "marocain",
            Cuisine::Lebanese => "libanais",
            Cuisine::Pakistani => "pakistanais",
            Cuisine::African => "africain",
            Cuisine::FastFood => "fast-food",
            Cuisine::Misc => "divers",
        }
    }
}

impl FromStr for Cuisine {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Cuisine::ALL
            .into_iter()
            .find(|cuisine| cuisine.as_str() == tag)
            .ok_or_else(|| format!("unknown cuisine tag: {}", tag))
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ascending price tiers, serialized as their currency symbols.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PriceTier {
    #[default]
    #[serde(rename = "€")]
    Inexpensive,
    #[serde(rename = "€€")]
    Moderate,
    #[serde(rename = "€€€")]
    Expensive,
    #[serde(rename = "€€€€")]
    VeryExpensive,
}

/// Provider weekday numbering: 0 is sunday.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const WEEK: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn index(&self) -> u8 {
        *self as u8
    }
}

pub type OpeningHours = BTreeMap<Weekday, String>;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    pub rating: f64,
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_time: Option<String>,
    pub text: String,
}

/// A normalized place. List results leave the detail-only fields empty.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Location,
    pub cuisine: Cuisine,
    pub rating: f64,
    pub price: PriceTier,
    pub image: String,
    /// `None` when the provider does not report live hours.
    pub open_now: Option<bool>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<OpeningHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
}

impl Restaurant {
    pub fn has_country(&self) -> bool {
        !self.country.is_empty() && self.country != COUNTRY_NOT_SPECIFIED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuisine_tags_parse_back() {
        for cuisine in Cuisine::ALL {
            assert_eq!(cuisine.as_str().parse::<Cuisine>(), Ok(cuisine));
        }
        assert!("all".parse::<Cuisine>().is_err());
    }

    #[test]
    fn serializes_unknown_open_state_as_null() {
        let restaurant = Restaurant {
            id: "abc".to_string(),
            name: "Chez Ali".to_string(),
            address: "12 rue de la Paix".to_string(),
            location: Location::new(48.85, 2.35),
            cuisine: Cuisine::Moroccan,
            rating: 4.2,
            price: PriceTier::Moderate,
            image: PLACEHOLDER_IMAGE_URL.to_string(),
            open_now: None,
            country: "France".to_string(),
            user_ratings_total: None,
            hours: None,
            phone: None,
            website: None,
            photos: None,
            reviews: None,
        };

        let value = serde_json::to_value(&restaurant).unwrap();
        assert!(value["openNow"].is_null());
        assert_eq!(value["cuisine"], "marocain");
        assert_eq!(value["price"], "€€");
        assert!(value.get("hours").is_none());
        assert!(value.get("reviews").is_none());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Location::new(48.85, 2.35).is_valid());
        assert!(!Location::new(91.0, 0.0).is_valid());
        assert!(!Location::new(0.0, f64::NAN).is_valid());
    }
}
