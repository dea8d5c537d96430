use serde::{Deserialize, Deserializer, Serialize};

use crate::models::restaurant::Cuisine;

/// Wildcard accepted wherever a cuisine or country can be selected.
pub const ALL: &str = "all";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTab {
    #[default]
    Restaurants,
    Trending,
}

/// User-selected narrowing of a result list. Every field is an independent predicate.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// `None` stands for the "all" wildcard.
    #[serde(default, deserialize_with = "deserialize_cuisine")]
    pub cuisine: Option<Cuisine>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub open_now: bool,
    #[serde(default, deserialize_with = "deserialize_country")]
    pub country: Option<String>,
}

impl FilterCriteria {
    /// Minimum rating bounded to the provider's 0-5 scale.
    pub fn min_rating(&self) -> f64 {
        if self.rating.is_nan() {
            return 0.0;
        }
        self.rating.clamp(0.0, 5.0)
    }
}

/// Maps blank and "all" to no country filter.
pub fn country_filter(country: Option<&str>) -> Option<&str> {
    country
        .map(str::trim)
        .filter(|country| !country.is_empty() && !country.eq_ignore_ascii_case(ALL))
}

pub fn deserialize_cuisine<'de, D>(deserializer: D) -> Result<Option<Cuisine>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag: Option<String> = Option::deserialize(deserializer)?;
    match tag.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(tag) if tag.eq_ignore_ascii_case(ALL) => Ok(None),
        Some(tag) => tag.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

pub fn deserialize_country<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let country: Option<String> = Option::deserialize(deserializer)?;
    Ok(country_filter(country.as_deref()).map(str::to_string))
}
