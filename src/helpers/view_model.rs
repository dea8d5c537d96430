use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::filter::{ActiveTab, FilterCriteria};
use crate::models::restaurant::Restaurant;

/// Distinct real countries of a collection, sorted.
pub fn available_countries(restaurants: &[Restaurant]) -> Vec<String> {
    restaurants
        .iter()
        .filter(|restaurant| restaurant.has_country())
        .map(|restaurant| restaurant.country.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn matches(restaurant: &Restaurant, criteria: &FilterCriteria) -> bool {
    if let Some(cuisine) = criteria.cuisine {
        if restaurant.cuisine != cuisine {
            return false;
        }
    }

    if restaurant.rating < criteria.min_rating() {
        return false;
    }

    // unknown open state never satisfies "open now"
    if criteria.open_now && restaurant.open_now != Some(true) {
        return false;
    }

    true
}

/// Keeps the restaurants matching every criterion, in input order.
pub fn filter_restaurants(restaurants: &[Restaurant], criteria: &FilterCriteria) -> Vec<Restaurant> {
    restaurants
        .iter()
        .filter(|restaurant| matches(restaurant, criteria))
        .cloned()
        .collect()
}

/// The two result slices the browser switches between.
#[derive(Clone, Debug, Default)]
pub struct ResultSlices {
    pub restaurants: Vec<Restaurant>,
    pub trending: Vec<Restaurant>,
}

impl ResultSlices {
    pub fn for_tab(&self, tab: ActiveTab) -> &[Restaurant] {
        match tab {
            ActiveTab::Restaurants => &self.restaurants,
            ActiveTab::Trending => &self.trending,
        }
    }

    pub fn displayed(&self, tab: ActiveTab, criteria: &FilterCriteria) -> Vec<Restaurant> {
        filter_restaurants(self.for_tab(tab), criteria)
    }
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub struct TabCounts {
    pub restaurants: usize,
    pub trending: usize,
}

impl From<&ResultSlices> for TabCounts {
    fn from(slices: &ResultSlices) -> Self {
        Self {
            restaurants: slices.restaurants.len(),
            trending: slices.trending.len(),
        }
    }
}

pub fn results_heading(
    query: Option<&str>,
    tab: ActiveTab,
    country: Option<&str>,
    shown: usize,
) -> String {
    let mut heading = match (query.map(str::trim).filter(|q| !q.is_empty()), tab) {
        (Some(query), _) => format!("Résultats pour \"{}\"", query),
        (None, ActiveTab::Trending) => "Restaurants tendance".to_string(),
        (None, ActiveTab::Restaurants) => "Restaurants".to_string(),
    };

    if let Some(country) = country {
        heading.push_str(&format!(" en {}", country));
    }

    format!("{} ({})", heading, shown)
}
