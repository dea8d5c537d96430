use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::helpers::errors::PlacesError;
use crate::models::place::{DetailsResponse, SearchResponse};
use crate::models::restaurant::Location;

pub const HALAL_KEYWORD: &str = "halal";
pub const RESTAURANT_TYPE: &str = "restaurant";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankBy {
    Radius,
    Prominence,
}

impl RankBy {
    fn as_param(&self) -> &'static str {
        match self {
            RankBy::Radius => "radius",
            RankBy::Prominence => "prominence",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NearbyQuery {
    pub location: Location,
    pub radius: u32,
    pub keyword: String,
    pub rank_by: RankBy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextQuery {
    pub query: String,
    pub location: Location,
    pub radius: u32,
}

/// Raw access to the external places provider.
///
/// Implementations only move payloads; status interpretation and
/// normalization belong to the caller.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn nearby_search(&self, query: &NearbyQuery) -> Result<SearchResponse, PlacesError>;

    async fn text_search(&self, query: &TextQuery) -> Result<SearchResponse, PlacesError>;

    async fn place_details(
        &self,
        place_id: &str,
        fields: &[&str],
    ) -> Result<DetailsResponse, PlacesError>;
}

/// Google Places web service client.
pub struct GooglePlacesRepo {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesRepo {
    pub fn new(
        base_url: &str,
        api_key: &str,
        outbound_proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, PlacesError> {
        let mut builder = Client::builder().timeout(timeout);
        if let Some(proxy) = outbound_proxy {
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, PlacesError> {
        let url = format!("{}/{}/json", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| PlacesError::Decode(format!("{} payload: {}", endpoint, e)))
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesRepo {
    async fn nearby_search(&self, query: &NearbyQuery) -> Result<SearchResponse, PlacesError> {
        info!(
            "Nearby search around {} within {}m ranked by {}",
            query.location,
            query.radius,
            query.rank_by.as_param()
        );
        let mut params = vec![
            ("location", query.location.to_string()),
            ("type", RESTAURANT_TYPE.to_string()),
            ("keyword", query.keyword.clone()),
        ];
        match query.rank_by {
            RankBy::Radius => params.push(("radius", query.radius.to_string())),
            // prominence is the provider default but still needs a radius
            RankBy::Prominence => {
                params.push(("rankby", query.rank_by.as_param().to_string()));
                params.push(("radius", query.radius.to_string()));
            }
        }

        let response: SearchResponse = self.get_json("nearbysearch", &params).await?;
        info!(
            "Nearby search status: {}, {} results",
            response.status,
            response.results.len()
        );
        Ok(response)
    }

    async fn text_search(&self, query: &TextQuery) -> Result<SearchResponse, PlacesError> {
        info!("Text search for \"{}\" around {}", query.query, query.location);
        let params = [
            ("query", query.query.clone()),
            ("location", query.location.to_string()),
            ("radius", query.radius.to_string()),
        ];

        let response: SearchResponse = self.get_json("textsearch", &params).await?;
        info!(
            "Text search status: {}, {} results",
            response.status,
            response.results.len()
        );
        Ok(response)
    }

    async fn place_details(
        &self,
        place_id: &str,
        fields: &[&str],
    ) -> Result<DetailsResponse, PlacesError> {
        debug!("Fetching details [{}] for place {}", fields.join(","), place_id);
        let params = [
            ("place_id", place_id.to_string()),
            ("fields", fields.join(",")),
        ];

        self.get_json("details", &params).await
    }
}
