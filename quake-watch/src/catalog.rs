//! USGS FDSN event catalog client

use std::time::Duration;

use serde::Deserialize;

use crate::action::Action;
use crate::filters::{EventType, FilterState, RequestWindow};
use crate::state::{Marker, Position};

pub const USGS_EVENT_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";
/// Server-side cap on records per request. No pagination past it.
pub const RESULT_LIMIT: usize = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("quake-watch/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Query
// ============================================================================

/// Everything a single catalog request needs. Built fresh for every fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogQuery {
    pub event_type: EventType,
    pub window: RequestWindow,
    pub limit: usize,
}

impl CatalogQuery {
    pub fn for_filters(filters: &FilterState) -> Self {
        Self {
            event_type: filters.event_type,
            window: filters.window(),
            limit: RESULT_LIMIT,
        }
    }

    /// Query parameters in request order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", "geojson".to_string()),
            ("eventtype", self.event_type.as_param().to_string()),
            ("starttime", self.window.start_param()),
            ("endtime", self.window.end_param()),
            ("limit", self.limit.to_string()),
        ]
    }

    pub fn url(&self, endpoint: &str) -> String {
        let query = self
            .params()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", endpoint, query)
    }
}

// ============================================================================
// Response
// ============================================================================

/// GeoJSON feature collection as returned with `format=geojson`.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub id: String,
    pub properties: FeatureProperties,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeatureProperties {
    pub mag: Option<f64>,
    pub place: Option<String>,
}

/// `coordinates` is `[longitude, latitude, depth]`.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<f64>,
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("feature `{id}` has {len} coordinates, expected at least 2")]
    Geometry { id: String, len: usize },
}

/// Tooltip text for one event. Missing values print as `null`.
pub fn marker_label(mag: Option<f64>, place: Option<&str>) -> String {
    let mag = mag.map_or_else(|| "null".to_string(), |mag| mag.to_string());
    format!("Magnitude: {}, Location: {}", mag, place.unwrap_or("null"))
}

pub fn marker_from_feature(feature: Feature) -> Result<Marker, CatalogError> {
    let coordinates = feature
        .geometry
        .map(|geometry| geometry.coordinates)
        .unwrap_or_default();
    let (lng, lat) = match coordinates.as_slice() {
        [lng, lat, ..] => (*lng, *lat),
        _ => {
            return Err(CatalogError::Geometry {
                id: feature.id,
                len: coordinates.len(),
            })
        }
    };

    Ok(Marker {
        label: marker_label(feature.properties.mag, feature.properties.place.as_deref()),
        id: feature.id,
        position: Position { lat, lng },
    })
}

/// Decode a response body. One malformed feature rejects the whole response.
pub fn decode_markers(body: &[u8]) -> Result<Vec<Marker>, CatalogError> {
    let collection: FeatureCollection = serde_json::from_slice(body)?;
    collection
        .features
        .into_iter()
        .map(marker_from_feature)
        .collect()
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: USGS_EVENT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct CatalogClient {
    client: reqwest::Client,
    endpoint: String,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_markers(&self, query: &CatalogQuery) -> Result<Vec<Marker>, CatalogError> {
        let response = self.client.get(query.url(&self.endpoint)).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }
        let body = response.bytes().await?;
        decode_markers(&body)
    }
}

/// Run fetch `seq` and turn its outcome into the action the reducer expects.
pub async fn fetch_action(client: &CatalogClient, seq: u64, query: CatalogQuery) -> Action {
    match client.fetch_markers(&query).await {
        Ok(markers) => {
            log::info!("event=fetch_ok seq={} count={}", seq, markers.len());
            Action::MarkersDidLoad { seq, markers }
        }
        Err(err) => {
            log::error!("event=fetch_failed seq={} error={}", seq, err);
            Action::MarkersDidError {
                seq,
                error: err.to_string(),
            }
        }
    }
}
