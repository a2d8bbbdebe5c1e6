use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::GeocodeError,
    model::{BoundingBox, LngLat},
    transport::{HttpTransport, ReqwestTransport, TransportResponse},
};

pub const BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/";
pub const DEFAULT_COUNTRY: &str = "US";

/// How the proximity center is written into the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProximityFormat {
    /// `&proximity=<lng>,<lat>`
    #[default]
    Named,
    /// `&<lng>,<lat>`, without the parameter name. The API ignores it; kept for
    /// byte-for-byte compatibility with older callers.
    Bare,
}

/// Per-client query settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub access_token: Option<String>,
    pub search_center: Option<LngLat>,
    pub search_bounds: Option<BoundingBox>,
    pub country: Option<String>,
    pub proximity_format: ProximityFormat,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            search_center: None,
            search_bounds: None,
            country: Some(DEFAULT_COUNTRY.to_string()),
            proximity_format: ProximityFormat::default(),
        }
    }
}

/// Forward and reverse geocoding against the Mapbox v5 API.
///
/// Configure once with the setters, then issue any number of queries. Each
/// query reads the settings as they are when it is called.
#[derive(Debug, Clone)]
pub struct GeocodeClient<T = ReqwestTransport> {
    settings: ClientSettings,
    transport: T,
}

impl GeocodeClient<ReqwestTransport> {
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }
}

impl Default for GeocodeClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpTransport> GeocodeClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self::from_settings(ClientSettings::default(), transport)
    }

    pub fn from_settings(settings: ClientSettings, transport: T) -> Self {
        Self { settings, transport }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.settings.access_token = Some(token.into());
    }

    /// `None` clears the proximity bias.
    pub fn set_search_center(&mut self, center: Option<LngLat>) {
        self.settings.search_center = center;
    }

    /// `None` clears the bounding-box filter.
    pub fn set_search_bounds(&mut self, bbox: Option<BoundingBox>) {
        self.settings.search_bounds = bbox;
    }

    /// `None` drops the `country` filter entirely.
    pub fn set_country(&mut self, country: Option<String>) {
        self.settings.country = country;
    }

    pub fn set_proximity_format(&mut self, format: ProximityFormat) {
        self.settings.proximity_format = format;
    }

    /// Forward geocode a free-text address.
    pub async fn geocode(
        &self,
        dataset: impl AsRef<str>,
        address: &str,
    ) -> Result<Value, GeocodeError> {
        self.query(dataset.as_ref(), address).await
    }

    /// Reverse geocode a coordinate pair.
    pub async fn reverse_geocode(
        &self,
        dataset: impl AsRef<str>,
        lng: f64,
        lat: f64,
    ) -> Result<Value, GeocodeError> {
        let query = LngLat::new(lng, lat).to_string();
        self.query(dataset.as_ref(), &query).await
    }

    /// Build the request URL for `dataset` and `query` after checking
    /// preconditions. Neither `dataset` nor `query` is percent-encoded here.
    pub fn build_url(&self, dataset: &str, query: &str) -> Result<String, GeocodeError> {
        let token = self
            .settings
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(GeocodeError::AccessTokenNotSet)?;

        if dataset.is_empty() {
            return Err(GeocodeError::DatasetRequired);
        }

        if query.is_empty() {
            return Err(GeocodeError::QueryRequired);
        }

        let mut url = format!("{BASE_URL}{dataset}/{query}.json?access_token={token}");

        if let Some(country) = &self.settings.country {
            url.push_str("&country=");
            url.push_str(country);
        }

        if let Some(bbox) = &self.settings.search_bounds {
            url.push_str(&format!("&bbox={bbox}"));
        }

        if let Some(center) = &self.settings.search_center {
            match self.settings.proximity_format {
                ProximityFormat::Named => url.push_str(&format!("&proximity={center}")),
                ProximityFormat::Bare => url.push_str(&format!("&{center}")),
            }
        }

        Ok(url)
    }

    async fn query(&self, dataset: &str, query: &str) -> Result<Value, GeocodeError> {
        let url = self.build_url(dataset, query)?;

        tracing::debug!(dataset, "sending geocoding request");

        let res = self.transport.get(&url).await.inspect_err(|e| {
            tracing::warn!(%e, dataset, "geocoding request failed");
        })?;

        tracing::debug!(status = res.status, dataset, "geocoding response received");

        interpret(res)
    }
}

fn interpret(res: TransportResponse) -> Result<Value, GeocodeError> {
    let TransportResponse { status, body } = res;

    if status != 200 {
        tracing::warn!(status, "geocoding API returned an error status");
        return Err(match serde_json::from_str::<Value>(&body) {
            Ok(body) => GeocodeError::Api { status, body },
            Err(_) => GeocodeError::ApiRaw { status, body },
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(%e, "geocoding response is not valid JSON");
        GeocodeError::Decode(e)
    })
}
