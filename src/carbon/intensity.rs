//! Carbon-intensity sources.
//!
//! The grid intensity (grams CO2 per kWh) comes from an external HTTP API.
//! A trait seam keeps the submission pipeline testable and lets callers
//! pass a fixed scalar instead of hitting the network.

use crate::utils::config::{DEFAULT_HTTP_TIMEOUT, DEFAULT_INTENSITY_URL};
use crate::utils::error::CarbonError;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;

/// Source of the current grid carbon intensity
pub trait IntensitySource {
    /// Current intensity in grams CO2 per kWh
    fn current_intensity(&self) -> Result<f64, CarbonError>;
}

/// A fixed intensity scalar, for tests and offline runs
pub struct FixedIntensity(pub f64);

impl IntensitySource for FixedIntensity {
    fn current_intensity(&self) -> Result<f64, CarbonError> {
        Ok(self.0)
    }
}

/// Relevant part of the intensity API response
#[derive(Debug, Deserialize)]
struct IntensityResponse {
    #[serde(rename = "carbonIntensity")]
    carbon_intensity: Option<f64>,
}

/// HTTP client for the electricity map intensity API
pub struct ElectricityMapClient {
    client: Client,
    url: String,
    auth_token: Option<String>,
}

impl ElectricityMapClient {
    /// Create a client against the default endpoint
    pub fn new(auth_token: Option<String>) -> Result<Self, CarbonError> {
        Self::with_url(DEFAULT_INTENSITY_URL, auth_token)
    }

    /// Create a client against a custom endpoint
    pub fn with_url(url: impl Into<String>, auth_token: Option<String>) -> Result<Self, CarbonError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(CarbonError::RequestFailed)?;

        Ok(Self {
            client,
            url: url.into(),
            auth_token,
        })
    }
}

impl IntensitySource for ElectricityMapClient {
    fn current_intensity(&self) -> Result<f64, CarbonError> {
        debug!("Fetching carbon intensity from {}", self.url);

        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.auth_token {
            request = request.header("auth-token", token);
        }

        let response = request.send().map_err(CarbonError::RequestFailed)?;

        if !response.status().is_success() {
            return Err(CarbonError::InvalidResponse(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: IntensityResponse = response.json().map_err(CarbonError::RequestFailed)?;

        body.carbon_intensity.ok_or_else(|| {
            CarbonError::InvalidResponse("missing carbonIntensity field".to_string())
        })
    }
}
