//! HTTP client for the external itinerary-generation backend.
//!
//! The backend is an opaque text-generation service behind a JSON contract.
//! Everything it returns is treated as untrusted: times arrive as strings,
//! activity categories as free text. Callers normalize before anything
//! reaches the itinerary model, and every failure here is recoverable; the
//! orchestration layer degrades to local generation.

use std::env;
use std::error::Error;
use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};

const ENDPOINT_ENV: &str = "ITINERARY_GENERATION_URL";
const API_KEY_ENV: &str = "ITINERARY_GENERATION_API_KEY";

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateItineraryRequest {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub budget: f64,
    pub pace: String,
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destinations: Option<Vec<RequestDestination>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_multi_destination: Option<bool>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RequestDestination {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_days: Option<u32>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateDayRequest {
    pub destination: String,
    pub date: String,
    pub day_number: u32,
    pub current_activities: Vec<WireActivity>,
    pub budget: f64,
    pub pace: String,
    pub interests: Vec<String>,
    pub user_changes: UserChanges,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    pub modified: bool,
    pub instruction: String,
}

/// One day as the backend reports it.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireDayPlan {
    pub day: u32,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub activities: Vec<WireActivity>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub total_duration: Option<u32>,
    #[serde(default)]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub destination_name: Option<String>,
    #[serde(default)]
    pub is_travel: Option<bool>,
    #[serde(default)]
    pub travel_details: Option<String>,
}

/// An activity as the backend reports it. `activity_type` is free text and
/// `time` a raw string; both are normalized on the way in.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireActivity {
    #[serde(default)]
    pub id: Option<String>,
    pub time: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub location: Option<WireLocation>,
    #[serde(default)]
    pub rationale: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WireLocation {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedItinerary {
    pub itinerary: Vec<WireDayPlan>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegeneratedDay {
    pub day_plan: WireDayPlan,
}

#[derive(Debug)]
pub enum GenerationError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            GenerationError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GenerationError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::HttpError(err)
    }
}

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GenerationClient {
    pub fn new() -> Result<Self, GenerationError> {
        let endpoint = env::var(ENDPOINT_ENV).map_err(|_| {
            GenerationError::EnvironmentError(format!("{} not set", ENDPOINT_ENV))
        })?;
        let api_key = env::var(API_KEY_ENV).ok();

        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
        })
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    pub async fn generate_itinerary(
        &self,
        request: &GenerateItineraryRequest,
    ) -> Result<GeneratedItinerary, GenerationError> {
        let url = format!("{}/generate", self.endpoint.trim_end_matches('/'));
        self.post_json(&url, request).await
    }

    pub async fn regenerate_day(
        &self,
        request: &RegenerateDayRequest,
    ) -> Result<RegeneratedDay, GenerationError> {
        let url = format!("{}/regenerate", self.endpoint.trim_end_matches('/'));
        self.post_json(&url, request).await
    }

    async fn post_json<Req, Resp>(&self, url: &str, request: &Req) -> Result<Resp, GenerationError>
    where
        Req: Serialize,
        Resp: serde::de::DeserializeOwned,
    {
        let mut builder = self.client.post(url).json(request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(GenerationError::ResponseError(format!(
                "generation backend returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            GenerationError::ResponseError(format!("malformed generation response: {}", e))
        })
    }
}
