use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed taxonomy for scheduled items. Free-text categories coming from the
/// generation backend or user input are normalized into this set before they
/// enter an itinerary (see `ActivityGenerationService::normalize_type`).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Attraction,
    Food,
    Transport,
    Shopping,
    Nature,
    History,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Attraction => "attraction",
            ActivityType::Food => "food",
            ActivityType::Transport => "transport",
            ActivityType::Shopping => "shopping",
            ActivityType::Nature => "nature",
            ActivityType::History => "history",
        }
    }
}

/// Coordinates plus a display address. May be synthetic placeholder data; no
/// geographic validity is guaranteed or checked.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ActivityLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl ActivityLocation {
    pub fn placeholder(destination: &str) -> Self {
        Self {
            lat: 0.0,
            lng: 0.0,
            address: destination.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub time: NaiveTime,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub duration_minutes: u32,
    pub cost: f64,
    pub location: ActivityLocation,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rationale: Option<String>,
    pub order_index: u32,
}

impl Activity {
    pub fn new(
        time: NaiveTime,
        name: impl Into<String>,
        description: impl Into<String>,
        activity_type: ActivityType,
        duration_minutes: u32,
        cost: f64,
        location: ActivityLocation,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time,
            name: name.into(),
            description: description.into(),
            activity_type,
            duration_minutes,
            cost,
            location,
            rationale: None,
            order_index: 0,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// End of the activity's time box, clamped to the same calendar day.
    pub fn end_time(&self) -> NaiveTime {
        crate::services::time_utils::add_minutes(self.time, self.duration_minutes as i64)
    }
}
