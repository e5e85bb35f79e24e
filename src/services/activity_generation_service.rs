use chrono::NaiveTime;
use log::{info, warn};
use rand::Rng;

use crate::models::activity::{Activity, ActivityLocation, ActivityType};
use crate::models::trip::TripRequest;
use crate::services::edit_service::{MAX_ACTIVITY_DURATION_MINUTES, MIN_ACTIVITY_DURATION_MINUTES};
use crate::services::generation_client::{
    GenerateItineraryRequest, GenerationClient, RequestDestination, WireActivity, WireDayPlan,
};
use crate::services::time_utils;

/// Fallback cost shares, as fractions of the total trip budget.
const FALLBACK_ATTRACTION_SHARE: f64 = 0.10;
const FALLBACK_FOOD_SHARE: f64 = 0.05;
const FALLBACK_HISTORY_SHARE: f64 = 0.08;
/// Per-day jitter bounds applied to the fallback costs.
const FALLBACK_JITTER_MIN: f64 = 0.8;
const FALLBACK_JITTER_MAX: f64 = 1.2;

const DEFAULT_ACTIVITY_DURATION_MINUTES: u32 = 60;

/// Orchestrates per-day activity generation. The actual content comes from
/// the external backend when one is configured; any failure there resolves
/// to the deterministic local generator within the same call, so this
/// service never fails and never returns an empty day.
pub struct ActivityGenerationService {
    client: Option<GenerationClient>,
}

impl ActivityGenerationService {
    pub fn new() -> Self {
        let client = match GenerationClient::new() {
            Ok(client) => {
                info!("Generation backend configured");
                Some(client)
            }
            Err(e) => {
                warn!("Generation backend not available: {}. Using local generation.", e);
                None
            }
        };
        Self { client }
    }

    pub fn with_client(client: Option<GenerationClient>) -> Self {
        Self { client }
    }

    /// Produce one activity list per trip day, indexed by day (0-based).
    ///
    /// The external backend is asked once for the whole trip; a transport or
    /// parse failure falls back to local generation for every day. A partial
    /// external response is returned as-is; the assembler owns pad/truncate.
    pub async fn generate_trip_activities(&self, request: &TripRequest) -> Vec<Vec<Activity>> {
        let total_days = request.total_days();

        if let Some(ref client) = self.client {
            match client.generate_itinerary(&Self::build_request(request)).await {
                Ok(generated) => {
                    info!(
                        "Generation backend returned {} day(s) for {}",
                        generated.itinerary.len(),
                        request.destination_summary
                    );
                    return generated
                        .itinerary
                        .iter()
                        .map(|plan| Self::convert_wire_day(plan, &request.destination_summary))
                        .collect();
                }
                Err(e) => {
                    warn!("Generation backend failed: {}. Using local generation.", e);
                }
            }
        }

        (1..=total_days)
            .map(|day| Self::fallback_day(request.budget, &request.destination_summary, day))
            .collect()
    }

    fn build_request(request: &TripRequest) -> GenerateItineraryRequest {
        let (min_count, max_count) = request.pace.activity_count_range();
        let destinations: Vec<RequestDestination> = request
            .destinations
            .iter()
            .map(|d| RequestDestination {
                name: d.name.clone(),
                planned_days: d.planned_days,
            })
            .collect();

        GenerateItineraryRequest {
            destination: request.destination_summary.clone(),
            start_date: request.start_date.format("%Y-%m-%d").to_string(),
            end_date: request.end_date.format("%Y-%m-%d").to_string(),
            budget: request.budget,
            pace: format!("{:?}", request.pace).to_lowercase(),
            interests: request.interests.clone(),
            from: None,
            user_preferences: Some(format!(
                "Plan {} to {} activities per day",
                min_count, max_count
            )),
            trip_type: Some(match request.trip_type {
                crate::models::trip::TripType::Single => "single",
                crate::models::trip::TripType::MultiFixed => "multi_fixed",
                crate::models::trip::TripType::MultiFlexible => "multi_flexible",
            }
            .to_string()),
            destinations: if destinations.is_empty() {
                None
            } else {
                Some(destinations)
            },
            is_multi_destination: Some(!request.destinations.is_empty()),
        }
    }

    /// Normalize a free-text category into the closed taxonomy. Idempotent:
    /// the six canonical names map to themselves, everything unrecognized
    /// defaults to `attraction`.
    pub fn normalize_type(raw: &str) -> ActivityType {
        match raw.trim().to_lowercase().as_str() {
            "attraction" | "museum" | "gallery" | "landmark" | "monument" | "sightseeing"
            | "viewpoint" | "theme park" | "show" => ActivityType::Attraction,
            "food" | "restaurant" | "cafe" | "dining" | "street food" | "food market"
            | "brunch" | "bar" => ActivityType::Food,
            "transport" | "transportation" | "taxi" | "train" | "bus" | "ferry" | "flight"
            | "transfer" => ActivityType::Transport,
            "shopping" | "bazaar" | "market" | "mall" | "boutique" | "souvenir" => {
                ActivityType::Shopping
            }
            "nature" | "park" | "garden" | "hike" | "hiking" | "beach" | "lake" | "wildlife" => {
                ActivityType::Nature
            }
            "history" | "historical" | "temple" | "shrine" | "castle" | "palace" | "ruins"
            | "heritage" => ActivityType::History,
            _ => ActivityType::Attraction,
        }
    }

    /// Convert one backend day into model activities. Entries without a
    /// parsable time are dropped; a day that converts to nothing is treated
    /// as missing by the assembler.
    pub(crate) fn convert_wire_day(plan: &WireDayPlan, default_destination: &str) -> Vec<Activity> {
        let destination = plan
            .destination_name
            .as_deref()
            .unwrap_or(default_destination);

        let mut activities = Vec::new();
        for wire in &plan.activities {
            let time = match time_utils::parse_time(&wire.time) {
                Some(time) => time,
                None => {
                    warn!("Dropping activity '{}' with unparsable time '{}'", wire.name, wire.time);
                    continue;
                }
            };

            let duration = wire
                .duration_minutes
                .unwrap_or(DEFAULT_ACTIVITY_DURATION_MINUTES)
                .clamp(MIN_ACTIVITY_DURATION_MINUTES, MAX_ACTIVITY_DURATION_MINUTES);

            let location = wire
                .location
                .as_ref()
                .map(|l| ActivityLocation {
                    lat: l.lat,
                    lng: l.lng,
                    address: l.address.clone(),
                })
                .unwrap_or_else(|| ActivityLocation::placeholder(destination));

            let mut activity = Activity::new(
                time,
                wire.name.clone(),
                wire.description.clone(),
                Self::normalize_type(wire.activity_type.as_deref().unwrap_or("")),
                duration,
                wire.cost.unwrap_or(0.0).max(0.0),
                location,
            );
            if let Some(ref id) = wire.id {
                activity.id = id.clone();
            }
            activity.rationale = wire.rationale.clone();
            activity.order_index = activities.len() as u32;
            activities.push(activity);
        }
        activities
    }

    pub(crate) fn to_wire_activity(activity: &Activity) -> WireActivity {
        WireActivity {
            id: Some(activity.id.clone()),
            time: activity.time.format("%H:%M").to_string(),
            name: activity.name.clone(),
            description: activity.description.clone(),
            activity_type: Some(activity.activity_type.as_str().to_string()),
            duration_minutes: Some(activity.duration_minutes),
            cost: Some(activity.cost),
            location: Some(crate::services::generation_client::WireLocation {
                lat: activity.location.lat,
                lng: activity.location.lng,
                address: activity.location.address.clone(),
            }),
            rationale: activity.rationale.clone(),
        }
    }

    /// Deterministic local generator: exactly three well-formed activities
    /// with budget-proportional costs and a single per-day jitter factor.
    /// This is the guarantee that the pipeline produces a non-empty day even
    /// with zero external connectivity.
    pub fn fallback_day(budget: f64, destination: &str, day_number: u32) -> Vec<Activity> {
        let jitter = rand::thread_rng().gen_range(FALLBACK_JITTER_MIN..=FALLBACK_JITTER_MAX);
        let location = ActivityLocation::placeholder(destination);

        let mut activities = vec![
            Activity::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                format!("Explore {}", destination),
                format!("A guided walk through the highlights of {}", destination),
                ActivityType::Attraction,
                180,
                budget * FALLBACK_ATTRACTION_SHARE * jitter,
                location.clone(),
            )
            .with_rationale("A broad first look at the area"),
            Activity::new(
                NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
                "Local lunch".to_string(),
                format!("Lunch at a well-reviewed spot in {}", destination),
                ActivityType::Food,
                90,
                budget * FALLBACK_FOOD_SHARE * jitter,
                location.clone(),
            )
            .with_rationale("Local cuisine close to the morning route"),
            Activity::new(
                NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
                format!("{} heritage visit", destination),
                format!("An afternoon at a historic site in {} (day {})", destination, day_number),
                ActivityType::History,
                120,
                budget * FALLBACK_HISTORY_SHARE * jitter,
                location,
            )
            .with_rationale("Rounds out the day with local history"),
        ];

        for (i, activity) in activities.iter_mut().enumerate() {
            activity.order_index = i as u32;
        }
        activities
    }
}

impl Default for ActivityGenerationService {
    fn default() -> Self {
        Self::new()
    }
}
