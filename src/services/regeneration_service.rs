use log::{info, warn};

use crate::models::activity::Activity;
use crate::models::day::DaySlot;
use crate::models::trip::TripRequest;
use crate::services::activity_generation_service::ActivityGenerationService;
use crate::services::edit_service::{validate_activities, ValidationError};
use crate::services::generation_client::{GenerationClient, RegenerateDayRequest, UserChanges};
use crate::services::time_utils;

/// Travel buffer inserted between consecutive activities when retiming.
const ACTIVITY_BUFFER_MINUTES: i64 = 30;

/// Rebuilds a conflict-free schedule from a user-edited day.
///
/// The deterministic reflow is the designed floor: it produces a
/// conflict-free schedule for any day that fits between the first start
/// time and midnight. The external backend is only an enrichment on top;
/// its result is kept solely when it revalidates clean and preserves the
/// user's activity selection and order.
pub struct RegenerationService {
    client: Option<GenerationClient>,
}

impl RegenerationService {
    pub fn new() -> Self {
        let client = match GenerationClient::new() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Regeneration backend not available: {}. Using local reflow only.", e);
                None
            }
        };
        Self { client }
    }

    pub fn with_client(client: Option<GenerationClient>) -> Self {
        Self { client }
    }

    /// Regenerate one day from the user's working copy.
    ///
    /// Structural violations (missing names, out-of-bounds durations,
    /// negative costs, a day too full to retime before midnight) are
    /// returned to the caller untouched; the optimizer cannot repair those.
    /// Time conflicts are exactly what the reflow removes, so they do not
    /// block regeneration.
    pub async fn regenerate(
        &self,
        request: &TripRequest,
        day: &DaySlot,
        activities: Vec<Activity>,
        instruction: Option<&str>,
    ) -> Result<DaySlot, Vec<ValidationError>> {
        let structural: Vec<ValidationError> = validate_activities(&activities)
            .into_iter()
            .filter(|e| !matches!(e, ValidationError::TimeConflict { .. }))
            .collect();
        if !structural.is_empty() {
            return Err(structural);
        }

        let reflowed = match Self::reflow(activities.clone()) {
            Ok(reflowed) => reflowed,
            Err(overflow) => return Err(vec![overflow]),
        };

        let final_activities = match self.try_backend(request, day, &activities, instruction).await
        {
            Some(candidate) if Self::accepts(&reflowed, &candidate) => {
                info!("Using backend regeneration for day {}", day.day_number);
                candidate
            }
            Some(_) => {
                warn!(
                    "Backend regeneration for day {} dropped or reordered activities; keeping local reflow",
                    day.day_number
                );
                reflowed
            }
            None => reflowed,
        };

        let mut regenerated = day.clone();
        regenerated.set_activities(final_activities);
        Ok(regenerated)
    }

    /// Deterministic single-pass retiming. Activities keep their existing
    /// order (`order_index`, not start time); the first start time is left
    /// untouched and every subsequent activity starts a fixed buffer after
    /// the previous one ends, giving monotonically increasing start times.
    ///
    /// A day whose content plus buffers cannot fit before midnight is
    /// rejected with `ValidationError::DayOverflow`; wrapping would reorder
    /// the timeline and reintroduce conflicts.
    pub fn reflow(mut activities: Vec<Activity>) -> Result<Vec<Activity>, ValidationError> {
        activities.sort_by_key(|a| a.order_index);

        if !activities.is_empty() {
            let mut cursor = time_utils::minute_of_day(activities[0].time);
            for i in 1..activities.len() {
                cursor += activities[i - 1].duration_minutes as i64 + ACTIVITY_BUFFER_MINUTES;
                if cursor > 23 * 60 + 59 {
                    return Err(ValidationError::DayOverflow {
                        activity: activities[i].name.clone(),
                    });
                }
                activities[i].time = time_utils::add_minutes(
                    activities[i - 1].time,
                    activities[i - 1].duration_minutes as i64 + ACTIVITY_BUFFER_MINUTES,
                );
            }
        }

        for (i, activity) in activities.iter_mut().enumerate() {
            activity.order_index = i as u32;
        }
        Ok(activities)
    }

    async fn try_backend(
        &self,
        request: &TripRequest,
        day: &DaySlot,
        activities: &[Activity],
        instruction: Option<&str>,
    ) -> Option<Vec<Activity>> {
        let client = self.client.as_ref()?;

        let destination = day
            .destination
            .clone()
            .unwrap_or_else(|| request.destination_summary.clone());
        let backend_request = RegenerateDayRequest {
            destination: destination.clone(),
            date: day.date.format("%Y-%m-%d").to_string(),
            day_number: day.day_number,
            current_activities: activities
                .iter()
                .map(ActivityGenerationService::to_wire_activity)
                .collect(),
            budget: request.budget,
            pace: format!("{:?}", request.pace).to_lowercase(),
            interests: request.interests.clone(),
            user_changes: UserChanges {
                modified: true,
                instruction: instruction
                    .unwrap_or("Re-time the day so nothing overlaps; keep my activities and order")
                    .to_string(),
            },
        };

        match client.regenerate_day(&backend_request).await {
            Ok(response) => Some(ActivityGenerationService::convert_wire_day(
                &response.day_plan,
                &destination,
            )),
            Err(e) => {
                warn!("Backend regeneration failed: {}. Using local reflow.", e);
                None
            }
        }
    }

    /// A backend result is only accepted when it is conflict-free and keeps
    /// the same activities in the same relative order as the local reflow.
    fn accepts(reflowed: &[Activity], candidate: &[Activity]) -> bool {
        if candidate.len() != reflowed.len() {
            return false;
        }
        if !validate_activities(candidate).is_empty() {
            return false;
        }
        reflowed
            .iter()
            .zip(candidate.iter())
            .all(|(ours, theirs)| ours.name == theirs.name)
    }
}

impl Default for RegenerationService {
    fn default() -> Self {
        Self::with_client(None)
    }
}
