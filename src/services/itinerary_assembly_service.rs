use log::warn;
use uuid::Uuid;

use crate::models::activity::Activity;
use crate::models::trip::{Trip, TripRequest};
use crate::services::activity_generation_service::ActivityGenerationService;
use crate::services::day_allocation_service::{AllocationError, DayAllocationService};

/// Merges the day-slot skeleton with generated activities into the canonical
/// trip aggregate. Whatever the generation stage returns, the assembled trip
/// always has exactly `total_days` days, each with at least one activity.
pub struct ItineraryAssembler {
    generator: ActivityGenerationService,
}

impl ItineraryAssembler {
    pub fn new() -> Self {
        Self {
            generator: ActivityGenerationService::new(),
        }
    }

    pub fn with_generator(generator: ActivityGenerationService) -> Self {
        Self { generator }
    }

    pub async fn assemble(&self, request: &TripRequest) -> Result<Trip, AllocationError> {
        let mut slots = DayAllocationService::allocate(request)?;
        let generated = self.generator.generate_trip_activities(request).await;

        // Travel and extended-stay slots already carry their synthetic
        // activity; every other slot is filled from the generated day with
        // the same index. Missing or empty generated days are padded from
        // the last usable one, extras are ignored.
        let mut last_usable: Option<Vec<Activity>> = None;
        for (i, slot) in slots.iter_mut().enumerate() {
            if !slot.activities.is_empty() {
                continue;
            }

            let candidate = generated.get(i).filter(|day| !day.is_empty()).cloned();
            let activities = match candidate {
                Some(day) => {
                    last_usable = Some(day.clone());
                    day
                }
                None => match last_usable.clone() {
                    Some(previous) => {
                        warn!(
                            "Generation returned no usable day {}; padding from the previous day",
                            slot.day_number
                        );
                        Self::relabel(previous)
                    }
                    None => {
                        let destination = slot
                            .destination
                            .clone()
                            .unwrap_or_else(|| request.destination_summary.clone());
                        let day = ActivityGenerationService::fallback_day(
                            request.budget,
                            &destination,
                            slot.day_number,
                        );
                        last_usable = Some(day.clone());
                        day
                    }
                },
            };

            slot.set_activities(activities);
        }

        if generated.len() > slots.len() {
            warn!(
                "Generation returned {} day(s) for a {}-day trip; extras dropped",
                generated.len(),
                slots.len()
            );
        }

        Ok(Trip {
            destination_summary: request.destination_summary.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            budget: request.budget,
            pace: request.pace,
            interests: request.interests.clone(),
            trip_type: request.trip_type,
            destinations: request.destinations.clone(),
            days: slots,
        })
    }

    /// Fresh ids for activities copied into a padded day, so two days never
    /// share an activity identity.
    fn relabel(activities: Vec<Activity>) -> Vec<Activity> {
        activities
            .into_iter()
            .map(|mut activity| {
                activity.id = Uuid::new_v4().to_string();
                activity
            })
            .collect()
    }
}

impl Default for ItineraryAssembler {
    fn default() -> Self {
        Self::new()
    }
}
