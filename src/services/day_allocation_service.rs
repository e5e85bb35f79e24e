use std::error::Error;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::models::activity::{Activity, ActivityLocation, ActivityType};
use crate::models::day::DaySlot;
use crate::models::trip::{TripRequest, TripType};

/// Minimum stay per destination in flexible mode. When the floor conflicts
/// with the requested total, the floor wins and the slot list is truncated
/// back to the trip length afterwards.
const MIN_DAYS_PER_DESTINATION: u32 = 2;

const TRAVEL_START: (u32, u32) = (9, 0);
const TRAVEL_DURATION_MINUTES: u32 = 180;
const EXTENDED_STAY_START: (u32, u32) = (10, 0);
const EXTENDED_STAY_DURATION_MINUTES: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Fixed-mode planned days do not sum to the trip length. Carries the
    /// per-destination breakdown so the caller can point at the bad input.
    FixedDayCountMismatch {
        expected: u32,
        planned_total: u32,
        breakdown: String,
    },
    /// A fixed-mode destination arrived without a planned day count.
    MissingPlannedDays(String),
    /// A multi-destination trip type with an empty destination list.
    NoDestinations,
    /// End date earlier than start date.
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::FixedDayCountMismatch {
                expected,
                planned_total,
                breakdown,
            } => write!(
                f,
                "planned destination days ({}) sum to {} but the trip spans {} days",
                breakdown, planned_total, expected
            ),
            AllocationError::MissingPlannedDays(name) => {
                write!(f, "destination '{}' has no planned day count in fixed mode", name)
            }
            AllocationError::NoDestinations => {
                write!(f, "multi-destination trip requires at least one destination")
            }
            AllocationError::InvalidDateRange { start, end } => {
                write!(f, "end date {} is before start date {}", end, start)
            }
        }
    }
}

impl Error for AllocationError {}

/// Allocates the trip's calendar days across destinations, producing the
/// ordered day-slot skeleton that later stages attach activities to. Travel
/// and extended-stay days come out of here already carrying their single
/// synthetic activity; every other slot is empty.
pub struct DayAllocationService;

impl DayAllocationService {
    pub fn allocate(request: &TripRequest) -> Result<Vec<DaySlot>, AllocationError> {
        if request.end_date < request.start_date {
            return Err(AllocationError::InvalidDateRange {
                start: request.start_date,
                end: request.end_date,
            });
        }
        let total_days = request.total_days();

        let mut slots = match request.trip_type {
            TripType::Single => Self::allocate_single(total_days),
            TripType::MultiFixed => Self::allocate_fixed(request, total_days)?,
            TripType::MultiFlexible => Self::allocate_flexible(request, total_days)?,
        };

        // Day numbers and dates are assigned last so extension/truncation
        // above cannot break the 1..=total_days invariant.
        for (i, slot) in slots.iter_mut().enumerate() {
            slot.day_number = i as u32 + 1;
            slot.date = request.start_date + Duration::days(i as i64);
        }

        Ok(slots)
    }

    fn allocate_single(total_days: u32) -> Vec<DaySlot> {
        (0..total_days)
            .map(|_| DaySlot::new(0, chrono::NaiveDate::MIN, None))
            .collect()
    }

    fn allocate_fixed(
        request: &TripRequest,
        total_days: u32,
    ) -> Result<Vec<DaySlot>, AllocationError> {
        if request.destinations.is_empty() {
            return Err(AllocationError::NoDestinations);
        }

        let mut planned_total = 0u32;
        let mut breakdown = Vec::new();
        for destination in &request.destinations {
            let days = destination
                .planned_days
                .ok_or_else(|| AllocationError::MissingPlannedDays(destination.name.clone()))?;
            planned_total += days;
            breakdown.push(format!("{}: {}", destination.name, days));
        }

        // Fixed mode treats the supplied totals as already inclusive of
        // everything, so no travel days are inserted and the sum must match
        // the trip length exactly.
        if planned_total != total_days {
            return Err(AllocationError::FixedDayCountMismatch {
                expected: total_days,
                planned_total,
                breakdown: breakdown.join(", "),
            });
        }

        let mut slots = Vec::with_capacity(total_days as usize);
        for destination in &request.destinations {
            for _ in 0..destination.planned_days.unwrap_or(0) {
                slots.push(DaySlot::new(
                    0,
                    chrono::NaiveDate::MIN,
                    Some(destination.name.clone()),
                ));
            }
        }
        Ok(slots)
    }

    fn allocate_flexible(
        request: &TripRequest,
        total_days: u32,
    ) -> Result<Vec<DaySlot>, AllocationError> {
        let destinations = &request.destinations;
        if destinations.is_empty() {
            return Err(AllocationError::NoDestinations);
        }

        let count = destinations.len() as u32;
        let travel_days = count.saturating_sub(1);
        // The minimum-stay floor takes priority over exact total matching;
        // the trailing extend/truncate step reconciles the difference.
        let available_days = total_days
            .saturating_sub(travel_days)
            .max(count * MIN_DAYS_PER_DESTINATION);

        let base = available_days / count;
        let extra = available_days % count;

        let mut slots: Vec<DaySlot> = Vec::new();
        for (i, destination) in destinations.iter().enumerate() {
            let stay = base + if (i as u32) < extra { 1 } else { 0 };
            for _ in 0..stay {
                slots.push(DaySlot::new(
                    0,
                    chrono::NaiveDate::MIN,
                    Some(destination.name.clone()),
                ));
            }
            if let Some(next) = destinations.get(i + 1) {
                slots.push(Self::travel_day(&destination.name, &next.name));
            }
        }

        // Reconcile with the requested trip length.
        let last_name = destinations[destinations.len() - 1].name.clone();
        while (slots.len() as u32) < total_days {
            slots.push(Self::extended_stay_day(&last_name));
        }
        slots.truncate(total_days as usize);

        Ok(slots)
    }

    fn travel_day(from: &str, to: &str) -> DaySlot {
        let time = NaiveTime::from_hms_opt(TRAVEL_START.0, TRAVEL_START.1, 0).unwrap();
        let transit = Activity::new(
            time,
            format!("Travel to {}", to),
            format!("Travel from {} to {}", from, to),
            ActivityType::Transport,
            TRAVEL_DURATION_MINUTES,
            0.0,
            ActivityLocation::placeholder(to),
        );

        let mut slot = DaySlot::new(0, chrono::NaiveDate::MIN, Some(to.to_string()));
        slot.is_travel_day = true;
        slot.set_activities(vec![transit]);
        slot
    }

    fn extended_stay_day(destination: &str) -> DaySlot {
        let time =
            NaiveTime::from_hms_opt(EXTENDED_STAY_START.0, EXTENDED_STAY_START.1, 0).unwrap();
        let leisure = Activity::new(
            time,
            format!("Extended stay in {}", destination),
            format!("A free day to explore {} at your own pace", destination),
            ActivityType::Attraction,
            EXTENDED_STAY_DURATION_MINUTES,
            0.0,
            ActivityLocation::placeholder(destination),
        );

        let mut slot = DaySlot::new(0, chrono::NaiveDate::MIN, Some(destination.to_string()));
        slot.set_activities(vec![leisure]);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::{Destination, Pace};
    use chrono::NaiveDate;

    fn request(trip_type: TripType, days: u32, destinations: Vec<Destination>) -> TripRequest {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        TripRequest {
            destination_summary: "test".to_string(),
            start_date: start,
            end_date: start + Duration::days(days as i64 - 1),
            budget: 1000.0,
            pace: Pace::Balanced,
            interests: vec![],
            trip_type,
            destinations,
        }
    }

    #[test]
    fn single_trip_emits_plain_days() {
        let slots = DayAllocationService::allocate(&request(TripType::Single, 5, vec![])).unwrap();
        assert_eq!(slots.len(), 5);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.day_number, i as u32 + 1);
            assert!(slot.destination.is_none());
            assert!(!slot.is_travel_day);
            assert!(slot.activities.is_empty());
        }
    }

    #[test]
    fn dates_increase_with_day_number() {
        let slots = DayAllocationService::allocate(&request(TripType::Single, 4, vec![])).unwrap();
        for pair in slots.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        assert_eq!(slots[0].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(slots[3].date, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
    }

    #[test]
    fn reversed_date_range_is_rejected() {
        let mut reversed = request(TripType::Single, 1, vec![]);
        reversed.start_date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        reversed.end_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let err = DayAllocationService::allocate(&reversed).unwrap_err();
        assert_eq!(
            err,
            AllocationError::InvalidDateRange {
                start: reversed.start_date,
                end: reversed.end_date,
            }
        );
    }

    #[test]
    fn fixed_mode_matches_planned_days() {
        let slots = DayAllocationService::allocate(&request(
            TripType::MultiFixed,
            10,
            vec![Destination::fixed("A", 0, 4), Destination::fixed("B", 1, 6)],
        ))
        .unwrap();

        assert_eq!(slots.len(), 10);
        assert!(slots.iter().all(|s| !s.is_travel_day));
        assert!(slots[..4].iter().all(|s| s.destination.as_deref() == Some("A")));
        assert!(slots[4..].iter().all(|s| s.destination.as_deref() == Some("B")));
    }

    #[test]
    fn fixed_mode_rejects_mismatched_totals() {
        let err = DayAllocationService::allocate(&request(
            TripType::MultiFixed,
            10,
            vec![Destination::fixed("A", 0, 4), Destination::fixed("B", 1, 5)],
        ))
        .unwrap_err();

        match err {
            AllocationError::FixedDayCountMismatch {
                expected,
                planned_total,
                ref breakdown,
            } => {
                assert_eq!(expected, 10);
                assert_eq!(planned_total, 9);
                assert!(breakdown.contains("A: 4"));
                assert!(breakdown.contains("B: 5"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn flexible_mode_inserts_travel_days_and_balances() {
        let slots = DayAllocationService::allocate(&request(
            TripType::MultiFlexible,
            10,
            vec![
                Destination::flexible("A", 0),
                Destination::flexible("B", 1),
                Destination::flexible("C", 2),
            ],
        ))
        .unwrap();

        assert_eq!(slots.len(), 10);
        assert_eq!(slots.iter().filter(|s| s.is_travel_day).count(), 2);

        let mut stay_counts = std::collections::HashMap::new();
        for slot in slots.iter().filter(|s| !s.is_travel_day) {
            *stay_counts
                .entry(slot.destination.clone().unwrap())
                .or_insert(0u32) += 1;
        }
        let counts: Vec<u32> = stay_counts.values().copied().collect();
        assert!(counts.iter().all(|&c| c >= MIN_DAYS_PER_DESTINATION));
        assert!(counts.iter().max().unwrap() - counts.iter().min().unwrap() <= 1);
    }

    #[test]
    fn travel_day_names_both_endpoints() {
        let slots = DayAllocationService::allocate(&request(
            TripType::MultiFlexible,
            7,
            vec![Destination::flexible("Lisbon", 0), Destination::flexible("Porto", 1)],
        ))
        .unwrap();

        let travel = slots.iter().find(|s| s.is_travel_day).unwrap();
        assert_eq!(travel.activities.len(), 1);
        let transit = &travel.activities[0];
        assert_eq!(transit.activity_type, ActivityType::Transport);
        assert!(transit.description.contains("Lisbon"));
        assert!(transit.description.contains("Porto"));
    }

    #[test]
    fn flexible_mode_tail_belongs_to_last_destination() {
        let slots = DayAllocationService::allocate(&request(
            TripType::MultiFlexible,
            12,
            vec![Destination::flexible("A", 0), Destination::flexible("B", 1)],
        ))
        .unwrap();
        assert_eq!(slots.len(), 12);
        assert_eq!(slots.last().unwrap().destination.as_deref(), Some("B"));
        assert!(!slots.last().unwrap().is_travel_day);
    }

    #[test]
    fn flexible_minimum_stay_floor_wins_over_short_trips() {
        // 3 destinations in 4 days cannot honor both the floor and the
        // total; the floor applies first and truncation restores the length.
        let slots = DayAllocationService::allocate(&request(
            TripType::MultiFlexible,
            4,
            vec![
                Destination::flexible("A", 0),
                Destination::flexible("B", 1),
                Destination::flexible("C", 2),
            ],
        ))
        .unwrap();
        assert_eq!(slots.len(), 4);
        let numbers: Vec<u32> = slots.iter().map(|s| s.day_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }
}
