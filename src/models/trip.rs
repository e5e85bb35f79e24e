use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::day::DaySlot;

/// Coarse knob controlling how many activities are requested per day.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    Balanced,
    Fast,
}

impl Pace {
    /// Inclusive bounds on the per-day activity count requested from the
    /// generation backend. A request parameter, not enforced on results.
    pub fn activity_count_range(&self) -> (u8, u8) {
        match self {
            Pace::Relaxed => (1, 2),
            Pace::Balanced => (3, 4),
            Pace::Fast => (5, 6),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    Single,
    MultiFixed,
    MultiFlexible,
}

/// A named stop on a multi-destination trip. `planned_days` is set in fixed
/// mode and absent in flexible mode, where the allocator decides.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub name: String,
    pub order_index: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub planned_days: Option<u32>,
}

impl Destination {
    pub fn fixed(name: impl Into<String>, order_index: u32, planned_days: u32) -> Self {
        Self {
            name: name.into(),
            order_index,
            planned_days: Some(planned_days),
        }
    }

    pub fn flexible(name: impl Into<String>, order_index: u32) -> Self {
        Self {
            name: name.into(),
            order_index,
            planned_days: None,
        }
    }
}

/// Planner input: everything the engine needs to build a trip. Day slots and
/// activities are produced by the allocation/generation pipeline, never
/// supplied here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination_summary: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub pace: Pace,
    pub interests: Vec<String>,
    pub trip_type: TripType,
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

impl TripRequest {
    /// Inclusive day count between start and end date. Derived, never stored.
    pub fn total_days(&self) -> u32 {
        let span = self.end_date.signed_duration_since(self.start_date).num_days();
        (span.max(0) as u32) + 1
    }
}

/// The aggregate root: an assembled itinerary. Owns an ordered sequence of
/// day slots whose `day_number` values form `1..=total_days` with no gaps.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub destination_summary: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub pace: Pace,
    pub interests: Vec<String>,
    pub trip_type: TripType,
    #[serde(default)]
    pub destinations: Vec<Destination>,
    pub days: Vec<DaySlot>,
}

impl Trip {
    pub fn total_days(&self) -> u32 {
        let span = self.end_date.signed_duration_since(self.start_date).num_days();
        (span.max(0) as u32) + 1
    }

    pub fn total_cost(&self) -> f64 {
        self.days.iter().map(|d| d.total_cost).sum()
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.days.iter().map(|d| d.total_duration_minutes).sum()
    }

    pub fn day(&self, day_number: u32) -> Option<&DaySlot> {
        self.days.iter().find(|d| d.day_number == day_number)
    }

    pub fn day_mut(&mut self, day_number: u32) -> Option<&mut DaySlot> {
        self.days.iter_mut().find(|d| d.day_number == day_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_days_is_inclusive() {
        let request = TripRequest {
            destination_summary: "Kyoto".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            budget: 1000.0,
            pace: Pace::Balanced,
            interests: vec![],
            trip_type: TripType::Single,
            destinations: vec![],
        };
        assert_eq!(request.total_days(), 3);
    }

    #[test]
    fn pace_ranges() {
        assert_eq!(Pace::Relaxed.activity_count_range(), (1, 2));
        assert_eq!(Pace::Balanced.activity_count_range(), (3, 4));
        assert_eq!(Pace::Fast.activity_count_range(), (5, 6));
    }
}
