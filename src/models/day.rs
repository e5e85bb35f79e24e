use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::activity::Activity;

/// One calendar day of a trip. Owns its activities exclusively; no activity
/// is shared across days.
///
/// `total_cost` and `total_duration_minutes` are derived values. They are
/// carried on the struct for serialization but are never authoritative:
/// every mutation path calls `recompute_totals` before the slot is handed
/// back to a caller.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    pub day_number: u32,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination: Option<String>,
    pub is_travel_day: bool,
    pub activities: Vec<Activity>,
    pub total_cost: f64,
    pub total_duration_minutes: u32,
}

impl DaySlot {
    pub fn new(day_number: u32, date: NaiveDate, destination: Option<String>) -> Self {
        Self {
            day_number,
            date,
            destination,
            is_travel_day: false,
            activities: Vec::new(),
            total_cost: 0.0,
            total_duration_minutes: 0,
        }
    }

    /// Re-derive the per-day totals from the owned activities.
    pub fn recompute_totals(&mut self) {
        self.total_cost = self.activities.iter().map(|a| a.cost).sum();
        self.total_duration_minutes = self.activities.iter().map(|a| a.duration_minutes).sum();
    }

    /// Replace the activity list, renumbering `order_index` sequentially and
    /// recomputing totals.
    pub fn set_activities(&mut self, mut activities: Vec<Activity>) {
        for (i, activity) in activities.iter_mut().enumerate() {
            activity.order_index = i as u32;
        }
        self.activities = activities;
        self.recompute_totals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{ActivityLocation, ActivityType};
    use chrono::NaiveTime;

    fn activity(cost: f64, duration: u32) -> Activity {
        Activity::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            "Test",
            "Test activity",
            ActivityType::Attraction,
            duration,
            cost,
            ActivityLocation::placeholder("Test City"),
        )
    }

    #[test]
    fn totals_track_activity_list() {
        let mut day = DaySlot::new(1, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), None);
        day.set_activities(vec![activity(100.0, 60), activity(50.0, 90)]);
        assert_eq!(day.total_cost, 150.0);
        assert_eq!(day.total_duration_minutes, 150);

        day.activities.pop();
        day.recompute_totals();
        assert_eq!(day.total_cost, 100.0);
        assert_eq!(day.total_duration_minutes, 60);
    }

    #[test]
    fn set_activities_renumbers_order() {
        let mut day = DaySlot::new(1, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), None);
        day.set_activities(vec![activity(1.0, 30), activity(2.0, 30), activity(3.0, 30)]);
        let order: Vec<u32> = day.activities.iter().map(|a| a.order_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }
}
