pub mod activity;
pub mod day;
pub mod trip;

pub use activity::{Activity, ActivityLocation, ActivityType};
pub use day::DaySlot;
pub use trip::{Destination, Pace, Trip, TripRequest, TripType};
