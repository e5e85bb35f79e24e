//! Itinerary scheduling and optimization engine.
//!
//! A library core for trip planning: allocates calendar days across one or
//! more destinations, orchestrates per-day activity generation (external
//! backend with a deterministic local fallback), assembles the trip
//! aggregate, validates user edits, and regenerates conflict-free schedules.
//! Consumed by a UI layer; owns no wire protocol and no storage.

pub mod db;
pub mod models;
pub mod services;

pub use db::{InMemoryTripStore, StoreError, TripStore};
pub use models::{
    Activity, ActivityLocation, ActivityType, DaySlot, Destination, Pace, Trip, TripRequest,
    TripType,
};
pub use services::activity_generation_service::ActivityGenerationService;
pub use services::day_allocation_service::{AllocationError, DayAllocationService};
pub use services::edit_service::{
    validate_activities, ActivityPatch, DayEditSession, EditError, EditState, SaveError,
    ValidationError,
};
pub use services::generation_client::{GenerationClient, GenerationError};
pub use services::itinerary_assembly_service::ItineraryAssembler;
pub use services::regeneration_service::RegenerationService;
