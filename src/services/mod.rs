pub mod activity_generation_service;
pub mod day_allocation_service;
pub mod edit_service;
pub mod generation_client;
pub mod itinerary_assembly_service;
pub mod regeneration_service;
pub mod time_utils;
