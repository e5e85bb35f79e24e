use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;

use crate::models::trip::Trip;

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "no trip with id '{}'", id),
            StoreError::Backend(msg) => write!(f, "storage backend error: {}", msg),
        }
    }
}

impl Error for StoreError {}

/// Storage port for trip aggregates, consumed by callers of the engine.
///
/// The engine itself holds no storage handle and no global state: it takes a
/// trip aggregate in and hands a new one back. Persistence is best-effort
/// CRUD keyed by an opaque id, with no cross-day transactional guarantees.
pub trait TripStore {
    fn load_trip(&self, id: &str) -> Result<Trip, StoreError>;
    fn save_trip(&self, id: &str, trip: &Trip) -> Result<(), StoreError>;
}

/// In-memory store for tests and offline use.
#[derive(Default)]
pub struct InMemoryTripStore {
    trips: Mutex<HashMap<String, Trip>>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TripStore for InMemoryTripStore {
    fn load_trip(&self, id: &str) -> Result<Trip, StoreError> {
        let trips = self
            .trips
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        trips
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save_trip(&self, id: &str, trip: &Trip) -> Result<(), StoreError> {
        let mut trips = self
            .trips
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        trips.insert(id.to_string(), trip.clone());
        Ok(())
    }
}
