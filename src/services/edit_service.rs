use std::error::Error;
use std::fmt;

use chrono::NaiveTime;
use uuid::Uuid;

use crate::models::activity::Activity;
use crate::models::day::DaySlot;
use crate::services::time_utils;

pub const MIN_ACTIVITY_DURATION_MINUTES: u32 = 15;
pub const MAX_ACTIVITY_DURATION_MINUTES: u32 = 480;

/// A single rule violation, keyed to the offending activity name(s).
///
/// `time` presence is not checked here: the typed model makes a missing
/// start time unrepresentable, so that rule holds structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TimeConflict { first: String, second: String },
    MissingName { activity: String },
    DurationOutOfBounds { activity: String, minutes: u32 },
    NegativeCost { activity: String },
    /// The day's content plus travel buffers cannot be retimed before
    /// midnight. Produced by the regeneration optimizer, not by `validate_activities`.
    DayOverflow { activity: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TimeConflict { first, second } => {
                write!(f, "'{}' is still running when '{}' starts", first, second)
            }
            ValidationError::MissingName { activity } => {
                write!(f, "{} has no name", activity)
            }
            ValidationError::DurationOutOfBounds { activity, minutes } => write!(
                f,
                "'{}' lasts {} minutes; allowed range is {} to {} minutes",
                activity, minutes, MIN_ACTIVITY_DURATION_MINUTES, MAX_ACTIVITY_DURATION_MINUTES
            ),
            ValidationError::NegativeCost { activity } => {
                write!(f, "'{}' has a negative cost", activity)
            }
            ValidationError::DayOverflow { activity } => {
                write!(f, "'{}' cannot be scheduled before midnight", activity)
            }
        }
    }
}

impl Error for ValidationError {}

/// Run every validation rule over the list and return the complete set of
/// violations. Never short-circuits; an empty result means the list is
/// saveable.
pub fn validate_activities(activities: &[Activity]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Rule 1: time conflicts over the time-sorted view. Ties keep the
    // user's ordering via order_index.
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by_key(|a| (time_utils::minute_of_day(a.time), a.order_index));
    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if time_utils::overlaps(prev.time, prev.duration_minutes, next.time) {
            errors.push(ValidationError::TimeConflict {
                first: display_name(prev, activities),
                second: display_name(next, activities),
            });
        }
    }

    for activity in activities {
        // Rule 2: required fields.
        if activity.name.trim().is_empty() {
            errors.push(ValidationError::MissingName {
                activity: display_name(activity, activities),
            });
        }
        // Rule 3: duration bounds.
        if activity.duration_minutes < MIN_ACTIVITY_DURATION_MINUTES
            || activity.duration_minutes > MAX_ACTIVITY_DURATION_MINUTES
        {
            errors.push(ValidationError::DurationOutOfBounds {
                activity: display_name(activity, activities),
                minutes: activity.duration_minutes,
            });
        }
        // Rule 4: costs are in a base currency unit and never negative.
        if activity.cost < 0.0 {
            errors.push(ValidationError::NegativeCost {
                activity: display_name(activity, activities),
            });
        }
    }

    errors
}

fn display_name(activity: &Activity, all: &[Activity]) -> String {
    if activity.name.trim().is_empty() {
        let position = all
            .iter()
            .position(|a| a.id == activity.id)
            .map(|i| i + 1)
            .unwrap_or(0);
        format!("activity {}", position)
    } else {
        activity.name.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    View,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A mutation or save was attempted outside an edit session.
    NotEditing,
    /// `begin_edit` while a session is already open.
    AlreadyEditing,
    UnknownActivity(String),
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NotEditing => write!(f, "no edit session is open for this day"),
            EditError::AlreadyEditing => write!(f, "an edit session is already open for this day"),
            EditError::UnknownActivity(id) => write!(f, "no activity with id '{}'", id),
            EditError::IndexOutOfRange { index, len } => {
                write!(f, "position {} is out of range for {} activities", index, len)
            }
        }
    }
}

impl Error for EditError {}

#[derive(Debug)]
pub enum SaveError {
    NotEditing,
    Invalid(Vec<ValidationError>),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::NotEditing => write!(f, "no edit session is open for this day"),
            SaveError::Invalid(errors) => {
                write!(f, "{} validation error(s) block saving", errors.len())
            }
        }
    }
}

impl Error for SaveError {}

/// Field-level patch for an in-place activity edit. Unset fields keep their
/// current value.
#[derive(Debug, Default, Clone)]
pub struct ActivityPatch {
    pub time: Option<NaiveTime>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<u32>,
    pub cost: Option<f64>,
    pub rationale: Option<String>,
}

/// Per-day edit session: a two-state machine over a working copy.
///
/// `begin_edit` snapshots the saved activities; mutations apply to the
/// snapshot only. `save` either commits a fully valid working copy
/// (recomputing totals) or returns every violation and leaves the session
/// open. `cancel` discards the snapshot atomically; callers are expected to
/// confirm with the user first when `has_unsaved_changes()`.
#[derive(Debug)]
pub struct DayEditSession {
    saved: DaySlot,
    working: Option<Vec<Activity>>,
}

impl DayEditSession {
    pub fn new(day: DaySlot) -> Self {
        Self {
            saved: day,
            working: None,
        }
    }

    pub fn state(&self) -> EditState {
        if self.working.is_some() {
            EditState::Edit
        } else {
            EditState::View
        }
    }

    /// The last saved state of the day.
    pub fn day(&self) -> &DaySlot {
        &self.saved
    }

    /// Consume the session, returning the last saved state.
    pub fn into_day(self) -> DaySlot {
        self.saved
    }

    pub fn begin_edit(&mut self) -> Result<(), EditError> {
        if self.working.is_some() {
            return Err(EditError::AlreadyEditing);
        }
        self.working = Some(self.saved.activities.clone());
        Ok(())
    }

    pub fn working_activities(&self) -> Result<&[Activity], EditError> {
        self.working.as_deref().ok_or(EditError::NotEditing)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        match self.working {
            Some(ref working) => *working != self.saved.activities,
            None => false,
        }
    }

    pub fn update_activity(&mut self, id: &str, patch: ActivityPatch) -> Result<(), EditError> {
        let working = self.working.as_mut().ok_or(EditError::NotEditing)?;
        let activity = working
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| EditError::UnknownActivity(id.to_string()))?;

        if let Some(time) = patch.time {
            activity.time = time;
        }
        if let Some(name) = patch.name {
            activity.name = name;
        }
        if let Some(description) = patch.description {
            activity.description = description;
        }
        if let Some(duration) = patch.duration_minutes {
            activity.duration_minutes = duration;
        }
        if let Some(cost) = patch.cost {
            activity.cost = cost;
        }
        if let Some(rationale) = patch.rationale {
            activity.rationale = Some(rationale);
        }
        Ok(())
    }

    /// Append a user-supplied activity, assigning it a fresh id and the next
    /// order index. Returns the new id.
    pub fn add_activity(&mut self, mut activity: Activity) -> Result<String, EditError> {
        let working = self.working.as_mut().ok_or(EditError::NotEditing)?;
        activity.id = Uuid::new_v4().to_string();
        activity.order_index = working.len() as u32;
        let id = activity.id.clone();
        working.push(activity);
        Ok(id)
    }

    /// Remove an activity. Deletion confirmation is the caller's concern;
    /// removal here is immediate and not reversible within the session.
    pub fn remove_activity(&mut self, id: &str) -> Result<Activity, EditError> {
        let working = self.working.as_mut().ok_or(EditError::NotEditing)?;
        let position = working
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| EditError::UnknownActivity(id.to_string()))?;
        let removed = working.remove(position);
        for (i, activity) in working.iter_mut().enumerate() {
            activity.order_index = i as u32;
        }
        Ok(removed)
    }

    /// Drag-and-drop reorder: splices the list and rewrites `order_index`
    /// only. Start times are deliberately left untouched, so the visual
    /// order can drift from the timeline; the regeneration optimizer is the
    /// guaranteed clean-up path.
    pub fn reorder_activity(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        let working = self.working.as_mut().ok_or(EditError::NotEditing)?;
        let len = working.len();
        if from >= len {
            return Err(EditError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(EditError::IndexOutOfRange { index: to, len });
        }

        let activity = working.remove(from);
        working.insert(to, activity);
        for (i, activity) in working.iter_mut().enumerate() {
            activity.order_index = i as u32;
        }
        Ok(())
    }

    /// Validate the working copy and commit it. On violations the session
    /// stays open and nothing is saved.
    pub fn save(&mut self) -> Result<&DaySlot, SaveError> {
        let working = self.working.as_ref().ok_or(SaveError::NotEditing)?;
        let errors = validate_activities(working);
        if !errors.is_empty() {
            return Err(SaveError::Invalid(errors));
        }

        let committed = self.working.take().unwrap_or_default();
        self.saved.set_activities(committed);
        Ok(&self.saved)
    }

    /// Discard the working copy and revert to the last saved state.
    pub fn cancel(&mut self) {
        self.working = None;
    }

    /// Replace the saved day wholesale (used after regeneration). Closes any
    /// open edit session.
    pub fn replace_day(&mut self, day: DaySlot) {
        self.saved = day;
        self.working = None;
    }
}
