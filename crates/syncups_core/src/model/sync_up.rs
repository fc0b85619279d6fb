//! Sync-up domain records.
//!
//! # Responsibility
//! - Define `SyncUp`, `Attendee` and `Meeting` plus their typed identities.
//! - Provide derived fields (per-attendee duration) and draft validation.
//!
//! # Invariants
//! - `attendees` is unique by id; insertion order drives speaker rotation.
//! - `meetings` is most-recent-first; new meetings are inserted at index 0.
//! - `duration_secs` must be > 0 and `attendees` non-empty for a draft to be
//!   accepted into the shared collection.

use super::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Default sync-up length for freshly created drafts (three minutes).
pub const DEFAULT_DURATION_SECS: u64 = 3 * 60;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a random v4 identity.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id!(
    /// Stable identity of a sync-up.
    SyncUpId
);
typed_id!(
    /// Stable identity of an attendee within a sync-up.
    AttendeeId
);
typed_id!(
    /// Stable identity of a recorded meeting.
    MeetingId
);

/// A named participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: AttendeeId,
    /// May be empty while a draft is being edited.
    #[serde(default)]
    pub name: String,
}

impl Attendee {
    /// Creates an attendee with an empty name.
    pub fn blank(id: AttendeeId) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }

    pub fn named(id: AttendeeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One completed or early-ended run of a sync-up. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    /// Unix epoch milliseconds at which the meeting was recorded.
    #[serde(rename = "date")]
    pub date_epoch_ms: i64,
    pub transcript: String,
}

/// Recurring meeting template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncUp {
    pub id: SyncUpId,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// Total meeting length in seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    /// Past meetings, most recent first.
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub title: String,
}

/// Reasons a sync-up draft cannot be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncUpValidationError {
    /// `duration_secs` is zero.
    ZeroDuration,
    /// The attendee list is empty.
    NoAttendees,
    /// Two attendees share the same id.
    DuplicateAttendee(AttendeeId),
}

impl Display for SyncUpValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDuration => write!(f, "sync-up duration must be greater than zero"),
            Self::NoAttendees => write!(f, "sync-up must have at least one attendee"),
            Self::DuplicateAttendee(id) => write!(f, "duplicate attendee id: {id}"),
        }
    }
}

impl Error for SyncUpValidationError {}

impl SyncUp {
    /// Creates an empty draft with default duration and theme.
    pub fn new(id: SyncUpId) -> Self {
        Self {
            id,
            attendees: Vec::new(),
            duration_secs: DEFAULT_DURATION_SECS,
            meetings: Vec::new(),
            theme: Theme::default(),
            title: String::new(),
        }
    }

    /// Seconds allotted to each speaker.
    ///
    /// Integer division of the total duration by the attendee count. Both the
    /// divisor and the result are clamped to at least one, so a speaker slot
    /// is never zero seconds long.
    pub fn duration_per_attendee_secs(&self) -> u64 {
        let count = self.attendees.len().max(1) as u64;
        (self.duration_secs / count).max(1)
    }

    /// Position of an attendee in speaking order.
    pub fn attendee_index(&self, id: AttendeeId) -> Option<usize> {
        self.attendees.iter().position(|attendee| attendee.id == id)
    }

    pub fn attendee_mut(&mut self, id: AttendeeId) -> Option<&mut Attendee> {
        self.attendees.iter_mut().find(|attendee| attendee.id == id)
    }

    /// Records a meeting as the most recent one.
    pub fn prepend_meeting(&mut self, meeting: Meeting) {
        self.meetings.insert(0, meeting);
    }

    /// Checks the invariants required before a draft joins the collection.
    pub fn validate(&self) -> Result<(), SyncUpValidationError> {
        if self.duration_secs == 0 {
            return Err(SyncUpValidationError::ZeroDuration);
        }
        if self.attendees.is_empty() {
            return Err(SyncUpValidationError::NoAttendees);
        }
        let mut seen = HashSet::with_capacity(self.attendees.len());
        for attendee in &self.attendees {
            if !seen.insert(attendee.id) {
                return Err(SyncUpValidationError::DuplicateAttendee(attendee.id));
            }
        }
        Ok(())
    }

    /// Sample sync-up used by previews and tests.
    pub fn mock() -> Self {
        let names = ["Blob", "Blob Jr", "Blob Sr", "Blob Esq", "Blob III", "Blob I"];
        Self {
            id: SyncUpId::random(),
            attendees: names
                .iter()
                .map(|name| Attendee::named(AttendeeId::random(), *name))
                .collect(),
            duration_secs: 60,
            meetings: vec![Meeting {
                id: MeetingId::random(),
                date_epoch_ms: 1_715_300_000_000,
                transcript: "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
                    eiusmod tempor incididunt ut labore et dolore magna aliqua."
                    .to_string(),
            }],
            theme: Theme::Orange,
            title: "Design".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Attendee, AttendeeId, Meeting, MeetingId, SyncUp, SyncUpId, SyncUpValidationError,
        DEFAULT_DURATION_SECS,
    };
    use uuid::Uuid;

    fn attendee(n: u128) -> Attendee {
        Attendee::named(AttendeeId(Uuid::from_u128(n)), format!("a{n}"))
    }

    #[test]
    fn new_draft_uses_defaults() {
        let sync_up = SyncUp::new(SyncUpId(Uuid::nil()));
        assert_eq!(sync_up.duration_secs, DEFAULT_DURATION_SECS);
        assert!(sync_up.attendees.is_empty());
        assert!(sync_up.title.is_empty());
    }

    #[test]
    fn per_attendee_duration_divides_and_clamps() {
        let mut sync_up = SyncUp::new(SyncUpId(Uuid::nil()));
        sync_up.duration_secs = 9;
        sync_up.attendees = vec![attendee(1), attendee(2), attendee(3)];
        assert_eq!(sync_up.duration_per_attendee_secs(), 3);

        sync_up.duration_secs = 2;
        assert_eq!(sync_up.duration_per_attendee_secs(), 1);

        sync_up.attendees.clear();
        sync_up.duration_secs = 60;
        assert_eq!(sync_up.duration_per_attendee_secs(), 60);
    }

    #[test]
    fn prepend_meeting_inserts_at_front() {
        let mut sync_up = SyncUp::mock();
        let first_id = sync_up.meetings[0].id;
        sync_up.prepend_meeting(Meeting {
            id: MeetingId(Uuid::from_u128(9)),
            date_epoch_ms: 0,
            transcript: String::new(),
        });
        assert_eq!(sync_up.meetings[0].id, MeetingId(Uuid::from_u128(9)));
        assert_eq!(sync_up.meetings[1].id, first_id);
    }

    #[test]
    fn validate_rejects_degenerate_drafts() {
        let mut sync_up = SyncUp::new(SyncUpId(Uuid::nil()));
        assert_eq!(sync_up.validate(), Err(SyncUpValidationError::NoAttendees));

        sync_up.attendees = vec![attendee(1), attendee(1)];
        assert_eq!(
            sync_up.validate(),
            Err(SyncUpValidationError::DuplicateAttendee(AttendeeId(
                Uuid::from_u128(1)
            )))
        );

        sync_up.attendees = vec![attendee(1)];
        sync_up.duration_secs = 0;
        assert_eq!(sync_up.validate(), Err(SyncUpValidationError::ZeroDuration));

        sync_up.duration_secs = 1;
        assert!(sync_up.validate().is_ok());
    }

    #[test]
    fn serde_uses_document_field_names() {
        let sync_up = SyncUp::mock();
        let value = serde_json::to_value(&sync_up).expect("sync-up should serialize");
        assert_eq!(value["duration"], 60);
        assert_eq!(value["theme"], "orange");
        assert!(value["meetings"][0]["date"].is_i64());
    }
}
