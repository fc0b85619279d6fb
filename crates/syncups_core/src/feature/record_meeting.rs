//! Timed meeting runner.
//!
//! # Responsibility
//! - Count elapsed seconds from a one-second tick stream.
//! - Rotate the current speaker at each per-attendee boundary.
//! - Record a meeting (transcript + timestamp) on completion or on
//!   save-and-end, writing it through the live sync-up reference.
//!
//! # Invariants
//! - Speaker slots are `SyncUp::duration_per_attendee_secs()` long, which is
//!   never zero.
//! - `speaker_index` never exceeds the last attendee.
//! - The meeting ends on the first tick where elapsed >= duration.
//! - After a terminal transition (save, discard, completion) the state is
//!   finished and ignores every further action.
//! - Recorded meetings are inserted at index 0 of the sync-up's history.

use super::alert::{AlertAction, AlertState, ButtonRole};
use super::{Effect, Feature};
use crate::deps::Environment;
use crate::model::sync_up::{Meeting, MeetingId, SyncUp};
use crate::shared::SyncUpRef;
use log::{info, warn};
use std::convert::Infallible;
use std::time::Duration;

/// Period of the recorder's tick stream.
pub const RECORD_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAlertAction {
    SaveMeeting,
    DiscardMeeting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordMeetingState {
    pub sync_up: SyncUpRef,
    pub seconds_elapsed: u64,
    pub speaker_index: usize,
    pub transcript: String,
    pub alert: Option<AlertState<RecordAlertAction>>,
    finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordMeetingAction {
    Alert(AlertAction<RecordAlertAction>),
    EndMeetingButtonTapped,
    NextButtonTapped,
    OnAppear,
    TimerTick,
    /// Latest transcription of the meeting so far (replaces the previous one).
    TranscriptChanged(String),
}

/// Confirmation shown when a meeting is ended before its scheduled end.
pub fn end_meeting_alert() -> AlertState<RecordAlertAction> {
    AlertState::new(
        "End meeting?",
        "You are ending the meeting early. What would you like to do?",
    )
    .button(
        "Save and end",
        ButtonRole::Default,
        Some(RecordAlertAction::SaveMeeting),
    )
    .button(
        "Discard",
        ButtonRole::Destructive,
        Some(RecordAlertAction::DiscardMeeting),
    )
    .button("Resume", ButtonRole::Cancel, None)
}

impl RecordMeetingState {
    pub fn new(sync_up: SyncUpRef) -> Self {
        Self {
            sync_up,
            seconds_elapsed: 0,
            speaker_index: 0,
            transcript: String::new(),
            alert: None,
            finished: false,
        }
    }

    /// Whether a terminal transition already ran.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Seconds left in the scheduled meeting, zero once over time.
    pub fn duration_remaining_secs(&self) -> u64 {
        self.sync_up
            .get()
            .map(|sync_up| sync_up.duration_secs.saturating_sub(self.seconds_elapsed))
            .unwrap_or(0)
    }

    fn subject(&mut self) -> Option<SyncUp> {
        let subject = self.sync_up.get();
        if subject.is_none() {
            warn!(
                "event=record_meeting module=record status=aborted reason=sync_up_removed sync_up_id={}",
                self.sync_up.id()
            );
            self.finished = true;
        }
        subject
    }

    fn tick(&mut self, env: &Environment) -> Effect<Infallible> {
        let Some(sync_up) = self.subject() else {
            return Effect::Dismiss;
        };

        self.seconds_elapsed += 1;
        if self.seconds_elapsed >= sync_up.duration_secs {
            return self.save_meeting(env);
        }

        let per_attendee = sync_up.duration_per_attendee_secs();
        if self.seconds_elapsed % per_attendee == 0 {
            let last = sync_up.attendees.len().saturating_sub(1);
            self.speaker_index = (self.speaker_index + 1).min(last);
        }
        Effect::None
    }

    fn next_speaker(&mut self) -> Effect<Infallible> {
        let Some(sync_up) = self.subject() else {
            return Effect::Dismiss;
        };

        if self.speaker_index + 1 >= sync_up.attendees.len() {
            self.alert = Some(end_meeting_alert());
            return Effect::None;
        }
        self.speaker_index += 1;
        self.seconds_elapsed = self.speaker_index as u64 * sync_up.duration_per_attendee_secs();
        Effect::None
    }

    fn save_meeting(&mut self, env: &Environment) -> Effect<Infallible> {
        let meeting = Meeting {
            id: MeetingId(env.ids.new_id()),
            date_epoch_ms: env.clock.now_epoch_ms(),
            transcript: self.transcript.clone(),
        };
        let meeting_id = meeting.id;
        self.finished = true;
        self.alert = None;
        match self.sync_up.update(move |sync_up| sync_up.prepend_meeting(meeting)) {
            Some(()) => info!(
                "event=meeting_saved module=record status=ok sync_up_id={} meeting_id={} elapsed_secs={}",
                self.sync_up.id(),
                meeting_id,
                self.seconds_elapsed
            ),
            None => warn!(
                "event=meeting_saved module=record status=discarded reason=sync_up_removed sync_up_id={}",
                self.sync_up.id()
            ),
        }
        Effect::Dismiss
    }
}

impl Feature for RecordMeetingState {
    type Action = RecordMeetingAction;
    type Delegate = Infallible;

    fn reduce(&mut self, action: RecordMeetingAction, env: &Environment) -> Effect<Infallible> {
        if self.finished {
            return Effect::None;
        }
        match action {
            RecordMeetingAction::OnAppear => Effect::StartTimer(RECORD_TICK_INTERVAL),
            RecordMeetingAction::TimerTick => self.tick(env),
            RecordMeetingAction::NextButtonTapped => self.next_speaker(),
            RecordMeetingAction::EndMeetingButtonTapped => {
                self.alert = Some(end_meeting_alert());
                Effect::None
            }
            RecordMeetingAction::TranscriptChanged(transcript) => {
                self.transcript = transcript;
                Effect::None
            }
            RecordMeetingAction::Alert(AlertAction::Presented(_)) if self.alert.is_none() => {
                Effect::None
            }
            RecordMeetingAction::Alert(AlertAction::Presented(RecordAlertAction::SaveMeeting)) => {
                self.save_meeting(env)
            }
            RecordMeetingAction::Alert(AlertAction::Presented(
                RecordAlertAction::DiscardMeeting,
            )) => {
                self.finished = true;
                self.alert = None;
                info!(
                    "event=meeting_discarded module=record status=ok sync_up_id={} elapsed_secs={}",
                    self.sync_up.id(),
                    self.seconds_elapsed
                );
                Effect::Dismiss
            }
            RecordMeetingAction::Alert(AlertAction::Dismissed) => {
                self.alert = None;
                Effect::None
            }
        }
    }
}
