use chrono::{Duration, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::catalog::{Service, SERVICES, TIME_SLOTS};
use super::{BookingDraft, GuestEmailSet, Message, Step};

/// Everything the booking script reads and writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wizard {
    pub step: Step,
    pub draft: BookingDraft,
    pub visitor_name: Option<String>,
    /// Highlighted slot on the time picker, not yet confirmed.
    pub selected_time: Option<String>,
    pub selected_services: Vec<String>,
    pub guests: GuestEmailSet,
    /// Navbar state; survives a booking reset.
    pub minimized: bool,
}

impl Wizard {
    /// Clears the booking and returns to `idle`.
    pub fn reset(&mut self) {
        *self = Self {
            minimized: self.minimized,
            ..Self::default()
        };
    }
}

/// One visitor's widget.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    pub wizard: Wizard,
    pub messages: Vec<Message>,
    pub last_activity: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl Session {
    pub fn new(user_id: String, ttl_minutes: i64) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            user_id,
            wizard: Wizard::default(),
            messages: Vec::new(),
            last_activity: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    pub fn touch(&mut self, ttl_minutes: i64) {
        let now = Utc::now().naive_utc();
        self.last_activity = now;
        self.expires_at = now + Duration::minutes(ttl_minutes);
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at <= now
    }

    pub fn view(&self) -> SessionView {
        let wizard = &self.wizard;
        SessionView {
            session_id: self.id,
            user_id: self.user_id.clone(),
            step: wizard.step,
            visitor_name: wizard.visitor_name.clone(),
            minimized: wizard.minimized,
            draft: wizard.draft.clone(),
            selected_time: wizard.selected_time.clone(),
            selected_services: wizard.selected_services.clone(),
            guest_emails: wizard.guests.iter().cloned().collect(),
            time_slots: TIME_SLOTS.to_vec(),
            services: SERVICES.to_vec(),
            messages: self.messages.clone(),
        }
    }
}

/// Snapshot returned to the widget after every event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub user_id: String,
    pub step: Step,
    pub visitor_name: Option<String>,
    pub minimized: bool,
    pub draft: BookingDraft,
    pub selected_time: Option<String>,
    pub selected_services: Vec<String>,
    pub guest_emails: Vec<String>,
    pub time_slots: Vec<&'static str>,
    pub services: Vec<Service>,
    pub messages: Vec<Message>,
}
