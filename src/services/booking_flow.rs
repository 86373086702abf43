//! The scripted booking conversation.
//!
//! [`transition`] is a pure function over a [`Wizard`]: it picks the first rule
//! in [`RULES`] whose step and guard match the event, and returns the next
//! wizard, the assistant replies to append, and at most one upstream call for
//! the caller to perform. The result of that call comes back as another event.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::models::catalog::{is_service, is_time_slot, MEETING_DURATION_MINUTES, MEETING_TITLE};
use crate::models::{BookingDraft, MeetingCard, Message, Step, Wizard};
use crate::services::calendar::{end_time, format_date, long_date, CalendarSelection};

static SCHEDULE_REQUEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)schedule a meeting").expect("valid regex"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub const NAME_PROMPT: &str = "Great! What's your name?";
pub const EMAIL_PROMPT: &str = "Thanks! What's your email address?";
pub const EMAIL_REPROMPT: &str =
    "That doesn't look like a valid email address. Could you double-check it?";
pub const DATE_PROMPT: &str = "Please select a date for your meeting.";
pub const TIME_PROMPT: &str = "Now please pick a time.";
pub const SUMMARY_PROMPT: &str = "What's the meeting about? (summary)";
pub const GUEST_REPROMPT: &str = "Please enter a valid email address for your guest.";
pub const ASK_FALLBACK: &str = "I received your message!";
pub const ASK_FAILED: &str = "Sorry, I couldn't process that request at the moment.";
pub const BOOKED: &str = "✅ Meeting scheduled successfully!";
pub const BOOKING_FAILED: &str = "❌ Something went wrong while booking. Please try again.";

/// Interactions coming from the widget.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    Text { content: String },
    SelectDate { date: CalendarSelection },
    PickTime { slot: String },
    ConfirmTime,
    ToggleService { name: String },
    ConfirmServices,
    SkipServices,
    AddGuest { email: String },
    RemoveGuest { email: String },
    Back,
    Minimize,
    Close,
    Open,
}

impl WidgetEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetEvent::Text { .. } => "text",
            WidgetEvent::SelectDate { .. } => "select_date",
            WidgetEvent::PickTime { .. } => "pick_time",
            WidgetEvent::ConfirmTime => "confirm_time",
            WidgetEvent::ToggleService { .. } => "toggle_service",
            WidgetEvent::ConfirmServices => "confirm_services",
            WidgetEvent::SkipServices => "skip_services",
            WidgetEvent::AddGuest { .. } => "add_guest",
            WidgetEvent::RemoveGuest { .. } => "remove_guest",
            WidgetEvent::Back => "back",
            WidgetEvent::Minimize => "minimize",
            WidgetEvent::Close => "close",
            WidgetEvent::Open => "open",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Widget(WidgetEvent),
    AskAnswered(Option<String>),
    AskFailed,
    ScheduleConfirmed {
        message: Option<String>,
        /// Timezone label shown on the meeting card.
        location: String,
    },
    ScheduleFailed,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Widget(w) => w.name(),
            Event::AskAnswered(_) => "ask_answered",
            Event::AskFailed => "ask_failed",
            Event::ScheduleConfirmed { .. } => "schedule_confirmed",
            Event::ScheduleFailed => "schedule_failed",
        }
    }
}

/// Upstream work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Ask { query: String },
    Schedule(BookingDraft),
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub wizard: Wizard,
    pub replies: Vec<Message>,
    pub effect: Option<Effect>,
}

impl Outcome {
    fn quiet(wizard: Wizard) -> Self {
        Self {
            wizard,
            replies: Vec::new(),
            effect: None,
        }
    }

    fn say(wizard: Wizard, text: &str) -> Self {
        Self {
            wizard,
            replies: vec![Message::assistant(text)],
            effect: None,
        }
    }
}

/// No rule accepts the event at the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected {
    pub event: &'static str,
    pub step: Step,
}

type Guard = fn(&Wizard, &Event) -> bool;
type Action = fn(Wizard, &Event) -> Outcome;

pub struct Rule {
    pub name: &'static str,
    /// `None` matches every step.
    pub step: Option<Step>,
    guard: Guard,
    action: Action,
}

#[rustfmt::skip]
pub static RULES: &[Rule] = &[
    Rule { name: "toggle_minimized", step: None, guard: is_minimize, action: toggle_minimized },
    Rule { name: "close_widget", step: None, guard: is_close, action: close_widget },
    Rule { name: "open_widget", step: None, guard: is_open, action: open_widget },
    Rule { name: "start_booking", step: Some(Step::Idle), guard: is_schedule_request, action: ask_name },
    Rule { name: "forward_question", step: Some(Step::Idle), guard: is_text, action: forward_question },
    Rule { name: "relay_answer", step: Some(Step::Idle), guard: is_ask_answered, action: relay_answer },
    Rule { name: "ask_unavailable", step: Some(Step::Idle), guard: is_ask_failed, action: ask_unavailable },
    Rule { name: "take_name", step: Some(Step::Name), guard: is_text, action: take_name },
    Rule { name: "take_email", step: Some(Step::Email), guard: is_email_text, action: take_email },
    Rule { name: "reprompt_email", step: Some(Step::Email), guard: is_text, action: reprompt_email },
    Rule { name: "take_date", step: Some(Step::Date), guard: is_date_selection, action: take_date },
    Rule { name: "highlight_slot", step: Some(Step::Time), guard: is_known_slot, action: highlight_slot },
    Rule { name: "confirm_time", step: Some(Step::Time), guard: is_time_confirmable, action: confirm_time },
    Rule { name: "back_to_date", step: Some(Step::Time), guard: is_back, action: back_to_date },
    Rule { name: "toggle_service", step: Some(Step::Services), guard: is_known_service, action: toggle_service },
    Rule { name: "add_guest", step: Some(Step::Services), guard: is_valid_guest, action: add_guest },
    Rule { name: "reprompt_guest", step: Some(Step::Services), guard: is_guest_add, action: reprompt_guest },
    Rule { name: "remove_guest", step: Some(Step::Services), guard: is_guest_remove, action: remove_guest },
    Rule { name: "back_to_time", step: Some(Step::Services), guard: is_back, action: back_to_time },
    Rule { name: "submit_services", step: Some(Step::Services), guard: has_services, action: submit_services },
    Rule { name: "skip_services", step: Some(Step::Services), guard: is_skip_services, action: ask_summary },
    Rule { name: "submit_summary", step: Some(Step::Summary), guard: is_text, action: submit_summary },
    Rule { name: "back_to_services", step: Some(Step::Summary), guard: is_back, action: back_to_services },
    Rule { name: "booking_confirmed", step: Some(Step::Done), guard: is_schedule_confirmed, action: booking_confirmed },
    Rule { name: "booking_failed", step: Some(Step::Done), guard: is_schedule_failed, action: booking_failed },
    Rule { name: "record_only", step: None, guard: is_text, action: record_only },
];

pub fn transition(wizard: &Wizard, event: &Event) -> Result<Outcome, Rejected> {
    let rule = RULES
        .iter()
        .filter(|r| r.step.map_or(true, |s| s == wizard.step))
        .find(|r| (r.guard)(wizard, event))
        .ok_or(Rejected {
            event: event.name(),
            step: wizard.step,
        })?;

    let outcome = (rule.action)(wizard.clone(), event);
    tracing::debug!(
        rule = rule.name,
        from = wizard.step.as_str(),
        to = outcome.wizard.step.as_str(),
        "booking transition"
    );
    Ok(outcome)
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL.is_match(s.trim())
}

// ── Guards ──

fn text(event: &Event) -> Option<&str> {
    match event {
        Event::Widget(WidgetEvent::Text { content }) => Some(content.trim()),
        _ => None,
    }
}

fn widget(event: &Event) -> Option<&WidgetEvent> {
    match event {
        Event::Widget(w) => Some(w),
        _ => None,
    }
}

fn is_text(_: &Wizard, event: &Event) -> bool {
    text(event).is_some()
}

fn is_minimize(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::Minimize))
}

fn is_close(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::Close))
}

fn is_open(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::Open))
}

fn is_back(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::Back))
}

fn is_schedule_request(_: &Wizard, event: &Event) -> bool {
    text(event).is_some_and(|t| SCHEDULE_REQUEST.is_match(t))
}

fn is_ask_answered(_: &Wizard, event: &Event) -> bool {
    matches!(event, Event::AskAnswered(_))
}

fn is_ask_failed(_: &Wizard, event: &Event) -> bool {
    matches!(event, Event::AskFailed)
}

fn is_email_text(_: &Wizard, event: &Event) -> bool {
    text(event).is_some_and(is_valid_email)
}

fn is_date_selection(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::SelectDate { .. }))
}

fn is_known_slot(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::PickTime { slot }) if is_time_slot(slot))
}

fn is_time_confirmable(wizard: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::ConfirmTime)) && wizard.selected_time.is_some()
}

fn is_known_service(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::ToggleService { name }) if is_service(name))
}

fn is_guest_add(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::AddGuest { .. }))
}

fn is_valid_guest(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::AddGuest { email }) if is_valid_email(email))
}

fn is_guest_remove(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::RemoveGuest { .. }))
}

fn has_services(wizard: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::ConfirmServices))
        && !wizard.selected_services.is_empty()
}

fn is_skip_services(_: &Wizard, event: &Event) -> bool {
    matches!(widget(event), Some(WidgetEvent::SkipServices))
}

fn is_schedule_confirmed(_: &Wizard, event: &Event) -> bool {
    matches!(event, Event::ScheduleConfirmed { .. })
}

fn is_schedule_failed(_: &Wizard, event: &Event) -> bool {
    matches!(event, Event::ScheduleFailed)
}

// ── Actions ──

fn toggle_minimized(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.minimized = !wizard.minimized;
    Outcome::quiet(wizard)
}

fn close_widget(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.minimized = true;
    Outcome::quiet(wizard)
}

fn open_widget(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.minimized = false;
    Outcome::quiet(wizard)
}

fn ask_name(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.step = Step::Name;
    Outcome::say(wizard, NAME_PROMPT)
}

fn forward_question(wizard: Wizard, event: &Event) -> Outcome {
    let query = text(event).unwrap_or_default().to_string();
    Outcome {
        wizard,
        replies: Vec::new(),
        effect: Some(Effect::Ask { query }),
    }
}

fn relay_answer(wizard: Wizard, event: &Event) -> Outcome {
    let answer = match event {
        Event::AskAnswered(Some(answer)) if !answer.is_empty() => answer.as_str(),
        _ => ASK_FALLBACK,
    };
    Outcome::say(wizard, answer)
}

fn ask_unavailable(wizard: Wizard, _: &Event) -> Outcome {
    Outcome::say(wizard, ASK_FAILED)
}

fn take_name(mut wizard: Wizard, event: &Event) -> Outcome {
    wizard.visitor_name = text(event).map(str::to_string);
    wizard.step = Step::Email;
    Outcome::say(wizard, EMAIL_PROMPT)
}

fn take_email(mut wizard: Wizard, event: &Event) -> Outcome {
    wizard.draft.user_email = text(event).unwrap_or_default().to_string();
    wizard.step = Step::Date;
    Outcome {
        wizard,
        replies: vec![Message::assistant(DATE_PROMPT), Message::calendar()],
        effect: None,
    }
}

fn reprompt_email(wizard: Wizard, _: &Event) -> Outcome {
    Outcome::say(wizard, EMAIL_REPROMPT)
}

fn take_date(mut wizard: Wizard, event: &Event) -> Outcome {
    if let Some(WidgetEvent::SelectDate { date }) = widget(event) {
        wizard.draft.date = format_date(date.first());
    }
    wizard.step = Step::Time;
    Outcome::say(wizard, TIME_PROMPT)
}

fn highlight_slot(mut wizard: Wizard, event: &Event) -> Outcome {
    if let Some(WidgetEvent::PickTime { slot }) = widget(event) {
        wizard.selected_time = Some(slot.clone());
    }
    Outcome::quiet(wizard)
}

fn confirm_time(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.draft.time = wizard.selected_time.clone().unwrap_or_default();
    wizard.step = Step::Services;
    Outcome::quiet(wizard)
}

fn back_to_date(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.step = Step::Date;
    Outcome::quiet(wizard)
}

fn toggle_service(mut wizard: Wizard, event: &Event) -> Outcome {
    if let Some(WidgetEvent::ToggleService { name }) = widget(event) {
        if let Some(pos) = wizard.selected_services.iter().position(|s| s == name) {
            wizard.selected_services.remove(pos);
        } else {
            wizard.selected_services.push(name.clone());
        }
    }
    Outcome::quiet(wizard)
}

fn add_guest(mut wizard: Wizard, event: &Event) -> Outcome {
    if let Some(WidgetEvent::AddGuest { email }) = widget(event) {
        wizard.guests.add(email.trim());
    }
    Outcome::quiet(wizard)
}

fn reprompt_guest(wizard: Wizard, _: &Event) -> Outcome {
    Outcome::say(wizard, GUEST_REPROMPT)
}

fn remove_guest(mut wizard: Wizard, event: &Event) -> Outcome {
    if let Some(WidgetEvent::RemoveGuest { email }) = widget(event) {
        wizard.guests.remove(email.trim());
    }
    Outcome::quiet(wizard)
}

fn back_to_time(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.step = Step::Time;
    Outcome::quiet(wizard)
}

fn back_to_services(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.step = Step::Services;
    Outcome::quiet(wizard)
}

fn ask_summary(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.step = Step::Summary;
    Outcome::say(wizard, SUMMARY_PROMPT)
}

fn submit_services(wizard: Wizard, _: &Event) -> Outcome {
    let summary = wizard.selected_services.join(", ");
    let description = format!("Meeting to discuss: {summary}");
    submit(wizard, summary, description)
}

fn submit_summary(wizard: Wizard, event: &Event) -> Outcome {
    let summary = text(event).unwrap_or_default().to_string();
    submit(wizard, summary.clone(), summary)
}

fn submit(mut wizard: Wizard, summary: String, description: String) -> Outcome {
    let payload = BookingDraft {
        date: wizard.draft.date.clone(),
        time: wizard.draft.time.clone(),
        user_email: wizard.draft.user_email.clone(),
        summary,
        description,
        guest_emails: wizard.guests.merged_with(&wizard.draft.user_email),
    };
    wizard.draft = payload.clone();
    wizard.step = Step::Done;
    Outcome {
        wizard,
        replies: Vec::new(),
        effect: Some(Effect::Schedule(payload)),
    }
}

fn booking_confirmed(mut wizard: Wizard, event: &Event) -> Outcome {
    let Event::ScheduleConfirmed { message, location } = event else {
        return Outcome::quiet(wizard);
    };
    let headline = message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(BOOKED);
    let card = meeting_card(&wizard.draft, location);

    wizard.reset();
    Outcome {
        wizard,
        replies: vec![Message::assistant(headline), Message::meeting_card(card)],
        effect: None,
    }
}

fn booking_failed(mut wizard: Wizard, _: &Event) -> Outcome {
    wizard.reset();
    Outcome::say(wizard, BOOKING_FAILED)
}

fn record_only(wizard: Wizard, _: &Event) -> Outcome {
    Outcome::quiet(wizard)
}

pub fn meeting_card(draft: &BookingDraft, location: &str) -> MeetingCard {
    let end = end_time(&draft.time).unwrap_or_default();
    MeetingCard {
        summary: MEETING_TITLE.to_string(),
        duration: format!("{MEETING_DURATION_MINUTES} min"),
        datetime: format!("{} - {end}, {}", draft.time, long_date(&draft.date)),
        guests: format!("{} Guests", draft.guest_emails.len().saturating_sub(1)),
        location: location.to_string(),
    }
}
