pub mod booking;
pub mod catalog;
pub mod chat;
pub mod message;
pub mod session;
pub mod step;

pub use booking::{BookingDraft, GuestEmailSet, ScheduleReceipt};
pub use chat::{AskQuery, ChatMessage, ChatReply, ChatRequest};
pub use message::{MeetingCard, Message, MessageKind, Role};
pub use session::{Session, SessionView, Wizard};
pub use step::Step;
