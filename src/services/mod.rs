pub mod booking_flow;
pub mod calendar;
pub mod conversation;
pub mod relay;
pub mod sessions;
pub mod upstream;
