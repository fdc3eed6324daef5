pub mod availability;
pub mod booking;
pub mod directive;
pub mod message;

pub use availability::{AvailabilityStatus, AvailabilitySummary, BusinessHours, BusyInterval};
pub use booking::BookingResult;
pub use directive::BookingDirective;
pub use message::{InboundMessage, TelegramChat, TelegramMessage, TelegramUpdate};
