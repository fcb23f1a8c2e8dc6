//! Chat session management.
//!
//! A `ChatController` owns one `Session` (thread, run, retry budget),
//! submits reports and chat messages, and polls runs to completion.

mod controller;
mod events;
mod poll;
mod settings;
mod state;


pub use controller::{ChatController, ReportOutcome, ReportRequest, MAX_COMPETITORS};
pub use events::ChatEvent;
pub use poll::PollOutcome;
pub use settings::PollSettings;
pub use state::{Session, MAX_RUN_RETRIES};
