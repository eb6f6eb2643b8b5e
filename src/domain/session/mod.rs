//! Session domain module.
//!
//! Holds the per-visitor reading state: the current step, the
//! conversation history and what the reading has established so far.

mod aggregate;
mod errors;
mod history;
mod step;

pub use aggregate::{DivinationState, DivinationStatus, PendingInput, Session};
pub use errors::SessionError;
pub use history::{HistoryEntry, HistoryRecord, NarrationSource};
pub use step::SessionStep;
