//! The reading as a graph of step units.
//!
//! - `kinds` - the closed set of steps and the action labels they emit
//! - `steps` - the eight step units (prepare / act / commit)
//! - `narrator` - provider wrapper with per-step fallbacks
//! - `engine` - edge table, validation and driving

mod engine;
mod errors;
mod kinds;
mod narrator;
pub mod steps;

pub use engine::{FlowEngine, StepReport};
pub use errors::{FlowError, StepError};
pub use kinds::{Action, StepKind};
pub use narrator::{persona_prompt, Narration, Narrator};
pub use steps::{StepContext, StepUnit};
