//! Domain layer containing the reading's business logic and types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, state machine)
//! - `catalog` - Card, topic and spread reference types
//! - `draw` - Seedable card selection
//! - `session` - Session aggregate, steps and history
//! - `flow` - Step units and the engine that chains them

pub mod catalog;
pub mod draw;
pub mod flow;
pub mod foundation;
pub mod session;
