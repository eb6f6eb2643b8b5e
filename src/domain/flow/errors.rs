//! Error types for the flow engine.

use crate::domain::draw::DrawError;
use crate::domain::session::{SessionError, SessionStep};

use super::{Action, StepKind};

/// Graph construction errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FlowError {
    #[error("step {from} can emit '{action}' but no edge handles it")]
    MissingEdge { from: StepKind, action: Action },

    #[error("step {from} has two edges for '{action}'")]
    DuplicateEdge { from: StepKind, action: Action },

    #[error("step {from} cannot emit '{action}'")]
    ForeignAction { from: StepKind, action: Action },

    #[error("edge {from} --{action}--> {to} does not lead to the '{action}' state")]
    TargetMismatch {
        from: StepKind,
        action: Action,
        to: StepKind,
    },

    #[error("step {0} is referenced but not registered")]
    Unregistered(StepKind),
}

/// Errors raised while running steps.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StepError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("step {step} needs {missing} to be set")]
    MissingPrerequisite {
        step: StepKind,
        missing: &'static str,
    },

    #[error("step {target} cannot be reached from '{current}'")]
    Unreachable {
        current: SessionStep,
        target: StepKind,
    },

    #[error("step {0} is not part of this flow")]
    NotInFlow(StepKind),
}

impl StepError {
    pub fn missing(step: StepKind, missing: &'static str) -> Self {
        StepError::MissingPrerequisite { step, missing }
    }
}
