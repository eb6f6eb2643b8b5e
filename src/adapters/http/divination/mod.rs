//! HTTP adapter for divination endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    DivinationResponse, DivinationStatusResponse, DivinationStepRequest, ErrorResponse,
    QuickDivinationResponse, StartDivinationRequest, StepData,
};
pub use handlers::DivinationHandlers;
pub use routes::divination_routes;
