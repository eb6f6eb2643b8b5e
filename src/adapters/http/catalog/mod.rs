//! HTTP adapter for topics, spreads and cards.

mod dto;
mod handlers;
mod routes;

pub use dto::{CardInfo, GreetingResponse, SpreadsResponse, TopicsResponse};
pub use handlers::{root, CatalogHandlers};
pub use routes::catalog_routes;
