//! HTTP adapter for administrative endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ConfigResponse, CreditRequest, CreditResponse};
pub use handlers::AdminHandlers;
pub use routes::admin_routes;
