//! HTTP adapter for conversation endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AttachmentQuery, AttachmentResponse, MessageRequest, MessageResponse, ProfileRequest,
    ProfileResponse,
};
pub use handlers::SurveyHandlers;
pub use routes::survey_routes;
