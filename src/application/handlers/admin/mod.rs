//! Administrative handlers.

mod manage_survey;

pub use manage_survey::{AdminError, AdminHandler};
