pub mod models;
pub mod services;

pub use models::*;
pub use services::history::PatientService;
pub use services::timeline::{arrange, SortOrder, TimelineFilter};
