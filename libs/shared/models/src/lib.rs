pub mod catalog;
pub mod error;
pub mod ids;
pub mod risk;

pub use error::{AppError, AppResult};
pub use risk::RiskLevel;
