pub mod models;
pub mod services;

pub use models::{ChatMessage, ChatReply, ChatRequest, QUICK_QUESTIONS};
pub use services::chat::ChatSession;
