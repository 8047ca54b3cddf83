// =====================================================================================
// STAFF CHAT MODELS
// =====================================================================================

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const WELCOME_MESSAGE: &str =
    "Olá! Sou o CareLink Assistant. Como posso ajudar você com os dados do hospital hoje?";
pub const NO_ANSWER_MESSAGE: &str = "Desculpe, não consegui processar sua pergunta.";
pub const CONNECTION_ERROR_MESSAGE: &str = "Erro de conexão. Tente novamente.";

/// Suggested prompts offered next to the chat.
pub const QUICK_QUESTIONS: [&str; 4] = [
    "Quantos pacientes temos no sistema?",
    "Quantas faltas na semana passada?",
    "Qual médico tem mais consultas?",
    "Quantos agendamentos para hoje?",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub is_user: bool,
    pub timestamp: NaiveDateTime,
}

impl ChatMessage {
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, text, true)
    }

    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, text, false)
    }

    fn new(id: impl Into<String>, text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_user,
            timestamp: Local::now().naive_local(),
        }
    }

    /// `HH:MM` shown under each bubble.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub user_id: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatReply {
    /// The assistant's answer, or the apology when the backend sent none.
    pub fn text(&self) -> &str {
        match self.response.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => NO_ANSWER_MESSAGE,
        }
    }
}
