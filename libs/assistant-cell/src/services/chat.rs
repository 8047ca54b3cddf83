// =====================================================================================
// CHAT SESSION - CONVERSATION WITH THE BACKEND ASSISTANT
// =====================================================================================

use chrono::Local;
use tracing::{info, instrument, warn};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::{AppError, AppResult};

use crate::models::{
    ChatMessage, ChatReply, ChatRequest, CONNECTION_ERROR_MESSAGE, NO_ANSWER_MESSAGE, WELCOME_MESSAGE,
};

const CHAT_PATH: &str = "/api/staff-chat";

pub struct ChatSession {
    api: ApiClient,
    user_id: String,
    messages: Vec<ChatMessage>,
    last_id: i64,
}

impl ChatSession {
    /// Starts a conversation holding only the assistant's greeting.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            api: ApiClient::from_config(config)?,
            user_id: config.chat_user_id.clone(),
            messages: vec![ChatMessage::assistant("1", WELCOME_MESSAGE)],
            last_id: 1,
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sends a question and appends both it and the assistant's answer.
    /// Blank input is ignored and returns `None`. Failures never surface as
    /// errors; they become an assistant message.
    #[instrument(skip(self, text))]
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let user_id = self.next_id();
        self.messages.push(ChatMessage::user(user_id, text));

        let answer = match self.ask(text).await {
            Ok(reply) => reply.text().to_string(),
            Err(e) => Self::answer_from_error(e),
        };

        let reply_id = self.next_id();
        self.messages.push(ChatMessage::assistant(reply_id, answer));
        self.messages.last()
    }

    async fn ask(&self, text: &str) -> AppResult<ChatReply> {
        let request = ChatRequest {
            message: text,
            user_id: &self.user_id,
        };
        let body = serde_json::to_value(&request).map_err(AppError::from)?;
        let reply: Option<ChatReply> = self.api.post(CHAT_PATH, body).await?;

        info!("Assistant answered");
        Ok(reply.unwrap_or_default())
    }

    /// The backend answered with a non-2xx status: its body is still read as
    /// a reply. Only transport failures get the connection message.
    fn answer_from_error(err: AppError) -> String {
        match err {
            AppError::Api { status, message } => {
                warn!("Staff chat answered with status {}", status);
                serde_json::from_str::<ChatReply>(&message)
                    .unwrap_or_default()
                    .text()
                    .to_string()
            }
            AppError::NotFound(detail) => {
                warn!("Staff chat endpoint not found: {}", detail);
                NO_ANSWER_MESSAGE.to_string()
            }
            other => {
                warn!("Staff chat request failed: {}", other);
                CONNECTION_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Millisecond ids, bumped when two messages land in the same instant.
    fn next_id(&mut self) -> String {
        self.last_id = Local::now().timestamp_millis().max(self.last_id + 1);
        self.last_id.to_string()
    }
}
