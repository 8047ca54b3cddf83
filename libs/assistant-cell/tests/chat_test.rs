// libs/assistant-cell/tests/chat_test.rs
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assistant_cell::models::{CONNECTION_ERROR_MESSAGE, NO_ANSWER_MESSAGE, WELCOME_MESSAGE};
use assistant_cell::ChatSession;
use shared_utils::test_utils::{MockApiResponses, TestConfig};

async fn session(mock_server: &MockServer) -> ChatSession {
    let config = TestConfig::with_server(&mock_server.uri()).to_app_config();
    ChatSession::new(&config).expect("client should build")
}

#[tokio::test]
async fn test_starts_with_welcome() {
    let mock_server = MockServer::start().await;
    let chat = session(&mock_server).await;

    assert_eq!(chat.messages().len(), 1);
    assert_eq!(chat.messages()[0].text, WELCOME_MESSAGE);
    assert!(!chat.messages()[0].is_user);
}

#[tokio::test]
async fn test_send_appends_question_and_answer() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/staff-chat"))
        .and(body_json(json!({
            "message": "Quantos agendamentos para hoje?",
            "user_id": "funcionario_001"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::chat_response("Hoje temos 18 agendamentos.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut chat = session(&mock_server).await;
    let reply = chat.send("Quantos agendamentos para hoje?").await.cloned();

    assert_eq!(reply.map(|m| m.text), Some("Hoje temos 18 agendamentos.".to_string()));
    let messages = chat.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[1].is_user);
    assert_ne!(messages[1].id, messages[2].id);
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut chat = session(&mock_server).await;
    assert!(chat.send("   ").await.is_none());
    assert_eq!(chat.messages().len(), 1);
}

#[tokio::test]
async fn test_missing_response_field_apologizes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/staff-chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "detail": "sem dados" })))
        .mount(&mock_server)
        .await;

    let mut chat = session(&mock_server).await;
    let reply = chat.send("Qual médico tem mais consultas?").await.cloned();

    assert_eq!(reply.map(|m| m.text), Some(NO_ANSWER_MESSAGE.to_string()));
}

#[tokio::test]
async fn test_error_status_still_shows_backend_answer() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/staff-chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(MockApiResponses::chat_response("Serviço de dados indisponível.")),
        )
        .mount(&mock_server)
        .await;

    let mut chat = session(&mock_server).await;
    let reply = chat.send("Quantas faltas na semana passada?").await.cloned();

    assert_eq!(reply.map(|m| m.text), Some("Serviço de dados indisponível.".to_string()));
}

#[tokio::test]
async fn test_error_status_without_body_apologizes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/staff-chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut chat = session(&mock_server).await;
    let reply = chat.send("Quantas faltas na semana passada?").await.cloned();

    assert_eq!(reply.map(|m| m.text), Some(NO_ANSWER_MESSAGE.to_string()));
}

#[tokio::test]
async fn test_unreachable_backend_becomes_connection_message() {
    // Nothing listens on the discard port.
    let config = TestConfig::with_server("http://127.0.0.1:9").to_app_config();
    let mut chat = ChatSession::new(&config).expect("client should build");

    chat.send("Quantas faltas na semana passada?").await;

    let last = chat.messages().last().unwrap();
    assert!(!last.is_user);
    assert_eq!(last.text, CONNECTION_ERROR_MESSAGE);
}
