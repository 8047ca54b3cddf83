use tokio::io::{AsyncBufReadExt, BufReader};

use assistant_cell::{ChatMessage, ChatSession, QUICK_QUESTIONS};
use shared_config::AppConfig;

const EXIT_WORDS: [&str; 2] = ["sair", "exit"];

pub async fn run(message: Option<String>, config: &AppConfig) -> anyhow::Result<()> {
    let mut chat = ChatSession::new(config)?;

    if let Some(message) = message {
        if let Some(reply) = chat.send(&message).await {
            println!("{}", reply.text);
        }
        return Ok(());
    }

    for message in chat.messages() {
        print_message(message);
    }
    println!("\nPerguntas rápidas:");
    for (i, question) in QUICK_QUESTIONS.iter().enumerate() {
        println!("  {}. {}", i + 1, question);
    }
    println!("Digite o número de uma pergunta rápida, sua pergunta ou \"sair\".");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            break;
        }

        let question = match input.parse::<usize>() {
            Ok(n) if (1..=QUICK_QUESTIONS.len()).contains(&n) => QUICK_QUESTIONS[n - 1],
            _ => input,
        };
        if let Some(reply) = chat.send(question).await {
            print_message(reply);
        }
    }
    Ok(())
}

fn print_message(message: &ChatMessage) {
    let who = if message.is_user { "Você" } else { "Assistente" };
    println!("[{}] {}: {}", message.time_label(), who, message.text);
}
