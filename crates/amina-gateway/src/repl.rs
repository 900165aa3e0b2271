//! Interactive terminal chat.
//!
//! Lines starting with `/` are handled locally; everything else goes to the
//! chatbot.

use amina_agent::{ChatMode, Chatbot};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub const HELP: &str = "\
Commands:
  /help            show this help
  /status          show mode and conversation stats
  /mode hosted     use the hosted model (when available)
  /mode intent     use the intent-based responder
  /reset           start a new conversation
  /actions         list quick actions
  /suggest         list suggested questions
  /quit            leave";

/// Outcome of a local command.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Reply(String),
    Quit,
}

/// Handle `/...` commands. Returns `None` for ordinary chat input.
pub fn handle_slash_command(line: &str, bot: &mut Chatbot) -> Option<Command> {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next().map(str::to_ascii_lowercase);

    let reply = match (command.as_str(), arg.as_deref()) {
        ("/quit" | "/exit", _) => return Some(Command::Quit),
        ("/help", _) => HELP.to_string(),
        ("/status", _) => {
            let status = bot.status();
            format!(
                "Mode: {}\nHosted model available: {}\nContext: ~{} tokens\nMessages in history: {}",
                status.mode,
                status.hosted_available,
                status.stats.context_tokens,
                status.stats.conversation_length
            )
        }
        ("/mode", Some("hosted")) => {
            let mode = bot.toggle_mode(true);
            if mode == ChatMode::Hosted {
                format!("Mode: {mode}")
            } else {
                format!("Hosted model unavailable. Mode: {mode}")
            }
        }
        ("/mode", Some("intent")) => format!("Mode: {}", bot.toggle_mode(false)),
        ("/mode", _) => "Usage: /mode hosted | /mode intent".to_string(),
        ("/reset", _) => {
            bot.reset_conversation();
            "Conversation reset.".to_string()
        }
        ("/actions", _) => Chatbot::quick_actions()
            .iter()
            .map(|a| format!("{} -> {}", a.label, a.message))
            .collect::<Vec<_>>()
            .join("\n"),
        ("/suggest", _) => Chatbot::suggested_questions()
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n"),
        (other, _) => format!("Unknown command: {other}. Type /help for the list."),
    };
    Some(Command::Reply(reply))
}

pub async fn run(mut bot: Chatbot) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("Amina ({}). Type /help for commands.\n> ", bot.mode()).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let output = match handle_slash_command(&line, &mut bot) {
            Some(Command::Quit) => break,
            Some(Command::Reply(text)) => text,
            None => bot.get_response(&line).await,
        };
        stdout.write_all(format!("{output}\n\n> ").as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}
