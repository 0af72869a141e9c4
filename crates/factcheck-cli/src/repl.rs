//! Interactive chat REPL.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use factcheck_llm::{ChatAssistant, ChatBackend, ProviderDispatcher, Reply, ReplySource};
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave the REPL
    Exit,
    /// Show help
    Help,
    /// Move to the next AI provider
    Switch,
    /// Show the current AI provider
    Provider,
    /// List the questions with instant answers
    Suggestions,
    /// Anything else is sent to the assistant
    Message(String),
    /// Unrecognized slash command
    Unknown(String),
}

/// Parse one REPL line; blank lines yield `None`.
pub fn parse_repl_line(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = match line {
        "/exit" | "/quit" | "/q" | "exit" | "quit" => ReplCommand::Exit,
        "/help" | "/?" | "help" => ReplCommand::Help,
        "/switch" => ReplCommand::Switch,
        "/provider" => ReplCommand::Provider,
        "/suggest" | "/suggestions" => ReplCommand::Suggestions,
        other if other.starts_with('/') => ReplCommand::Unknown(other.to_string()),
        other => ReplCommand::Message(other.to_string()),
    };
    Some(command)
}

/// Render an assistant reply for the terminal.
///
/// Fallback answers are followed by the provider error, when known.
pub fn render_reply(
    reply: &Reply,
    dispatcher: Option<&ProviderDispatcher>,
    formatter: &Formatter,
) -> String {
    let mut out = reply.text.clone();
    if reply.source == ReplySource::Fallback {
        let note = dispatcher
            .and_then(ProviderDispatcher::last_error)
            .unwrap_or_else(|| "The assistant is unavailable, showing an offline answer".to_string());
        out.push('\n');
        out.push_str(&formatter.warning(&note));
    }
    out
}

fn prompt(dispatcher: Option<&ProviderDispatcher>) -> String {
    match dispatcher {
        Some(d) => format!("factcheck [{}]> ", d.current_provider()),
        None => "factcheck [remote]> ".to_string(),
    }
}

/// Run the interactive chat loop.
///
/// `dispatcher` is the assistant's backend when chatting with the AI
/// providers directly; provider commands need it.
pub async fn run_chat_repl<B: ChatBackend>(
    assistant: &ChatAssistant<B>,
    dispatcher: Option<&ProviderDispatcher>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("FactCheck assistant - type /help for commands, /exit to quit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)?
        .build();
    let mut editor: Editor<(), FileHistory> = Editor::with_config(editor_config)?;

    let history_path = config.history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let line = match editor.readline(&prompt(dispatcher)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use /exit to quit"));
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        };

        let Some(command) = parse_repl_line(&line) else {
            continue;
        };
        editor.add_history_entry(line.trim()).ok();

        match command {
            ReplCommand::Exit => {
                println!("{}", formatter.info("Goodbye!"));
                break;
            }
            ReplCommand::Help => print_help(formatter),
            ReplCommand::Switch => match dispatcher {
                Some(d) => {
                    let next = d.toggle_provider();
                    println!("{}", formatter.success(&format!("Switched to {}", next)));
                }
                None => println!(
                    "{}",
                    formatter.warning("Provider switching needs --backend ai")
                ),
            },
            ReplCommand::Provider => match dispatcher {
                Some(d) => println!("{}", formatter.info(&format!("Provider: {}", d.current_provider()))),
                None => println!("{}", formatter.info("Using the FactCheck chat endpoint")),
            },
            ReplCommand::Suggestions => {
                for question in assistant.canned().questions() {
                    println!("  {}", question);
                }
            }
            ReplCommand::Unknown(cmd) => {
                eprintln!(
                    "{}",
                    formatter.error(&format!("Unknown command: {}. Type /help for commands.", cmd))
                );
            }
            ReplCommand::Message(message) => {
                let reply = assistant.respond(&message).await;
                println!("{}", render_reply(&reply, dispatcher, formatter));
                println!();
            }
        }
    }

    editor.save_history(&history_path).ok();
    Ok(())
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <message>          - Ask the assistant");
    println!("  /suggest           - List questions with instant answers");
    println!("  /switch            - Move to the next AI provider (Gemini, GPT, Grok)");
    println!("  /provider          - Show the current AI provider");
    println!("  /help, /?          - Show this help");
    println!("  /exit, /quit, /q   - Exit");
    println!();
}
