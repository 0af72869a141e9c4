//! Chat command implementation.

use crate::cli::{BackendArg, ChatArgs};
use crate::commands::App;
use crate::error::Result;
use crate::output::Formatter;
use crate::repl::{render_reply, run_chat_repl};
use factcheck_llm::{CannedAnswers, ChatAssistant, ChatBackend, ProviderDispatcher};
use std::sync::Arc;
use tracing::info;

/// Execute the chat command.
///
/// With a message, answers once and exits; otherwise starts the REPL.
pub async fn execute_chat(args: ChatArgs, app: &App, formatter: &Formatter) -> Result<()> {
    match args.backend {
        BackendArg::Ai => {
            let dispatcher = Arc::new(ProviderDispatcher::from_config(&app.config.ai)?);
            if let Some(provider) = args.provider {
                dispatcher.set_provider(provider.into());
            }
            info!(provider = %dispatcher.current_provider(), "Chatting with AI provider");
            let assistant =
                ChatAssistant::new(CannedAnswers::suggested(), Arc::clone(&dispatcher));
            converse(&assistant, Some(&dispatcher), args.message, app, formatter).await
        }
        BackendArg::Remote => {
            info!(api_url = %app.config.api_url, "Chatting with FactCheck backend");
            let assistant = ChatAssistant::new(CannedAnswers::suggested(), Arc::clone(app.client()));
            converse(&assistant, None, args.message, app, formatter).await
        }
    }
}

async fn converse<B: ChatBackend>(
    assistant: &ChatAssistant<B>,
    dispatcher: Option<&ProviderDispatcher>,
    message: Option<String>,
    app: &App,
    formatter: &Formatter,
) -> Result<()> {
    match message {
        Some(message) => {
            let reply = assistant.respond(&message).await;
            println!("{}", render_reply(&reply, dispatcher, formatter));
            Ok(())
        }
        None => run_chat_repl(assistant, dispatcher, &app.config, formatter).await,
    }
}
